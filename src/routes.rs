use crate::{
    api::{report, student},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub type ApiLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> Option<ApiLimiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Arc<ApiLimiter>) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(limiter) // rate limiting
            .service(
                web::scope("/units/{unit_id}")
                    // /units/{unit_id}/students
                    .service(
                        web::resource("/students")
                            .route(web::post().to(student::create_student))
                            .route(web::get().to(student::list_students)),
                    )
                    // /units/{unit_id}/students/count
                    .service(
                        web::resource("/students/count")
                            .route(web::get().to(student::count_students)),
                    )
                    // /units/{unit_id}/students/{student_id}
                    .service(
                        web::resource("/students/{student_id}")
                            .route(web::put().to(student::update_student))
                            .route(web::delete().to(student::delete_student)),
                    )
                    // /units/{unit_id}/report
                    .service(web::resource("/report").route(web::get().to(report::unit_report))),
            )
            .service(
                web::resource("/students/{student_id}/logs")
                    .route(web::get().to(student::student_logs)),
            )
            .service(
                web::resource("/orgs/{org_id}/standard-time")
                    .route(web::get().to(report::standard_time)),
            ),
    );
}
