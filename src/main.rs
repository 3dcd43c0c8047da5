use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use std::sync::Arc;

use attendance_server::attendance::MySqlStore;
use attendance_server::config::Config;
use attendance_server::db::init_db;
use attendance_server::docs::ApiDoc;
use attendance_server::routes;
use attendance_server::utils::standard_time_cache::StandardTimeCache;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance server is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Rolling daily log, installed before the remaining settings are read
    // so their fallback warnings reach it
    let log_dir = Config::log_dir_from_env();
    let file_appender = rolling::daily(&log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections).await?;
    let store = Data::new(MySqlStore::new(pool.clone()));
    let cache = StandardTimeCache::new(config.standard_time_ttl());
    let limiter = Arc::new(
        routes::build_limiter(config.rate_api_per_min).context("Invalid rate limit settings")?,
    );

    let cache_for_warmup = cache.clone();
    let pool_for_warmup = pool.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = cache_for_warmup.warmup(&pool_for_warmup, 250).await {
            warn!(error = %e, "Failed to warm up standard time cache");
        }
    });

    let server_addr = config.server_addr.clone();
    let cache = Data::new(cache);
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(store.clone())
            .app_data(cache.clone())
            .app_data(config.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config, limiter.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
