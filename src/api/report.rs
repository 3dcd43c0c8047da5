use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde_json::json;
use tracing::{error, info};

use crate::attendance::{AttendanceStore, MySqlStore, Slot, reconcile};
use crate::config::Config;
use crate::error::StoreError;
use crate::model::report::ReportRow;
use crate::model::standard_time::StandardTimeWindow;
use crate::models::{ReportQuery, ReportResponse};
use crate::utils::db_utils::ensure_identifier;
use crate::utils::standard_time_cache::StandardTimeCache;

/// Attendance report for one unit
///
/// Every student of the unit is reconciled against the organization's
/// standard time for the requested slot. Students without a matching
/// entry, or whose lookup failed, come back as `pending`.
#[utoipa::path(
    get,
    path = "/api/units/{unit_id}/report",
    params(
        ("unit_id", Path, description = "Unit (scanner group) id"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "Reconciled roster, ordered by name", body = ReportResponse),
        (status = 400, description = "Invalid unit id or date"),
        (status = 404, description = "No standard time for the organization", body = Object, example = json!({
            "message": "Standard time not configured"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Report"
)]
pub async fn unit_report(
    store: web::Data<MySqlStore>,
    cache: web::Data<StandardTimeCache>,
    config: web::Data<Config>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let unit_id = path.into_inner();
    ensure_identifier(&unit_id)?;

    let query = query.into_inner();
    let slot = Slot::from_name(query.slot.as_deref().unwrap_or_default());

    let window = match cache.get_or_fetch(store.get_ref(), &query.org_id).await {
        Ok(w) => w,
        Err(e) if matches!(*e, StoreError::NotFound(_)) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Standard time not configured"
            })));
        }
        Err(e) => {
            error!(error = %e, org_id = %query.org_id, "Failed to load standard time");
            return Err(ErrorInternalServerError("Internal Server Error"));
        }
    };

    let roster = store.roster(&unit_id).await.map_err(|e| {
        error!(error = %e, unit_id = %unit_id, "Failed to load roster");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let order: Vec<String> = roster.iter().map(|s| s.student_id.clone()).collect();
    let mut rows: HashMap<String, ReportRow> = roster
        .into_iter()
        .map(|s| (s.student_id.clone(), ReportRow::from(s)))
        .collect();

    reconcile(
        store.into_inner(),
        order.iter().cloned(),
        query.date,
        slot,
        &window,
        &mut rows,
        config.reconcile_options(),
    )
    .await;

    let data: Vec<ReportRow> = order.iter().filter_map(|id| rows.remove(id)).collect();
    let pending = data.iter().filter(|r| r.resolution.is_pending()).count();
    info!(unit_id = %unit_id, date = %query.date, %slot, students = data.len(), pending, "Report generated");

    Ok(HttpResponse::Ok().json(ReportResponse {
        unit_id,
        date: query.date,
        slot,
        data,
    }))
}

/// Standard time of an organization
#[utoipa::path(
    get,
    path = "/api/orgs/{org_id}/standard-time",
    params(
        ("org_id", Path, description = "Organization (user) id")
    ),
    responses(
        (status = 200, description = "Configured day boundaries", body = StandardTimeWindow),
        (status = 404, description = "Not configured"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Report"
)]
pub async fn standard_time(
    store: web::Data<MySqlStore>,
    cache: web::Data<StandardTimeCache>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let org_id = path.into_inner();

    match cache.get_or_fetch(store.get_ref(), &org_id).await {
        Ok(window) => Ok(HttpResponse::Ok().json(window)),
        Err(e) if matches!(*e, StoreError::NotFound(_)) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Standard time not configured"
        }))),
        Err(e) => {
            error!(error = %e, org_id = %org_id, "Failed to load standard time");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}
