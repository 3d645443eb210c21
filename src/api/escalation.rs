//! Escalation sweep trigger endpoint.
//!
//! The sweep also runs on the in-process interval; this endpoint lets an
//! external cron trigger it and read the per-stage counts.

use actix_web::{HttpResponse, post, web};
use tracing::info;

use crate::auth::ApiKeyAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::escalation;

/// Run the escalation sweep now.
///
/// Promotes every Start record older than the dwell threshold to
/// In-Progress, one bulk update per stage. Idempotent: a second run with no
/// intervening edits reports a total of 0.
#[utoipa::path(
    post,
    path = "/api/v1/escalation/run",
    tag = "Escalation",
    responses(
        (status = 200, description = "Sweep summary", body = crate::services::SweepSummary),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
#[post("/escalation/run")]
pub async fn run_escalation(
    auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    if !auth.caller.is_admin() {
        return Err(AppError::Forbidden(
            "Admin role required to trigger the escalation sweep".to_string(),
        ));
    }

    let summary = escalation::run_sweep(pool.get_ref(), config.escalation_threshold_hours).await;

    info!(
        "Escalation sweep (manual): total={}, IFR={}, IFA={}, IFB={}",
        summary.total, summary.updated_ifr, summary.updated_ifa, summary.updated_ifb
    );

    Ok(HttpResponse::Ok().json(summary))
}

/// Configure escalation routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(run_escalation);
}
