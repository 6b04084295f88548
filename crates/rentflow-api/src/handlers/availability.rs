//! Availability check handler

use crate::dto::ApiResponse;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use rentflow_core::AppError;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Validate, check and price a booking without placing it
///
/// POST /api/check-availability
#[instrument(skip(state, body))]
pub async fn check_availability(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let report = state.orchestrator.check_availability(&body).map_err(|e| {
        warn!(error = %e, "Availability check rejected");
        e
    })?;

    info!(
        location = %report.location_name,
        rental_days = report.rental_days,
        quotes = report.pricing.len(),
        "Availability confirmed"
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/check-availability", web::post().to(check_availability));
}
