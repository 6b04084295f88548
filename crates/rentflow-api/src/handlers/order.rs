//! Order placement handler

use crate::dto::{use_payment_link, OrderResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use rentflow_core::AppError;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

/// Place an order and initiate its payment
///
/// POST /api/order
#[instrument(skip(state, body))]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let use_link = use_payment_link(&body);

    let confirmation = state
        .orchestrator
        .place_order(&body, use_link)
        .await
        .map_err(|failure| {
            if failure.error.is_collaborator_failure() {
                error!(stage = %failure.stage, error = %failure.error, "Order failed");
            } else {
                warn!(stage = %failure.stage, error = %failure.error, "Order rejected");
            }
            AppError::from(failure)
        })?;

    info!(order_id = %confirmation.order_id, total = %confirmation.quote.total, "Order created");
    Ok(HttpResponse::Created().json(OrderResponse::from(confirmation)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/order", web::post().to(create_order));
}
