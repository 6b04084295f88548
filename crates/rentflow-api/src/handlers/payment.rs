//! Payment handlers
//!
//! The webhook must see the exact bytes the gateway signed, so it takes the
//! raw body rather than a JSON extractor.

use crate::dto::{ApiResponse, WebhookAck};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use rentflow_core::AppError;
use tracing::{debug, error, info, instrument, warn};

/// Header carrying the webhook HMAC
pub const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// Receive a gateway event and record captured payments
///
/// POST /api/payments/webhook
#[instrument(skip(state, req, body), fields(bytes = body.len()))]
pub async fn payment_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if signature.is_empty() || !state.gateway.verify_webhook_signature(&body, signature) {
        warn!("Webhook rejected: invalid signature");
        return Err(AppError::InvalidSignature);
    }

    match state.gateway.captured_payment(&body)? {
        Some(payment) => {
            state.ledger.record_payment(&payment).await.map_err(|e| {
                error!(
                    error = %e,
                    payment_id = %payment.payment_id,
                    "Failed to record captured payment"
                );
                AppError::Internal(format!("failed to record payment: {}", e))
            })?;
            info!(
                payment_id = %payment.payment_id,
                order_id = ?payment.order_id,
                amount = %payment.amount,
                "Captured payment recorded"
            );
        }
        None => debug!("Webhook event ignored"),
    }

    Ok(HttpResponse::Ok().json(WebhookAck::ok()))
}

/// Latest payment state of a gateway order
///
/// GET /api/payments/{gateway_order_id}
#[instrument(skip(state))]
pub async fn get_payment_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = state.gateway.fetch_payment_status(&path).await?;
    debug!(status = %report.status, "Payment status fetched");
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("/webhook", web::post().to(payment_webhook))
            .route("/{gateway_order_id}", web::get().to(get_payment_status)),
    );
}
