//! Rentflow HTTP API
//!
//! actix-web handlers and DTOs over the booking services:
//!
//! - `GET /health`
//! - `/api/products`, `/api/locations` - catalog views
//! - `POST /api/check-availability`, `POST /api/order` - booking flow
//! - `/api/payments` - gateway webhook and payment status
//!
//! Handlers read shared services from `web::Data<AppState>` and return
//! `Result<HttpResponse, AppError>`.

pub mod dto;
pub mod handlers;
pub mod state;

use actix_web::{error::InternalError, web, HttpResponse};
use serde_json::json;

pub use dto::*;
pub use handlers::{
    configure_availability, configure_health, configure_locations, configure_orders,
    configure_payments, configure_products,
};
pub use state::AppState;

/// Largest accepted JSON body
pub const JSON_LIMIT_BYTES: usize = 64 * 1024;

/// Register every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health).service(
        web::scope("/api")
            .configure(configure_products)
            .configure(configure_locations)
            .configure(configure_availability)
            .configure(configure_orders)
            .configure(configure_payments),
    );
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "success": false,
        "error": error,
        "message": message,
    }))
}

/// JSON extractor settings: malformed bodies become a 400 envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            let message = err.to_string();
            InternalError::from_response(err, bad_request("invalid_json", message)).into()
        })
}

/// Query extractor settings: unparsable query strings become a 400 envelope
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, bad_request("invalid_query", message)).into()
    })
}
