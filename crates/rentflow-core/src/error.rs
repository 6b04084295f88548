//! Unified error handling for Rentflow
//!
//! Every failure the booking engine can report maps onto one of these
//! variants, with automatic HTTP response mapping. Collaborator and internal
//! failures render a fixed public message; their detail is only logged.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field (e.g. `customer.mobile`)
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Validation Errors ====================
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid paymentType. Available options: {}", .available.join(", "))]
    PaymentTypeUnavailable { available: Vec<String> },

    // ==================== Not Found Errors ====================
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    // ==================== Availability Errors ====================
    #[error("{0}")]
    Unavailable(String),

    // ==================== Collaborator Errors ====================
    #[error("Order ledger error: {0}")]
    Ledger(String),

    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    #[error("Invalid webhook signature")]
    InvalidSignature,

    // ==================== Internal Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a validation failure on a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::PaymentTypeUnavailable { .. }
            | AppError::Unavailable(_)
            | AppError::InvalidSignature => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::LocationNotFound(_)
            | AppError::ProductNotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            AppError::Ledger(_)
            | AppError::PaymentGateway(_)
            | AppError::Config(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::PaymentTypeUnavailable { .. } => "payment_type_unavailable",
            AppError::LocationNotFound(_) => "location_not_found",
            AppError::ProductNotFound(_) => "product_not_found",
            AppError::Unavailable(_) => "unavailable",
            AppError::Ledger(_) => "ledger_error",
            AppError::PaymentGateway(_) => "payment_gateway_error",
            AppError::InvalidSignature => "invalid_signature",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Message safe to show to API callers
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "Invalid request".to_string()),
            AppError::Ledger(_) => "Failed to create order".to_string(),
            AppError::PaymentGateway(_) => "Failed to initiate payment".to_string(),
            AppError::Config(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                "Server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether this error came from the ledger or payment collaborators
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, AppError::Ledger(_) | AppError::PaymentGateway(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut body = json!({
            "success": false,
            "error": self.error_code(),
            "message": self.public_message(),
        });

        if let AppError::Validation(errors) = self {
            body["errors"] = json!(errors);
        }

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::field("quantity", "quantity is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::LocationNotFound("Nowhere".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ProductNotFound("scooters".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Ledger("sheets returned 503".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unavailable("Max quantity allowed is 2".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::InvalidSignature.error_code(), "invalid_signature");
        assert_eq!(
            AppError::PaymentTypeUnavailable { available: vec![] }.error_code(),
            "payment_type_unavailable"
        );
    }

    #[test]
    fn test_collaborator_detail_is_not_public() {
        let err = AppError::PaymentGateway("key_secret=abc rejected".to_string());
        assert!(err.is_collaborator_failure());
        assert_eq!(err.public_message(), "Failed to initiate payment");
        assert!(!err.public_message().contains("abc"));
    }

    #[test]
    fn test_payment_type_message_lists_labels() {
        let err = AppError::PaymentTypeUnavailable {
            available: vec!["Pay Full".to_string(), "Pay after confirmation".to_string()],
        };
        assert_eq!(
            err.public_message(),
            "Invalid paymentType. Available options: Pay Full, Pay after confirmation"
        );
    }

    #[test]
    fn test_validation_public_message_is_first_error() {
        let err = AppError::Validation(vec![
            FieldError::new("startDate", "startDate is required"),
            FieldError::new("endDate", "endDate is required"),
        ]);
        assert_eq!(err.public_message(), "startDate is required");
        assert!(err.to_string().contains("endDate: endDate is required"));
    }
}
