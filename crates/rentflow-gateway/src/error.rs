//! Collaborator client errors

use rentflow_core::AppError;
use thiserror::Error;

/// Errors raised by the HTTP collaborator clients
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout: request took longer than {0}ms")]
    Timeout(u64),

    #[error("HTTP error: status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(timeout_ms)
        } else {
            GatewayError::Connection(err.to_string())
        }
    }

    /// As a ledger failure
    pub fn into_ledger(self) -> AppError {
        AppError::Ledger(self.to_string())
    }

    /// As a payment gateway failure
    pub fn into_payment(self) -> AppError {
        AppError::PaymentGateway(self.to_string())
    }
}
