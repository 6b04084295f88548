//! Collaborator traits
//!
//! Seams between the booking engine and the outside world: the order ledger,
//! the payment gateway, the clock, and the compensation hook invoked when a
//! payment cannot be initiated for a persisted order.

use crate::error::AppError;
use crate::models::{
    BookingFacts, GatewayOrderRequest, LedgerReceipt, PaymentLinkRequest, PaymentRecord,
    PaymentStatusReport,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

/// Append-only order ledger
///
/// Allocates the canonical order id. Implementations may retry internally but
/// must write at most one row per call.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Record a new booking and return its order id
    async fn create_order(&self, facts: &BookingFacts) -> Result<LedgerReceipt, AppError>;

    /// Record a captured payment
    async fn record_payment(&self, payment: &PaymentRecord) -> Result<(), AppError>;
}

/// Payment gateway client
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a gateway order; returns the gateway's order object
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<Value, AppError>;

    /// Create a shareable payment link; returns the gateway's link object
    async fn create_payment_link(&self, request: &PaymentLinkRequest) -> Result<Value, AppError>;

    /// Latest payment state for a gateway order
    async fn fetch_payment_status(
        &self,
        gateway_order_id: &str,
    ) -> Result<PaymentStatusReport, AppError>;

    /// Verify a webhook body against its signature header
    fn verify_webhook_signature(&self, raw_body: &[u8], signature: &str) -> bool;

    /// Extract the captured payment from a verified webhook body
    ///
    /// Returns `None` for events other than a payment capture.
    fn captured_payment(&self, raw_body: &[u8]) -> Result<Option<PaymentRecord>, AppError>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Invoked when the gateway step fails after the ledger row was written
#[async_trait]
pub trait PaymentFailureHook: Send + Sync {
    async fn on_payment_failure(&self, order_id: &str, error: &AppError);
}

/// Default hook: the ledger row is left as-is and the gap is logged
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyHook;

#[async_trait]
impl PaymentFailureHook for LogOnlyHook {
    async fn on_payment_failure(&self, order_id: &str, error: &AppError) {
        warn!(
            order_id = %order_id,
            error = %error,
            "Order persisted but payment was not initiated; ledger row left unchanged"
        );
    }
}
