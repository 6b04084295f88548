//! Order ledger and payment gateway data
//!
//! Request/response shapes exchanged with the order ledger and payment
//! gateway collaborators.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::booking::{Customer, DeliveryMethod};
use super::quote::PricingQuote;

/// Everything the ledger records about a new booking
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFacts {
    pub product_type: String,
    pub location_name: String,
    pub start_date: String,
    pub end_date: String,
    pub quantity: u32,
    pub pickup: DeliveryMethod,
    pub drop: DeliveryMethod,
    pub pricing: PricingQuote,
    pub customer: Customer,
}

/// Ledger acknowledgement carrying the canonical order id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    pub order_id: String,
    pub created_at: DateTime<Utc>,
}

/// Gateway order creation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderRequest {
    /// Ledger-issued order id, used as the receipt
    pub order_id: String,
    /// Amount in whole currency units
    pub amount: Decimal,
    pub currency: String,
    pub notes: BTreeMap<String, String>,
}

/// Gateway payment link request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkRequest {
    /// Ledger-issued order id, used as the reference
    pub order_id: String,
    /// Amount in whole currency units
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub customer: Customer,
    pub notes: BTreeMap<String, String>,
}

/// Which kind of payment object was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Order,
    PaymentLink,
}

/// A captured payment reported by the gateway webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Internal order id (from the payment notes)
    pub order_id: Option<String>,
    pub gateway_order_id: Option<String>,
    pub payment_id: String,
    /// Amount in whole currency units
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub paid_at: DateTime<Utc>,
}

/// Normalized payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    /// Map a gateway payment status string
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "captured" => PaymentStatus::Success,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Success => write!(f, "success"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Latest payment state for a gateway order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusReport {
    pub gateway_order_id: String,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PaymentStatusReport {
    /// Report for an order with no payment attempts yet
    pub fn pending(gateway_order_id: impl Into<String>) -> Self {
        Self {
            gateway_order_id: gateway_order_id.into(),
            status: PaymentStatus::Pending,
            payment_id: None,
            amount: None,
            currency: None,
            method: None,
            reason: None,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_mapping() {
        assert_eq!(PaymentStatus::from_gateway("captured"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_gateway("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_gateway("authorized"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::Success.to_string(), "success");
    }

    #[test]
    fn test_pending_report_serialization() {
        let json = serde_json::to_value(PaymentStatusReport::pending("order_123")).unwrap();
        assert_eq!(json["gatewayOrderId"], "order_123");
        assert_eq!(json["status"], "pending");
        assert!(json.get("paymentId").is_none());
    }
}
