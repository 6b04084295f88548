//! Razorpay REST payloads
//!
//! Request and response bodies for the orders, payment links and webhook
//! APIs. Amounts on the wire are in the minor unit (paise).

use chrono::{DateTime, Utc};
use rentflow_core::models::{
    GatewayOrderRequest, PaymentLinkRequest, PaymentRecord, PaymentStatus, PaymentStatusReport,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::GatewayError;

/// Whole currency units to minor units
pub fn to_minor_units(amount: Decimal) -> Result<i64, GatewayError> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .filter(|v| *v >= 0)
        .ok_or_else(|| GatewayError::Parse(format!("amount {} out of range", amount)))
}

/// Minor units to whole currency units
pub fn from_minor_units(amount: i64) -> Decimal {
    Decimal::new(amount, 2).normalize()
}

// ============================================================================
// Orders
// ============================================================================

/// Body of `POST /v1/orders`
#[derive(Debug, Serialize)]
pub struct CreateOrderBody<'a> {
    pub amount: i64,
    pub currency: &'a str,
    pub receipt: &'a str,
    pub payment_capture: u8,
    pub notes: &'a BTreeMap<String, String>,
}

impl<'a> CreateOrderBody<'a> {
    pub fn from_request(request: &'a GatewayOrderRequest) -> Result<Self, GatewayError> {
        Ok(Self {
            amount: to_minor_units(request.amount)?,
            currency: &request.currency,
            receipt: &request.order_id,
            payment_capture: 1,
            notes: &request.notes,
        })
    }
}

// ============================================================================
// Payment links
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LinkCustomer {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Serialize)]
pub struct LinkNotify {
    pub sms: bool,
    pub email: bool,
}

/// Body of `POST /v1/payment_links`
#[derive(Debug, Serialize)]
pub struct CreatePaymentLinkBody<'a> {
    pub amount: i64,
    pub currency: &'a str,
    pub accept_partial: bool,
    pub description: &'a str,
    pub customer: LinkCustomer,
    pub notify: LinkNotify,
    pub reminder_enable: bool,
    pub notes: &'a BTreeMap<String, String>,
    pub reference_id: &'a str,
}

impl<'a> CreatePaymentLinkBody<'a> {
    pub fn from_request(request: &'a PaymentLinkRequest) -> Result<Self, GatewayError> {
        Ok(Self {
            amount: to_minor_units(request.amount)?,
            currency: &request.currency,
            accept_partial: false,
            description: &request.description,
            customer: LinkCustomer {
                name: request.customer.full_name(),
                email: request.customer.email.clone(),
                contact: request.customer.contact(),
            },
            notify: LinkNotify {
                sms: true,
                email: true,
            },
            reminder_enable: true,
            notes: &request.notes,
            reference_id: &request.order_id,
        })
    }
}

// ============================================================================
// Payments
// ============================================================================

/// A payment entity
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayPayment {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    /// An object, or an empty array when no notes were set
    #[serde(default)]
    pub notes: Value,
    #[serde(default)]
    pub error_description: Option<String>,
    pub created_at: i64,
}

impl RazorpayPayment {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    /// A string note, if present
    pub fn note(&self, key: &str) -> Option<String> {
        self.notes.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn into_record(self) -> PaymentRecord {
        PaymentRecord {
            order_id: self.note("orderId"),
            paid_at: self.created_at().unwrap_or_else(Utc::now),
            amount: from_minor_units(self.amount),
            gateway_order_id: self.order_id,
            payment_id: self.id,
            currency: self.currency,
            status: self.status,
        }
    }

    pub fn into_report(self, gateway_order_id: &str) -> PaymentStatusReport {
        PaymentStatusReport {
            gateway_order_id: gateway_order_id.to_string(),
            status: PaymentStatus::from_gateway(&self.status),
            created_at: self.created_at(),
            amount: Some(from_minor_units(self.amount)),
            payment_id: Some(self.id),
            currency: Some(self.currency),
            method: self.method,
            reason: self.error_description,
        }
    }
}

/// Response of `GET /v1/orders/{id}/payments`
#[derive(Debug, Deserialize)]
pub struct PaymentCollection {
    #[serde(default)]
    pub items: Vec<RazorpayPayment>,
}

// ============================================================================
// Webhooks
// ============================================================================

pub const PAYMENT_CAPTURED: &str = "payment.captured";

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub payment: Option<EntityWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct EntityWrapper {
    pub entity: RazorpayPayment,
}

impl WebhookEvent {
    pub fn parse(raw_body: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(raw_body)
            .map_err(|e| GatewayError::Parse(format!("invalid webhook body: {}", e)))
    }

    /// The payment of a capture event
    pub fn captured_payment(self) -> Option<RazorpayPayment> {
        if self.event != PAYMENT_CAPTURED {
            return None;
        }
        self.payload.payment.map(|p| p.entity)
    }
}
