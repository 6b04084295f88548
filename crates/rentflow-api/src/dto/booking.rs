//! Booking and payment DTOs

use rentflow_core::models::{PaymentKind, PricingQuote};
use rentflow_services::OrderConfirmation;
use serde::Serialize;
use serde_json::Value;

/// Response body of a placed order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    pub order_id: String,
    pub pricing: PricingQuote,
    /// Gateway order or payment link object, passed through untouched
    pub payment: Value,
    pub payment_kind: PaymentKind,
    /// Label of the selected payment mode
    pub payment_type_used: String,
}

impl From<OrderConfirmation> for OrderResponse {
    fn from(confirmation: OrderConfirmation) -> Self {
        Self {
            success: true,
            order_id: confirmation.order_id,
            pricing: confirmation.quote,
            payment: confirmation.payment,
            payment_kind: confirmation.payment_kind,
            payment_type_used: confirmation.payment_type_used,
        }
    }
}

/// `usePaymentLink` flag of an order body; anything but `true` means a gateway order
pub fn use_payment_link(payload: &Value) -> bool {
    payload
        .get("usePaymentLink")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_use_payment_link_flag() {
        assert!(use_payment_link(&json!({"usePaymentLink": true})));
        assert!(!use_payment_link(&json!({"usePaymentLink": false})));
        assert!(!use_payment_link(&json!({"usePaymentLink": "yes"})));
        assert!(!use_payment_link(&json!({})));
    }
}
