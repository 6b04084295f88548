//! In-memory order ledger
//!
//! Used when no spreadsheet is configured. Rows live for the process
//! lifetime only.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rentflow_core::{
    models::{BookingFacts, LedgerReceipt, PaymentRecord},
    traits::OrderLedger,
    AppError,
};
use tracing::info;
use uuid::Uuid;

/// A booking row held in memory
#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub receipt: LedgerReceipt,
    pub facts: BookingFacts,
}

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    orders: Mutex<Vec<StoredOrder>>,
    payments: Mutex<Vec<PaymentRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> Vec<StoredOrder> {
        self.orders.lock().clone()
    }

    pub fn payments(&self) -> Vec<PaymentRecord> {
        self.payments.lock().clone()
    }
}

#[async_trait]
impl OrderLedger for InMemoryLedger {
    async fn create_order(&self, facts: &BookingFacts) -> Result<LedgerReceipt, AppError> {
        let receipt = LedgerReceipt {
            order_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };
        self.orders.lock().push(StoredOrder {
            receipt: receipt.clone(),
            facts: facts.clone(),
        });

        info!(order_id = %receipt.order_id, "Order stored in memory");
        Ok(receipt)
    }

    async fn record_payment(&self, payment: &PaymentRecord) -> Result<(), AppError> {
        self.payments.lock().push(payment.clone());
        info!(payment_id = %payment.payment_id, "Payment stored in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_records_payments() {
        let ledger = InMemoryLedger::new();
        ledger
            .record_payment(&PaymentRecord {
                order_id: Some("ORD-1".to_string()),
                gateway_order_id: Some("order_gw_1".to_string()),
                payment_id: "pay_1".to_string(),
                amount: dec!(400),
                currency: "INR".to_string(),
                status: "captured".to_string(),
                paid_at: Utc::now(),
            })
            .await
            .unwrap();

        let payments = ledger.payments();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].order_id.as_deref(), Some("ORD-1"));
        assert!(ledger.orders().is_empty());
    }
}
