//! Google Sheets order ledger

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, ClientBuilder};
use rentflow_core::{
    config::SheetsConfig,
    models::{BookingFacts, LedgerReceipt, PaymentRecord},
    traits::OrderLedger,
    AppError,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::auth::ServiceAccountAuth;
use super::{GENERATED_ORDERS_RANGE, PAID_ORDERS_RANGE};
use crate::error::GatewayError;

#[derive(Debug, Serialize)]
struct AppendBody {
    values: Vec<Vec<Value>>,
}

/// Row appended to the generated orders sheet (A:F)
pub fn generated_order_row(
    order_id: &str,
    facts: &BookingFacts,
    created_at: DateTime<Utc>,
) -> Result<Vec<Value>, GatewayError> {
    let meta = json!({
        "location": facts.location_name,
        "startDate": facts.start_date,
        "endDate": facts.end_date,
        "quantity": facts.quantity,
        "pickup": facts.pickup,
        "drop": facts.drop,
        "pricing": facts.pricing,
        "email": facts.customer.email,
    });
    let meta = serde_json::to_string(&meta)
        .map_err(|e| GatewayError::Parse(format!("failed to encode order meta: {}", e)))?;

    Ok(vec![
        json!(order_id),
        json!(facts.product_type),
        json!(facts.customer.full_name()),
        json!(facts.customer.contact()),
        json!(meta),
        json!(created_at.to_rfc3339()),
    ])
}

/// Row appended to the paid orders sheet (A:G)
pub fn paid_order_row(payment: &PaymentRecord) -> Vec<Value> {
    vec![
        json!(payment.order_id.as_deref().unwrap_or_default()),
        json!(payment.gateway_order_id.as_deref().unwrap_or_default()),
        json!(payment.payment_id),
        json!(payment.amount.to_string()),
        json!(payment.currency),
        json!(payment.status),
        json!(payment.paid_at.to_rfc3339()),
    ]
}

/// Append-only ledger backed by a spreadsheet
pub struct SheetsLedger {
    http_client: Client,
    base_url: String,
    spreadsheet_id: String,
    timeout_ms: u64,
    auth: ServiceAccountAuth,
}

impl SheetsLedger {
    pub fn new(config: &SheetsConfig) -> Result<Self, GatewayError> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        let auth = ServiceAccountAuth::new(
            http_client.clone(),
            &config.client_email,
            &config.private_key_pem(),
            &config.token_uri,
            config.timeout_ms,
        )?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            timeout_ms: config.timeout_ms,
            auth,
        })
    }

    fn append_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    /// Append one row to a range
    #[instrument(skip(self, row))]
    async fn append(&self, range: &str, row: Vec<Value>) -> Result<(), GatewayError> {
        let token = self.auth.access_token().await?;
        let body = AppendBody { values: vec![row] };

        let response = self
            .http_client
            .post(self.append_url(range))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Sheets append failed: status={}", status);
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Row appended to {}", range);
        Ok(())
    }
}

#[async_trait]
impl OrderLedger for SheetsLedger {
    async fn create_order(&self, facts: &BookingFacts) -> Result<LedgerReceipt, AppError> {
        let order_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let row = generated_order_row(&order_id, facts, created_at)
            .map_err(GatewayError::into_ledger)?;
        self.append(GENERATED_ORDERS_RANGE, row)
            .await
            .map_err(GatewayError::into_ledger)?;

        info!(order_id = %order_id, location = %facts.location_name, "Order row written");
        Ok(LedgerReceipt {
            order_id,
            created_at,
        })
    }

    async fn record_payment(&self, payment: &PaymentRecord) -> Result<(), AppError> {
        self.append(PAID_ORDERS_RANGE, paid_order_row(payment))
            .await
            .map_err(GatewayError::into_ledger)?;

        info!(payment_id = %payment.payment_id, "Payment row written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rentflow_core::models::{Customer, DeliveryMethod, PricingQuote};
    use rust_decimal_macros::dec;

    fn facts() -> BookingFacts {
        BookingFacts {
            product_type: "bike-rentals".to_string(),
            location_name: "Port Blair".to_string(),
            start_date: "2026-02-01".to_string(),
            end_date: "2026-02-03".to_string(),
            quantity: 1,
            pickup: DeliveryMethod::SelfService {
                point_name: "Airport".to_string(),
            },
            drop: DeliveryMethod::HotelArranged {
                hotel_name: Some("Sea Shell".to_string()),
            },
            pricing: PricingQuote {
                payment_type: "partial".to_string(),
                label: "Pay after confirmation".to_string(),
                description: String::new(),
                rate_per_day: dec!(200),
                rental_days: 2,
                quantity: 1,
                rental_amount: dec!(400),
                pickup_charge: dec!(0),
                drop_charge: dec!(0),
                total: dec!(400),
            },
            customer: Customer {
                first_name: "Asha".to_string(),
                last_name: "Rao".to_string(),
                country_code: "+91".to_string(),
                mobile: "9876543210".to_string(),
                email: "asha@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_generated_order_row() {
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let row = generated_order_row("ORD-1", &facts(), created_at).unwrap();

        assert_eq!(row.len(), 6);
        assert_eq!(row[0], "ORD-1");
        assert_eq!(row[1], "bike-rentals");
        assert_eq!(row[2], "Asha Rao");
        assert_eq!(row[3], "+919876543210");
        assert_eq!(row[5], "2026-01-01T00:00:00+00:00");

        let meta: Value = serde_json::from_str(row[4].as_str().unwrap()).unwrap();
        assert_eq!(meta["location"], "Port Blair");
        assert_eq!(meta["pickup"]["method"], "selfService");
        assert_eq!(meta["drop"]["hotelName"], "Sea Shell");
        assert_eq!(meta["pricing"]["total"], "400");
    }

    #[test]
    fn test_paid_order_row() {
        let row = paid_order_row(&PaymentRecord {
            order_id: None,
            gateway_order_id: Some("order_gw_1".to_string()),
            payment_id: "pay_1".to_string(),
            amount: dec!(400),
            currency: "INR".to_string(),
            status: "captured".to_string(),
            paid_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        });

        assert_eq!(row.len(), 7);
        assert_eq!(row[0], "");
        assert_eq!(row[1], "order_gw_1");
        assert_eq!(row[3], "400");
    }
}
