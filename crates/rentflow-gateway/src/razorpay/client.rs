//! Razorpay REST client
//!
//! Basic-auth JSON client for the orders and payment links APIs, plus
//! HMAC-SHA256 verification of webhook bodies.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rentflow_core::{
    config::RazorpayConfig,
    models::{GatewayOrderRequest, PaymentLinkRequest, PaymentRecord, PaymentStatusReport},
    traits::PaymentGateway,
    AppError,
};
use reqwest::{Client, ClientBuilder, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::types::{CreateOrderBody, CreatePaymentLinkBody, PaymentCollection, WebhookEvent};
use crate::error::GatewayError;

type HmacSha256 = Hmac<Sha256>;

/// Client for the Razorpay REST API
pub struct RazorpayClient {
    http_client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    webhook_secret: String,
    timeout_ms: u64,
}

impl RazorpayClient {
    /// Build a client from configuration
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let client = RazorpayClient::new(&config.razorpay)?;
    /// ```
    pub fn new(config: &RazorpayConfig) -> Result<Self, GatewayError> {
        if config.key_id.is_empty() || config.key_secret.is_empty() {
            warn!("Razorpay credentials are not configured; gateway calls will fail");
        }

        let http_client = ClientBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            webhook_secret: config.webhook_secret.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send an authenticated request and decode the JSON response
    #[instrument(skip(self, body))]
    async fn send<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http_client
            .request(method, &url)
            .basic_auth(&self.key_id, Some(&self.key_secret));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Parse(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("Razorpay HTTP error: status={}, body={}", status, text);
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!("Razorpay response: {} bytes", text.len());
        serde_json::from_str(&text)
            .map_err(|e| GatewayError::Parse(format!("Failed to parse JSON: {}", e)))
    }

    /// Hex HMAC-SHA256 of a body under the webhook secret
    pub fn sign(&self, raw_body: &[u8]) -> Option<String> {
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes()).ok()?;
        mac.update(raw_body);
        Some(hex::encode(mac.finalize().into_bytes()))
    }
}

/// `id` of a Razorpay entity, empty when absent
fn entity_id(entity: &Value) -> &str {
    entity
        .get("id")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<Value, AppError> {
        let body = CreateOrderBody::from_request(request).map_err(GatewayError::into_payment)?;
        let order: Value = self
            .send(Method::POST, "/v1/orders", Some(&body))
            .await
            .map_err(GatewayError::into_payment)?;

        let gateway_order_id = entity_id(&order);
        info!(
            receipt = %request.order_id,
            gateway_order_id = %gateway_order_id,
            "Razorpay order created"
        );
        Ok(order)
    }

    async fn create_payment_link(&self, request: &PaymentLinkRequest) -> Result<Value, AppError> {
        let body =
            CreatePaymentLinkBody::from_request(request).map_err(GatewayError::into_payment)?;
        let link: Value = self
            .send(Method::POST, "/v1/payment_links", Some(&body))
            .await
            .map_err(GatewayError::into_payment)?;

        info!(reference_id = %request.order_id, "Razorpay payment link created");
        Ok(link)
    }

    async fn fetch_payment_status(
        &self,
        gateway_order_id: &str,
    ) -> Result<PaymentStatusReport, AppError> {
        let path = format!(
            "/v1/orders/{}/payments",
            urlencoding::encode(gateway_order_id)
        );
        let payments: PaymentCollection = self
            .send::<(), _>(Method::GET, &path, None)
            .await
            .map_err(GatewayError::into_payment)?;

        Ok(match payments.items.into_iter().last() {
            Some(latest) => latest.into_report(gateway_order_id),
            None => PaymentStatusReport::pending(gateway_order_id),
        })
    }

    fn verify_webhook_signature(&self, raw_body: &[u8], signature: &str) -> bool {
        if self.webhook_secret.is_empty() {
            warn!("Webhook secret is not configured; rejecting webhook");
            return false;
        }
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(self.webhook_secret.as_bytes()) else {
            return false;
        };
        mac.update(raw_body);
        mac.verify_slice(&expected).is_ok()
    }

    fn captured_payment(&self, raw_body: &[u8]) -> Result<Option<PaymentRecord>, AppError> {
        let event = WebhookEvent::parse(raw_body)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        debug!(event = %event.event, "Razorpay webhook received");
        Ok(event.captured_payment().map(|p| p.into_record()))
    }
}
