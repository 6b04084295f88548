//! Razorpay payment gateway integration
//!
//! Implements `PaymentGateway` over the Razorpay REST API:
//! - Orders: `POST /v1/orders`, receipt = ledger order id
//! - Payment links: `POST /v1/payment_links`, reference_id = ledger order id
//! - Payment status: `GET /v1/orders/{id}/payments`
//! - Webhooks: `X-Razorpay-Signature` is the hex HMAC-SHA256 of the raw body
//!
//! # Usage
//!
//! ```rust,ignore
//! use rentflow_gateway::razorpay::RazorpayClient;
//!
//! let client = RazorpayClient::new(&config.razorpay)?;
//! let order = client.create_order(&request).await?;
//! ```

mod client;
mod types;

pub use client::RazorpayClient;
pub use types::*;
