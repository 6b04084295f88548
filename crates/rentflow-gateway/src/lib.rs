//! Collaborator clients for Rentflow
//!
//! Implementations of the `OrderLedger` and `PaymentGateway` traits from
//! `rentflow-core`:
//!
//! - `RazorpayClient` - Razorpay orders, payment links, payment status and
//!   webhook signatures
//! - `SheetsLedger` - Google Sheets append-only order ledger
//! - `InMemoryLedger` - Process-local ledger for development
//!
//! Client errors are `GatewayError`; at the trait boundary they become
//! `AppError::Ledger` or `AppError::PaymentGateway`.

pub mod error;
pub mod memory;
pub mod razorpay;
pub mod sheets;

pub use error::GatewayError;
pub use memory::{InMemoryLedger, StoredOrder};
pub use razorpay::RazorpayClient;
pub use sheets::SheetsLedger;
