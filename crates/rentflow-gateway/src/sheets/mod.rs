//! Google Sheets order ledger
//!
//! Orders and captured payments are appended as rows to two sheets of one
//! spreadsheet:
//! - `generated_orders!A:F`: order id, product type, customer name, phone,
//!   booking metadata (JSON), created at
//! - `paid_orders!A:G`: order id, gateway order id, payment id, amount,
//!   currency, status, paid at
//!
//! Authentication uses a service account key and the OAuth JWT bearer grant.

mod auth;
mod client;

pub use auth::{AssertionClaims, ServiceAccountAuth, SPREADSHEETS_SCOPE};
pub use client::{generated_order_row, paid_order_row, SheetsLedger};

pub const GENERATED_ORDERS_RANGE: &str = "generated_orders!A:F";
pub const PAID_ORDERS_RANGE: &str = "paid_orders!A:G";
