//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.
//! The product/location catalog is a separate JSON document referenced by
//! `catalog.path`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    pub razorpay: RazorpayConfig,
    /// Google Sheets ledger; the in-memory ledger is used when absent
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Comma separated list of allowed CORS origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_cors_origins() -> String {
    "http://localhost:3000,http://127.0.0.1:3000".to_string()
}

/// Catalog source
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Path to the product/location catalog JSON
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

fn default_catalog_path() -> String {
    "config/catalog.json".to_string()
}

/// Booking defaults
#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Product line every booking is made against
    #[serde(default = "default_product_type")]
    pub product_type: String,

    /// ISO currency code sent to the payment gateway
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_product_type() -> String {
    "bike-rentals".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            product_type: default_product_type(),
            currency: default_currency(),
        }
    }
}

/// Razorpay payment gateway configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RazorpayConfig {
    /// API key id
    #[serde(default)]
    pub key_id: String,

    /// API key secret
    #[serde(default)]
    pub key_secret: String,

    /// Secret used to sign webhook payloads
    #[serde(default)]
    pub webhook_secret: String,

    /// API base URL
    #[serde(default = "default_razorpay_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_razorpay_url() -> String {
    "https://api.razorpay.com".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Google Sheets order ledger configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SheetsConfig {
    /// Target spreadsheet id
    pub spreadsheet_id: String,

    /// Service account email
    pub client_email: String,

    /// Service account private key (PEM, `\n` escapes allowed)
    pub private_key: String,

    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    /// Sheets API base URL
    #[serde(default = "default_sheets_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_sheets_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

impl SheetsConfig {
    /// Private key with literal `\n` sequences turned into newlines
    pub fn private_key_pem(&self) -> String {
        self.private_key.replace("\\n", "\n")
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("catalog.path", "config/catalog.json")?
            .set_default("booking.product_type", "bike-rentals")?
            .set_default("booking.currency", "INR")?
            .set_default("razorpay.base_url", "https://api.razorpay.com")?
            .set_default("razorpay.timeout_ms", 10_000)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with RENTFLOW_ prefix
            .add_source(
                Environment::with_prefix("RENTFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("RENTFLOW").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
