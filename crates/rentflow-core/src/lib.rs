//! Rentflow Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Rentflow booking engine. It includes:
//!
//! - Domain models (Product, Location, BookingRequest, PricingQuote, etc.)
//! - Collaborator traits for the order ledger and payment gateway
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::{AppError, FieldError};

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
