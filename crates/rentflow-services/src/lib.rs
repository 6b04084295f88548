//! Booking decision engine for Rentflow
//!
//! This crate contains the rule engine that decides whether a rental booking
//! is legal and what it costs, plus the orchestration that drives an accepted
//! booking through the order ledger and payment gateway.
//!
//! # Architecture
//!
//! - `ConfigStore` is built once at startup and shared through `Arc`
//! - Engines are plain values with no I/O; only `OrderOrchestrator` talks to
//!   collaborators, through the traits in `rentflow_core::traits`
//! - All operations are instrumented with tracing
//!
//! # Services
//!
//! - `ConfigStore` - Read-only product and location catalog
//! - `ValidationEngine` - Rule-table validation of raw booking payloads
//! - `AvailabilityEngine` - Method, duration, date and quantity rules
//! - `PricingEngine` - One quote per enabled payment mode
//! - `OrderOrchestrator` - Order state machine over ledger and gateway

pub mod availability;
pub mod config_store;
pub mod orchestrator;
pub mod pricing;
pub mod rules;
pub mod validation;

pub use availability::{rental_days, Availability, AvailabilityEngine};
pub use config_store::{CatalogSummary, ConfigStore};
pub use orchestrator::{
    AvailabilityReport, OrderConfirmation, OrderFailure, OrderOrchestrator, OrderSettings,
    OrderStage, TimingsView,
};
pub use pricing::PricingEngine;
pub use rules::{FieldRule, JsonType, Rule, RuleTable, Stage};
pub use validation::{RequestKind, ValidationEngine};
