//! Domain models for Rentflow
//!
//! This module contains all the core domain models used throughout the application.

pub mod booking;
pub mod location;
pub mod order;
pub mod product;
pub mod quote;

pub use booking::{parse_booking_date, BookingRequest, Customer, DeliveryMethod};
pub use location::{
    Catalog, Direction, FulfillmentKind, FulfillmentOption, Location, PaymentMode,
    PickupDropPoint, Timings,
};
pub use order::{
    BookingFacts, GatewayOrderRequest, LedgerReceipt, PaymentKind, PaymentLinkRequest,
    PaymentRecord, PaymentStatus, PaymentStatusReport,
};
pub use product::Product;
pub use quote::PricingQuote;
