//! HTTP handlers for the Rentflow API

pub mod availability;
pub mod health;
pub mod location;
pub mod order;
pub mod payment;
pub mod product;

pub use availability::configure as configure_availability;
pub use health::configure as configure_health;
pub use location::configure as configure_locations;
pub use order::configure as configure_orders;
pub use payment::configure as configure_payments;
pub use product::configure as configure_products;
