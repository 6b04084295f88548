//! Data Transfer Objects for API requests and responses

pub mod booking;
pub mod common;
pub mod location;

pub use booking::*;
pub use common::*;
pub use location::*;
