//! Product model
//!
//! A bookable product line (e.g. bike rentals) and its global booking rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Product entity
///
/// Global rules that apply to every location offering this product. Location
/// level settings are checked first and may be stricter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product key (e.g. "bike-rentals")
    pub product_type: String,

    /// Display name
    pub label: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Inactive products cannot be booked or listed
    pub active: bool,

    /// Minimum lead time between now and the rental start
    #[serde(default)]
    pub advance_booking_buffer_hours: u32,

    /// Minimum rental length in days
    #[serde(default = "default_min_rental_days")]
    pub min_rental_days: u32,

    /// Maximum units in a single booking
    pub max_quantity: u32,

    /// Dates on which no booking may span
    #[serde(default)]
    pub blackout_dates: Vec<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_thumbnail_url: Option<String>,

    #[serde(default)]
    pub inclusions: Vec<String>,
}

fn default_min_rental_days() -> u32 {
    1
}

impl Product {
    /// First product blackout date inside the inclusive range
    pub fn blackout_within(&self, start: NaiveDate, end: NaiveDate) -> Option<NaiveDate> {
        first_blackout(&self.blackout_dates, start, end)
    }
}

/// Earliest date of `dates` that falls inside `[start, end]`
pub(crate) fn first_blackout(
    dates: &[NaiveDate],
    start: NaiveDate,
    end: NaiveDate,
) -> Option<NaiveDate> {
    dates
        .iter()
        .copied()
        .filter(|d| *d >= start && *d <= end)
        .min()
}
