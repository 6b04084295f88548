//! Location model
//!
//! A bookable site with its own stock, payment plans, fulfillment options and
//! named pickup/drop points.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::product::{first_blackout, Product};

/// Which end of the rental a fulfillment option or point serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Pickup,
    Drop,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Pickup => "pickup",
            Direction::Drop => "drop",
        }
    }

    /// Wire value of the self-service option for this direction
    pub fn self_service_type(&self) -> &'static str {
        match self {
            Direction::Pickup => "self-pickup",
            Direction::Drop => "self-drop",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfillment method: the customer comes to a point, or we come to the hotel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FulfillmentKind {
    SelfService,
    Hotel,
}

impl FulfillmentKind {
    /// Parse a wire type (`self-pickup`, `self-drop`, `hotel`) for a direction
    pub fn parse(direction: Direction, value: &str) -> Option<Self> {
        match value {
            "hotel" => Some(FulfillmentKind::Hotel),
            v if v == direction.self_service_type() => Some(FulfillmentKind::SelfService),
            _ => None,
        }
    }

    /// Phrase used in availability messages (e.g. "hotel pickup")
    pub fn describe(&self, direction: Direction) -> String {
        match self {
            FulfillmentKind::SelfService => format!("self {}", direction),
            FulfillmentKind::Hotel => format!("hotel {}", direction),
        }
    }
}

/// A named payment plan at a location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMode {
    /// Plan key (e.g. "full", "partial")
    pub payment_type: String,

    /// Per-day rate for this plan
    #[serde(rename = "amount")]
    pub rate_per_day: Decimal,

    pub label: String,

    /// Disabled modes are never offered or selectable
    pub enabled: bool,

    #[serde(default)]
    pub description: String,
}

/// A pickup (delivery) or drop method offered at a location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentOption {
    pub title: String,

    /// Wire type: `self-pickup` / `self-drop` / `hotel`
    #[serde(rename = "type")]
    pub option_type: String,

    pub enabled: bool,

    /// When false the charge is settled out-of-band by an agent
    #[serde(default = "default_true")]
    pub online_charge_applicable: bool,

    /// Addon charge collected online
    #[serde(default)]
    pub online_charge: Decimal,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub info_text: Option<String>,
}

fn default_true() -> bool {
    true
}

impl FulfillmentOption {
    pub fn kind(&self, direction: Direction) -> Option<FulfillmentKind> {
        FulfillmentKind::parse(direction, &self.option_type)
    }

    /// Charge added to every quote when this option is chosen
    pub fn addon_charge(&self) -> Decimal {
        if self.online_charge_applicable {
            self.online_charge
        } else {
            Decimal::ZERO
        }
    }
}

/// A named physical point, independently flagged for pickup and drop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupDropPoint {
    pub name: String,

    #[serde(default)]
    pub address: String,

    pub pickup: bool,

    pub drop: bool,
}

impl PickupDropPoint {
    pub fn serves(&self, direction: Direction) -> bool {
        match direction {
            Direction::Pickup => self.pickup,
            Direction::Drop => self.drop,
        }
    }
}

/// Operating hours shown for peak and off-peak months
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
    #[serde(default)]
    pub season: String,

    #[serde(default)]
    pub off_season: String,
}

/// Location entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Unique name, matched case-insensitively
    pub name: String,

    /// Per-booking quantity cap
    pub max_qty_per_booking: u32,

    /// Static stock total (not decremented by bookings)
    pub total_stock: u32,

    #[serde(default)]
    pub blackout_dates: Vec<NaiveDate>,

    /// Peak months, 1 = January
    #[serde(default)]
    pub peak_months: Vec<u32>,

    #[serde(default)]
    pub payment_modes: Vec<PaymentMode>,

    #[serde(default)]
    pub delivery_options: Vec<FulfillmentOption>,

    #[serde(default)]
    pub drop_options: Vec<FulfillmentOption>,

    #[serde(default)]
    pub timings: Timings,

    #[serde(default)]
    pub pickup_drop_points: Vec<PickupDropPoint>,
}

impl Location {
    /// Case-insensitive name match
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Enabled payment modes in declaration order
    pub fn enabled_payment_modes(&self) -> impl Iterator<Item = &PaymentMode> {
        self.payment_modes.iter().filter(|m| m.enabled)
    }

    /// The first enabled payment mode
    pub fn default_payment_mode(&self) -> Option<&PaymentMode> {
        self.enabled_payment_modes().next()
    }

    /// Enabled payment mode with exactly this key
    pub fn find_payment_mode(&self, payment_type: &str) -> Option<&PaymentMode> {
        self.enabled_payment_modes()
            .find(|m| m.payment_type == payment_type)
    }

    /// Labels of every enabled payment mode
    pub fn payment_labels(&self) -> Vec<String> {
        self.enabled_payment_modes()
            .map(|m| m.label.clone())
            .collect()
    }

    pub fn options(&self, direction: Direction) -> &[FulfillmentOption] {
        match direction {
            Direction::Pickup => &self.delivery_options,
            Direction::Drop => &self.drop_options,
        }
    }

    pub fn enabled_options(&self, direction: Direction) -> impl Iterator<Item = &FulfillmentOption> {
        self.options(direction).iter().filter(|o| o.enabled)
    }

    /// Enabled option of the given kind, if any
    pub fn enabled_option(
        &self,
        direction: Direction,
        kind: FulfillmentKind,
    ) -> Option<&FulfillmentOption> {
        self.enabled_options(direction)
            .find(|o| o.kind(direction) == Some(kind))
    }

    pub fn find_point(&self, name: &str) -> Option<&PickupDropPoint> {
        self.pickup_drop_points.iter().find(|p| p.name == name)
    }

    /// Whether at least one point serves the direction
    pub fn has_capability(&self, direction: Direction) -> bool {
        self.pickup_drop_points.iter().any(|p| p.serves(direction))
    }

    /// Effective per-booking ceiling given the product's global maximum
    pub fn quantity_ceiling(&self, product: &Product) -> u32 {
        self.max_qty_per_booking.min(product.max_quantity)
    }

    /// First location blackout date inside the inclusive range
    pub fn blackout_within(&self, start: NaiveDate, end: NaiveDate) -> Option<NaiveDate> {
        first_blackout(&self.blackout_dates, start, end)
    }

    pub fn is_peak_month(&self, month: u32) -> bool {
        self.peak_months.contains(&month)
    }

    /// Operating hours applicable in the given month
    pub fn timings_for_month(&self, month: u32) -> &str {
        if self.is_peak_month(month) {
            &self.timings.season
        } else {
            &self.timings.off_season
        }
    }
}

/// The full catalog document loaded at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub locations: Vec<Location>,
}
