//! Pricing quote model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One computed offer for a single enabled payment mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingQuote {
    /// Payment mode key (e.g. "partial")
    pub payment_type: String,

    pub label: String,

    #[serde(default)]
    pub description: String,

    pub rate_per_day: Decimal,

    pub rental_days: u32,

    pub quantity: u32,

    /// rate_per_day * rental_days * quantity
    pub rental_amount: Decimal,

    pub pickup_charge: Decimal,

    pub drop_charge: Decimal,

    /// rental_amount + pickup_charge + drop_charge
    pub total: Decimal,
}

impl PricingQuote {
    /// Whether the totals add up
    pub fn is_consistent(&self) -> bool {
        self.rental_amount
            == self.rate_per_day * Decimal::from(self.rental_days) * Decimal::from(self.quantity)
            && self.total == self.rental_amount + self.pickup_charge + self.drop_charge
    }
}
