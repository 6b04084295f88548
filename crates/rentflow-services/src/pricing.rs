//! Quote computation

use rentflow_core::models::{FulfillmentOption, Location, PricingQuote};
use rust_decimal::Decimal;
use tracing::debug;

use crate::availability::Availability;

/// Computes one quote per enabled payment mode
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

impl PricingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Quotes in payment mode declaration order; the first is the default
    pub fn quote(
        &self,
        location: &Location,
        rental_days: u32,
        quantity: u32,
        delivery_option: &FulfillmentOption,
        drop_option: &FulfillmentOption,
    ) -> Vec<PricingQuote> {
        let pickup_charge = delivery_option.addon_charge();
        let drop_charge = drop_option.addon_charge();

        let quotes: Vec<PricingQuote> = location
            .enabled_payment_modes()
            .map(|mode| {
                let rental_amount =
                    mode.rate_per_day * Decimal::from(rental_days) * Decimal::from(quantity);
                PricingQuote {
                    payment_type: mode.payment_type.clone(),
                    label: mode.label.clone(),
                    description: mode.description.clone(),
                    rate_per_day: mode.rate_per_day,
                    rental_days,
                    quantity,
                    rental_amount,
                    pickup_charge,
                    drop_charge,
                    total: rental_amount + pickup_charge + drop_charge,
                }
            })
            .collect();

        debug!(
            location = %location.name,
            rental_days,
            quantity,
            quotes = quotes.len(),
            "Quotes computed"
        );
        quotes
    }

    /// Quotes for an accepted booking
    pub fn quote_for(&self, availability: &Availability<'_>, quantity: u32) -> Vec<PricingQuote> {
        self.quote(
            availability.location,
            availability.rental_days,
            quantity,
            availability.delivery_option,
            availability.drop_option,
        )
    }
}
