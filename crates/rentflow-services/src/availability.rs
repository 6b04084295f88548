//! Availability rules
//!
//! Decides whether a structurally valid booking can be accepted. Checks run
//! in a fixed order and the first failure is reported.

use chrono::{DateTime, Duration, Utc};
use rentflow_core::{
    models::{
        BookingRequest, DeliveryMethod, Direction, FulfillmentOption, Location, Product,
    },
    traits::Clock,
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config_store::ConfigStore;

const SECONDS_PER_DAY: i64 = 86_400;

/// Accepted booking with the data pricing needs
#[derive(Debug, Clone)]
pub struct Availability<'a> {
    pub location: &'a Location,
    pub product: &'a Product,
    pub rental_days: u32,
    pub delivery_option: &'a FulfillmentOption,
    pub drop_option: &'a FulfillmentOption,
}

/// Billable days between two instants
///
/// Partial days round up. A non-positive span counts as one day when the two
/// instants are less than a day apart; otherwise the range is invalid.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<u32> {
    let secs = (end - start).num_seconds();
    let days = if secs > 0 {
        (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    } else {
        secs / SECONDS_PER_DAY
    };

    if days > 0 {
        u32::try_from(days).ok()
    } else if secs.abs() < SECONDS_PER_DAY {
        Some(1)
    } else {
        None
    }
}

/// Evaluates availability rules against the catalog
pub struct AvailabilityEngine {
    store: Arc<ConfigStore>,
    clock: Arc<dyn Clock>,
    product_type: String,
}

impl AvailabilityEngine {
    pub fn new(
        store: Arc<ConfigStore>,
        clock: Arc<dyn Clock>,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            product_type: product_type.into(),
        }
    }

    /// Run every rule in order; the first violation wins
    #[instrument(skip(self, request), fields(location = %request.location_name, quantity = request.quantity))]
    pub fn evaluate(&self, request: &BookingRequest) -> AppResult<Availability<'_>> {
        let location = self
            .store
            .find_location(&request.location_name)
            .ok_or_else(|| AppError::LocationNotFound(request.location_name.clone()))?;
        let product = self
            .store
            .find_active_product(&self.product_type)
            .ok_or_else(|| AppError::ProductNotFound(self.product_type.clone()))?;

        let result = self.check(request, location, product);
        match &result {
            Ok(accepted) => debug!(rental_days = accepted.rental_days, "Booking available"),
            Err(e) => warn!(reason = %e, "Booking rejected"),
        }
        result
    }

    fn check<'a>(
        &self,
        request: &BookingRequest,
        location: &'a Location,
        product: &'a Product,
    ) -> AppResult<Availability<'a>> {
        // 1. delivery method
        let delivery_option = resolve_option(location, Direction::Pickup, &request.pickup)?;
        let drop_option = resolve_option(location, Direction::Drop, &request.drop)?;

        // 2. point membership
        check_point(location, Direction::Pickup, &request.pickup)?;
        check_point(location, Direction::Drop, &request.drop)?;

        // 3. duration
        let rental_days = rental_days(request.start, request.end)
            .ok_or_else(|| AppError::Unavailable("Invalid date range".to_string()))?;
        if rental_days < product.min_rental_days {
            return Err(AppError::Unavailable(format!(
                "Minimum rental duration is {} day(s)",
                product.min_rental_days
            )));
        }

        // 4. advance booking buffer
        self.check_buffer(request.start, product.advance_booking_buffer_hours)?;

        // 5. blackout dates, location first
        let (start, end) = (request.start_date(), request.end_date());
        if let Some(date) = location.blackout_within(start, end) {
            return Err(AppError::Unavailable(format!(
                "{} is not available on {}",
                location.name, date
            )));
        }
        if let Some(date) = product.blackout_within(start, end) {
            return Err(AppError::Unavailable(format!(
                "{} are not available on {}",
                product.label, date
            )));
        }

        // 6. quantity
        let ceiling = location.quantity_ceiling(product);
        if request.quantity > ceiling {
            return Err(AppError::Unavailable(format!(
                "Max quantity allowed is {}",
                ceiling
            )));
        }
        if request.quantity > location.total_stock {
            return Err(AppError::Unavailable(format!(
                "Only {} vehicles available at {}",
                location.total_stock, location.name
            )));
        }

        Ok(Availability {
            location,
            product,
            rental_days,
            delivery_option,
            drop_option,
        })
    }

    /// The start day must fall on or after the day `buffer_hours` from now
    fn check_buffer(&self, start: DateTime<Utc>, buffer_hours: u32) -> AppResult<()> {
        let now = self.clock.now();
        let earliest = (now + Duration::hours(i64::from(buffer_hours))).date_naive();
        if start.date_naive() >= earliest {
            return Ok(());
        }

        if buffer_hours == 0 {
            return Err(AppError::Unavailable(
                "startDate cannot be in the past".to_string(),
            ));
        }
        Err(AppError::Unavailable(format!(
            "Bookings must be made at least {} hours in advance",
            buffer_hours
        )))
    }
}

fn resolve_option<'a>(
    location: &'a Location,
    direction: Direction,
    method: &DeliveryMethod,
) -> AppResult<&'a FulfillmentOption> {
    let kind = method.kind();
    location.enabled_option(direction, kind).ok_or_else(|| {
        AppError::Unavailable(format!(
            "{} not available at {}",
            kind.describe(direction),
            location.name
        ))
    })
}

fn check_point(location: &Location, direction: Direction, method: &DeliveryMethod) -> AppResult<()> {
    if let DeliveryMethod::SelfService { point_name } = method {
        let serves = location
            .find_point(point_name)
            .map(|p| p.serves(direction))
            .unwrap_or(false);
        if !serves {
            return Err(AppError::Unavailable(format!("Invalid {} point", direction)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_rental_days_rounds_up() {
        assert_eq!(rental_days(at(2026, 2, 1, 0), at(2026, 2, 3, 0)), Some(2));
        assert_eq!(rental_days(at(2026, 2, 1, 10), at(2026, 2, 2, 11)), Some(2));
        assert_eq!(rental_days(at(2026, 2, 1, 10), at(2026, 2, 1, 18)), Some(1));
    }

    #[test]
    fn test_rental_days_same_day_defaults_to_one() {
        assert_eq!(rental_days(at(2026, 2, 1, 0), at(2026, 2, 1, 0)), Some(1));
        assert_eq!(rental_days(at(2026, 2, 1, 18), at(2026, 2, 1, 10)), Some(1));
    }

    #[test]
    fn test_rental_days_rejects_reversed_range() {
        assert_eq!(rental_days(at(2026, 2, 3, 0), at(2026, 2, 1, 0)), None);
    }
}
