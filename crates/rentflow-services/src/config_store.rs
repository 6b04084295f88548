//! Read-only product and location catalog
//!
//! Loaded once at startup and shared by reference; there are no mutation
//! operations, so concurrent readers need no synchronization.

use chrono::NaiveDate;
use rentflow_core::{
    models::{Catalog, Direction, FulfillmentKind, FulfillmentOption, Location, Product},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Aggregate view over all locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub total_locations: usize,
    pub pickup_locations: usize,
    pub drop_locations: usize,
    pub total_stock: u32,
}

/// Immutable catalog of products and locations
#[derive(Debug, Clone)]
pub struct ConfigStore {
    products: Vec<Product>,
    locations: Vec<Location>,
}

impl ConfigStore {
    /// Validate a catalog and freeze it
    pub fn from_catalog(catalog: Catalog) -> AppResult<Self> {
        let mut names = HashSet::new();
        for location in &catalog.locations {
            if !names.insert(location.name.to_lowercase()) {
                return Err(AppError::Config(format!(
                    "duplicate location name '{}'",
                    location.name
                )));
            }
            validate_location(location)?;
        }

        for product in &catalog.products {
            if product.max_quantity == 0 {
                return Err(AppError::Config(format!(
                    "product '{}' has maxQuantity 0",
                    product.product_type
                )));
            }
        }

        info!(
            products = catalog.products.len(),
            locations = catalog.locations.len(),
            "Catalog loaded"
        );

        Ok(Self {
            products: catalog.products,
            locations: catalog.locations,
        })
    }

    /// Read and validate a catalog JSON document
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        debug!("Reading catalog from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        let catalog: Catalog = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("invalid catalog {}: {}", path.display(), e))
        })?;
        Self::from_catalog(catalog)
    }

    /// Active product with the given type
    pub fn find_active_product(&self, product_type: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.active && p.product_type == product_type)
    }

    /// Location by name, case-insensitive exact match
    pub fn find_location(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.matches_name(name))
    }

    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Locations with at least one point serving the direction
    pub fn locations_with(&self, direction: Direction) -> impl Iterator<Item = &Location> {
        self.locations
            .iter()
            .filter(move |l| l.has_capability(direction))
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            total_locations: self.locations.len(),
            pickup_locations: self.locations_with(Direction::Pickup).count(),
            drop_locations: self.locations_with(Direction::Drop).count(),
            total_stock: self.locations.iter().map(|l| l.total_stock).sum(),
        }
    }

    /// Every location blackout date, sorted and de-duplicated
    pub fn non_serviceable_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .locations
            .iter()
            .flat_map(|l| l.blackout_dates.iter().copied())
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}

fn validate_location(location: &Location) -> AppResult<()> {
    let fail = |what: String| AppError::Config(format!("location '{}': {}", location.name, what));

    for mode in &location.payment_modes {
        if !is_whole_non_negative(mode.rate_per_day) {
            return Err(fail(format!(
                "payment mode '{}' has invalid rate {}",
                mode.payment_type, mode.rate_per_day
            )));
        }
    }

    for direction in [Direction::Pickup, Direction::Drop] {
        validate_options(location.options(direction), direction).map_err(fail)?;
    }

    let mut points = HashSet::new();
    for point in &location.pickup_drop_points {
        if !points.insert(point.name.as_str()) {
            return Err(fail(format!("duplicate pickup/drop point '{}'", point.name)));
        }
    }

    if let Some(month) = location.peak_months.iter().find(|m| !(1..=12).contains(*m)) {
        return Err(fail(format!("peak month {} outside 1..=12", month)));
    }

    Ok(())
}

fn validate_options(options: &[FulfillmentOption], direction: Direction) -> Result<(), String> {
    let mut seen: HashSet<FulfillmentKind> = HashSet::new();
    for option in options {
        let kind = option.kind(direction).ok_or_else(|| {
            format!("unknown {} option type '{}'", direction, option.option_type)
        })?;
        if !seen.insert(kind) {
            return Err(format!(
                "duplicate {} option type '{}'",
                direction, option.option_type
            ));
        }
        if !is_whole_non_negative(option.online_charge) {
            return Err(format!(
                "{} option '{}' has invalid charge {}",
                direction, option.option_type, option.online_charge
            ));
        }
        if !option.online_charge_applicable && !option.online_charge.is_zero() {
            return Err(format!(
                "{} option '{}' charges online but is not online-chargeable",
                direction, option.option_type
            ));
        }
    }
    Ok(())
}

fn is_whole_non_negative(amount: Decimal) -> bool {
    !amount.is_sign_negative() && amount.fract().is_zero()
}
