//! Location and product DTOs

use chrono::NaiveDate;
use rentflow_core::models::{
    Direction, FulfillmentOption, Location, PaymentMode, PickupDropPoint, Product, Timings,
};
use serde::{Deserialize, Serialize};

/// Query parameters for the location list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationQuery {
    /// Restrict to locations with a point serving this direction
    pub capability: Option<Direction>,
}

/// Location entry in list responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub name: String,
    pub max_qty_per_booking: u32,
    pub total_stock: u32,
    pub pickup_available: bool,
    pub drop_available: bool,
    pub timings: Timings,
}

impl From<&Location> for LocationSummary {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            max_qty_per_booking: location.max_qty_per_booking,
            total_stock: location.total_stock,
            pickup_available: location.has_capability(Direction::Pickup),
            drop_available: location.has_capability(Direction::Drop),
            timings: location.timings.clone(),
        }
    }
}

/// Full location view
///
/// Disabled payment modes and fulfillment options are left out; they are
/// never offered to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub name: String,
    pub max_qty_per_booking: u32,
    pub total_stock: u32,
    pub blackout_dates: Vec<NaiveDate>,
    pub peak_months: Vec<u32>,
    pub payment_modes: Vec<PaymentMode>,
    pub delivery_options: Vec<FulfillmentOption>,
    pub drop_options: Vec<FulfillmentOption>,
    pub timings: Timings,
    pub pickup_drop_points: Vec<PickupDropPoint>,
}

impl From<&Location> for LocationDetail {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            max_qty_per_booking: location.max_qty_per_booking,
            total_stock: location.total_stock,
            blackout_dates: location.blackout_dates.clone(),
            peak_months: location.peak_months.clone(),
            payment_modes: location.enabled_payment_modes().cloned().collect(),
            delivery_options: location.enabled_options(Direction::Pickup).cloned().collect(),
            drop_options: location.enabled_options(Direction::Drop).cloned().collect(),
            timings: location.timings.clone(),
            pickup_drop_points: location.pickup_drop_points.clone(),
        }
    }
}

/// Product view exposed to callers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_type: String,
    pub label: String,
    pub description: String,
    pub advance_booking_buffer_hours: u32,
    pub min_rental_days: u32,
    pub max_quantity: u32,
    pub blackout_dates: Vec<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_thumbnail_url: Option<String>,
    pub inclusions: Vec<String>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            product_type: product.product_type.clone(),
            label: product.label.clone(),
            description: product.description.clone(),
            advance_booking_buffer_hours: product.advance_booking_buffer_hours,
            min_rental_days: product.min_rental_days,
            max_quantity: product.max_quantity,
            blackout_dates: product.blackout_dates.clone(),
            product_thumbnail_url: product.product_thumbnail_url.clone(),
            inclusions: product.inclusions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn location() -> Location {
        serde_json::from_value(json!({
            "name": "Port Blair",
            "maxQtyPerBooking": 2,
            "totalStock": 10,
            "paymentModes": [
                {"paymentType": "full", "amount": 500, "label": "Pay Full", "enabled": false},
                {"paymentType": "partial", "amount": 200, "label": "Pay after confirmation", "enabled": true}
            ],
            "deliveryOptions": [
                {"title": "Self Pickup", "type": "self-pickup", "enabled": true},
                {"title": "Hotel Delivery", "type": "hotel", "enabled": false}
            ],
            "pickupDropPoints": [{"name": "Jetty", "pickup": false, "drop": true}]
        }))
        .unwrap()
    }

    #[test]
    fn test_detail_hides_disabled_entries() {
        let detail = LocationDetail::from(&location());
        assert_eq!(detail.payment_modes.len(), 1);
        assert_eq!(detail.payment_modes[0].payment_type, "partial");
        assert_eq!(detail.delivery_options.len(), 1);
        assert!(detail.drop_options.is_empty());
    }

    #[test]
    fn test_summary_capabilities() {
        let summary = LocationSummary::from(&location());
        assert!(!summary.pickup_available);
        assert!(summary.drop_available);
    }

    #[test]
    fn test_capability_query_parsing() {
        let query: LocationQuery = serde_json::from_value(json!({"capability": "drop"})).unwrap();
        assert_eq!(query.capability, Some(Direction::Drop));
        assert!(serde_json::from_value::<LocationQuery>(json!({"capability": "both"})).is_err());
    }
}
