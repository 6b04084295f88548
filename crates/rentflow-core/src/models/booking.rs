//! Booking request model
//!
//! The typed form of a caller's booking intent. Raw JSON is validated first;
//! only then is it converted into a `BookingRequest`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::location::{Direction, FulfillmentKind};
use crate::{AppError, AppResult, FieldError};

/// How one end of the rental is fulfilled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum DeliveryMethod {
    /// Customer collects from / returns to a named point
    #[serde(rename_all = "camelCase")]
    SelfService { point_name: String },

    /// Vehicle is brought to / collected from a hotel
    #[serde(rename_all = "camelCase")]
    HotelArranged { hotel_name: Option<String> },
}

impl DeliveryMethod {
    pub fn kind(&self) -> FulfillmentKind {
        match self {
            DeliveryMethod::SelfService { .. } => FulfillmentKind::SelfService,
            DeliveryMethod::HotelArranged { .. } => FulfillmentKind::Hotel,
        }
    }

    /// Short description used in ledger rows and payment notes
    pub fn describe(&self) -> String {
        match self {
            DeliveryMethod::SelfService { point_name } => point_name.clone(),
            DeliveryMethod::HotelArranged {
                hotel_name: Some(hotel),
            } => format!("hotel: {}", hotel),
            DeliveryMethod::HotelArranged { hotel_name: None } => "hotel".to_string(),
        }
    }

    fn from_parts(
        direction: Direction,
        method: &str,
        point: Option<String>,
        hotel: Option<String>,
    ) -> AppResult<Self> {
        let type_field = format!("{}Type", direction);
        match FulfillmentKind::parse(direction, method) {
            Some(FulfillmentKind::SelfService) => {
                let point_name = point.filter(|p| !p.trim().is_empty()).ok_or_else(|| {
                    AppError::field(direction.as_str(), format!("{} is required", direction))
                })?;
                Ok(DeliveryMethod::SelfService { point_name })
            }
            Some(FulfillmentKind::Hotel) => Ok(DeliveryMethod::HotelArranged {
                hotel_name: hotel.filter(|h| !h.trim().is_empty()),
            }),
            None => Err(AppError::field(
                type_field.clone(),
                format!(
                    "{} must be one of {}, hotel",
                    type_field,
                    direction.self_service_type()
                ),
            )),
        }
    }
}

/// Customer contact block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub mobile: String,
    pub email: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Mobile number with its country code, e.g. "+919876543210"
    pub fn contact(&self) -> String {
        let code = self.country_code.trim_start_matches('+');
        format!("+{}{}", code, self.mobile)
    }
}

/// A structurally valid booking request
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub location_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quantity: u32,
    pub pickup: DeliveryMethod,
    pub drop: DeliveryMethod,
    /// Requested payment plan key; absent for availability checks
    pub payment_type: Option<String>,
    /// Contact block; absent for availability checks
    pub customer: Option<Customer>,
}

/// Wire shape of the booking payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingPayload {
    location_name: String,
    start_date: String,
    end_date: String,
    quantity: u64,
    pickup_type: String,
    drop_type: String,
    #[serde(default)]
    pickup: Option<String>,
    #[serde(default)]
    drop: Option<String>,
    #[serde(default)]
    pickup_hotel_name: Option<String>,
    #[serde(default)]
    drop_hotel_name: Option<String>,
    #[serde(default)]
    payment_type: Option<String>,
    #[serde(default)]
    customer: Option<Customer>,
}

impl BookingRequest {
    /// Convert an already-validated JSON payload into a typed request
    pub fn from_payload(payload: &Value) -> AppResult<Self> {
        let wire: BookingPayload = serde_json::from_value(payload.clone())
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let start = parse_booking_date(&wire.start_date).ok_or_else(|| {
            AppError::field("startDate", "startDate must be a valid date")
        })?;
        let end = parse_booking_date(&wire.end_date)
            .ok_or_else(|| AppError::field("endDate", "endDate must be a valid date"))?;

        let quantity = u32::try_from(wire.quantity).map_err(|_| {
            AppError::Validation(vec![FieldError::new(
                "quantity",
                "quantity is out of range",
            )])
        })?;

        let pickup = DeliveryMethod::from_parts(
            Direction::Pickup,
            &wire.pickup_type,
            wire.pickup,
            wire.pickup_hotel_name,
        )?;
        let drop = DeliveryMethod::from_parts(
            Direction::Drop,
            &wire.drop_type,
            wire.drop,
            wire.drop_hotel_name,
        )?;

        Ok(Self {
            location_name: wire.location_name.trim().to_string(),
            start,
            end,
            quantity,
            pickup,
            drop,
            payment_type: wire.payment_type,
            customer: wire.customer,
        })
    }

    pub fn method(&self, direction: Direction) -> &DeliveryMethod {
        match direction {
            Direction::Pickup => &self.pickup,
            Direction::Drop => &self.drop,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

/// Parse a booking date: `YYYY-MM-DD` (midnight UTC), RFC 3339, or a naive
/// `YYYY-MM-DDTHH:MM:SS` timestamp taken as UTC.
pub fn parse_booking_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| Utc.from_utc_datetime(&dt))
}
