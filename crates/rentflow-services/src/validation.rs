//! Booking request validation
//!
//! Structural checks run through the rule interpreter in `rules`; the final
//! constraint stage checks the request against the catalog. Every stage
//! reports all of its violations.

use rentflow_core::{
    models::{parse_booking_date, Direction, FulfillmentKind, Location},
    AppError, AppResult, FieldError,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};
use validator::ValidateEmail;

use crate::config_store::ConfigStore;
use crate::rules::{is_blank, lookup, FieldRule, JsonType, Rule, RuleTable};

/// Fields of an availability check payload
pub const AVAILABILITY_FIELDS: &[&str] = &[
    "locationName",
    "startDate",
    "endDate",
    "quantity",
    "pickupType",
    "dropType",
    "pickup",
    "drop",
    "pickupHotelName",
    "dropHotelName",
];

/// Fields of an order payload
pub const ORDER_FIELDS: &[&str] = &[
    "locationName",
    "startDate",
    "endDate",
    "quantity",
    "pickupType",
    "dropType",
    "pickup",
    "drop",
    "pickupHotelName",
    "dropHotelName",
    "paymentType",
    "usePaymentLink",
    "customer",
    "customer.firstName",
    "customer.lastName",
    "customer.countryCode",
    "customer.mobile",
    "customer.email",
];

const PICKUP_TYPES: &[&str] = &["self-pickup", "hotel"];
const DROP_TYPES: &[&str] = &["self-drop", "hotel"];

/// Which request shape is being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Availability,
    Order,
}

impl RequestKind {
    pub fn known_fields(&self) -> &'static [&'static str] {
        match self {
            RequestKind::Availability => AVAILABILITY_FIELDS,
            RequestKind::Order => ORDER_FIELDS,
        }
    }

    /// Default rule table for this request shape
    pub fn rule_table(&self) -> AppResult<RuleTable> {
        let mut fields = booking_rules();
        if *self == RequestKind::Order {
            fields.extend(order_rules());
        }
        RuleTable::new(fields, self.known_fields())
    }
}

fn booking_rules() -> Vec<FieldRule> {
    use JsonType::*;
    vec![
        FieldRule::new("locationName", vec![Rule::Required, Rule::Type(String)]),
        FieldRule::new(
            "startDate",
            vec![Rule::Required, Rule::Type(String), Rule::Check(check_start_date)],
        ),
        FieldRule::new(
            "endDate",
            vec![Rule::Required, Rule::Type(String), Rule::Check(check_end_date)],
        ),
        FieldRule::new(
            "quantity",
            vec![Rule::Required, Rule::Type(Number), Rule::Check(check_quantity)],
        ),
        FieldRule::new(
            "pickupType",
            vec![Rule::Required, Rule::Type(String), Rule::OneOf(PICKUP_TYPES)],
        ),
        FieldRule::new(
            "dropType",
            vec![Rule::Required, Rule::Type(String), Rule::OneOf(DROP_TYPES)],
        ),
        FieldRule::new("pickup", vec![Rule::Type(String), Rule::Check(check_pickup_point)]),
        FieldRule::new("drop", vec![Rule::Type(String), Rule::Check(check_drop_point)]),
        FieldRule::new("pickupHotelName", vec![Rule::Type(String)]),
        FieldRule::new("dropHotelName", vec![Rule::Type(String)]),
    ]
}

fn order_rules() -> Vec<FieldRule> {
    use JsonType::*;
    vec![
        FieldRule::new(
            "pickupHotelName",
            vec![Rule::Check(check_pickup_hotel_name)],
        ),
        FieldRule::new("dropHotelName", vec![Rule::Check(check_drop_hotel_name)]),
        FieldRule::new("paymentType", vec![Rule::Required, Rule::Type(String)]),
        FieldRule::new("usePaymentLink", vec![Rule::Type(Boolean)]),
        FieldRule::new("customer", vec![Rule::Type(Object)]),
        FieldRule::new("customer.firstName", vec![Rule::Required, Rule::Type(String)]),
        FieldRule::new("customer.lastName", vec![Rule::Required, Rule::Type(String)]),
        FieldRule::new(
            "customer.countryCode",
            vec![Rule::Required, Rule::Type(String), Rule::Check(check_country_code)],
        ),
        FieldRule::new(
            "customer.mobile",
            vec![Rule::Required, Rule::Type(String), Rule::Check(check_mobile)],
        ),
        FieldRule::new(
            "customer.email",
            vec![Rule::Required, Rule::Type(String), Rule::Check(check_email)],
        ),
    ]
}

// ==================== Predicates ====================

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn check_start_date(value: Option<&Value>, _payload: &Value) -> Result<(), String> {
    match non_empty_str(value) {
        Some(s) if parse_booking_date(s).is_none() => {
            Err("startDate must be a valid date".to_string())
        }
        _ => Ok(()),
    }
}

fn check_end_date(value: Option<&Value>, payload: &Value) -> Result<(), String> {
    let Some(raw) = non_empty_str(value) else {
        return Ok(());
    };
    let end = parse_booking_date(raw).ok_or_else(|| "endDate must be a valid date".to_string())?;
    let start = non_empty_str(lookup(payload, "startDate")).and_then(parse_booking_date);
    match start {
        Some(start) if end <= start => Err("endDate must be after startDate".to_string()),
        _ => Ok(()),
    }
}

fn check_quantity(value: Option<&Value>, _payload: &Value) -> Result<(), String> {
    match value {
        Some(v) if v.is_number() => match v.as_u64() {
            Some(n) if n > 0 => Ok(()),
            _ => Err("quantity must be a whole number greater than 0".to_string()),
        },
        _ => Ok(()),
    }
}

fn check_point(direction: Direction, value: Option<&Value>, payload: &Value) -> Result<(), String> {
    let type_field = format!("{}Type", direction);
    let method = lookup(payload, &type_field).and_then(Value::as_str);
    if method == Some(direction.self_service_type()) && is_blank(value) {
        return Err(format!(
            "{} is required when {} is {}",
            direction,
            type_field,
            direction.self_service_type()
        ));
    }
    Ok(())
}

fn check_pickup_point(value: Option<&Value>, payload: &Value) -> Result<(), String> {
    check_point(Direction::Pickup, value, payload)
}

fn check_drop_point(value: Option<&Value>, payload: &Value) -> Result<(), String> {
    check_point(Direction::Drop, value, payload)
}

fn check_hotel_name(direction: Direction, value: Option<&Value>, payload: &Value) -> Result<(), String> {
    let type_field = format!("{}Type", direction);
    let method = lookup(payload, &type_field).and_then(Value::as_str);
    if method == Some("hotel") && is_blank(value) {
        return Err(format!(
            "{}HotelName is required when {} is hotel",
            direction, type_field
        ));
    }
    Ok(())
}

fn check_pickup_hotel_name(value: Option<&Value>, payload: &Value) -> Result<(), String> {
    check_hotel_name(Direction::Pickup, value, payload)
}

fn check_drop_hotel_name(value: Option<&Value>, payload: &Value) -> Result<(), String> {
    check_hotel_name(Direction::Drop, value, payload)
}

fn digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn normalized_country_code(payload: &Value) -> Option<&str> {
    lookup(payload, "customer.countryCode")
        .and_then(Value::as_str)
        .and_then(|c| c.trim().strip_prefix('+'))
}

fn check_country_code(value: Option<&Value>, payload: &Value) -> Result<(), String> {
    if non_empty_str(value).is_none() {
        return Ok(());
    }
    match normalized_country_code(payload) {
        Some(code) if (1..=4).contains(&code.len()) && digits(code) => Ok(()),
        _ => Err("countryCode must be + followed by 1 to 4 digits".to_string()),
    }
}

fn check_mobile(value: Option<&Value>, payload: &Value) -> Result<(), String> {
    let Some(mobile) = non_empty_str(value) else {
        return Ok(());
    };
    if normalized_country_code(payload) == Some("91") {
        if mobile.len() == 10 && digits(mobile) {
            return Ok(());
        }
        return Err("mobile must be 10 digits".to_string());
    }
    if (4..=14).contains(&mobile.len()) && digits(mobile) {
        Ok(())
    } else {
        Err("mobile must be 4 to 14 digits".to_string())
    }
}

fn check_email(value: Option<&Value>, _payload: &Value) -> Result<(), String> {
    match non_empty_str(value) {
        Some(email) if !email.validate_email() => Err("email must be valid".to_string()),
        _ => Ok(()),
    }
}

// ==================== Engine ====================

/// Validates raw booking payloads
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    kind: RequestKind,
    table: RuleTable,
    store: Arc<ConfigStore>,
    product_type: String,
}

impl ValidationEngine {
    /// Engine with the default rule table for `kind`
    pub fn new(
        kind: RequestKind,
        store: Arc<ConfigStore>,
        product_type: impl Into<String>,
    ) -> AppResult<Self> {
        let table = kind.rule_table()?;
        Ok(Self::with_table(kind, table, store, product_type))
    }

    pub fn with_table(
        kind: RequestKind,
        table: RuleTable,
        store: Arc<ConfigStore>,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            table,
            store,
            product_type: product_type.into(),
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Every violation, in stage order
    #[instrument(skip(self, payload), fields(kind = ?self.kind))]
    pub fn validate(&self, payload: &Value) -> Vec<FieldError> {
        let mut errors = self.table.evaluate(payload);
        errors.extend(self.check_constraints(payload));
        debug!(errors = errors.len(), "Validation finished");
        errors
    }

    /// `Ok` when the payload has no violations
    pub fn ensure_valid(&self, payload: &Value) -> AppResult<()> {
        let errors = self.validate(payload);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Catalog-backed checks; skipped entirely when the location is unknown
    fn check_constraints(&self, payload: &Value) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let Some(name) = non_empty_str(lookup(payload, "locationName")) else {
            return errors;
        };
        let Some(location) = self.store.find_location(name) else {
            errors.push(FieldError::new("locationName", "Location does not exist"));
            return errors;
        };

        let product = self.store.find_active_product(&self.product_type);
        if product.is_none() {
            errors.push(FieldError::new(
                "productType",
                format!("Product {} is not available for booking", self.product_type),
            ));
        }

        if let Some(quantity) = lookup(payload, "quantity").and_then(Value::as_u64) {
            let ceiling = product
                .map(|p| location.quantity_ceiling(p))
                .unwrap_or(location.max_qty_per_booking);
            if quantity > u64::from(ceiling) {
                errors.push(FieldError::new(
                    "quantity",
                    format!("Max quantity allowed is {}", ceiling),
                ));
            }
        }

        if self.kind == RequestKind::Order {
            if let Some(payment_type) = non_empty_str(lookup(payload, "paymentType")) {
                if location.find_payment_mode(payment_type).is_none() {
                    errors.push(FieldError::new(
                        "paymentType",
                        AppError::PaymentTypeUnavailable {
                            available: location.payment_labels(),
                        }
                        .to_string(),
                    ));
                }
            }
        }

        for direction in [Direction::Pickup, Direction::Drop] {
            errors.extend(check_method(location, direction, payload));
        }

        errors
    }
}

fn check_method(location: &Location, direction: Direction, payload: &Value) -> Option<FieldError> {
    let type_field = format!("{}Type", direction);
    let kind = lookup(payload, &type_field)
        .and_then(Value::as_str)
        .and_then(|m| FulfillmentKind::parse(direction, m))?;

    if location.enabled_option(direction, kind).is_none() {
        return Some(FieldError::new(
            type_field,
            format!("{} not available at {}", kind.describe(direction), location.name),
        ));
    }

    if kind == FulfillmentKind::SelfService {
        let point = non_empty_str(lookup(payload, direction.as_str()))?;
        let valid = location
            .find_point(point)
            .map(|p| p.serves(direction))
            .unwrap_or(false);
        if !valid {
            return Some(FieldError::new(
                direction.as_str(),
                format!("Invalid {} point", direction),
            ));
        }
    }

    None
}
