//! Order orchestration
//!
//! Sequences validation, availability, pricing, the order ledger and the
//! payment gateway. This is the only component with side effects:
//!
//! ```text
//! Received -> Validated -> AvailabilityConfirmed -> Quoted
//!          -> Persisted -> PaymentInitiated -> Completed
//! ```
//!
//! Any step may fail; the failure carries the last stage reached. Nothing is
//! rolled back: when the gateway step fails after the ledger write, the
//! configured `PaymentFailureHook` is told about the persisted order.

use chrono::Datelike;
use rentflow_core::{
    models::{
        BookingFacts, BookingRequest, Customer, Direction, FulfillmentOption,
        GatewayOrderRequest, Location, PaymentKind, PaymentLinkRequest, PickupDropPoint,
        PricingQuote,
    },
    traits::{Clock, LogOnlyHook, OrderLedger, PaymentFailureHook, PaymentGateway},
    AppError, AppResult,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::availability::{Availability, AvailabilityEngine};
use crate::config_store::ConfigStore;
use crate::pricing::PricingEngine;
use crate::validation::{RequestKind, ValidationEngine};

/// Order lifecycle stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStage {
    Received,
    Validated,
    AvailabilityConfirmed,
    Quoted,
    Persisted,
    PaymentInitiated,
    Completed,
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStage::Received => "received",
            OrderStage::Validated => "validated",
            OrderStage::AvailabilityConfirmed => "availability_confirmed",
            OrderStage::Quoted => "quoted",
            OrderStage::Persisted => "persisted",
            OrderStage::PaymentInitiated => "payment_initiated",
            OrderStage::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A failed order: the last stage reached and the reason
#[derive(Debug)]
pub struct OrderFailure {
    pub stage: OrderStage,
    pub error: AppError,
}

impl OrderFailure {
    fn at(stage: OrderStage) -> impl FnOnce(AppError) -> Self {
        move |error| Self { stage, error }
    }
}

impl fmt::Display for OrderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order failed after {}: {}", self.stage, self.error)
    }
}

impl std::error::Error for OrderFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<OrderFailure> for AppError {
    fn from(failure: OrderFailure) -> Self {
        failure.error
    }
}

/// Orchestrator settings taken from the application config
#[derive(Debug, Clone)]
pub struct OrderSettings {
    pub product_type: String,
    pub currency: String,
}

/// Operating hours shown with an availability report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingsView {
    pub season: String,
    pub off_season: String,
    /// Hours applicable to the requested start month
    pub current: String,
}

/// Result of a successful availability check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub location_name: String,
    pub rental_days: u32,
    pub quantity: u32,
    pub pricing: Vec<PricingQuote>,
    pub delivery_options: Vec<FulfillmentOption>,
    pub drop_options: Vec<FulfillmentOption>,
    pub pickup_drop_points: Vec<PickupDropPoint>,
    pub timings: TimingsView,
}

/// Result of a completed order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
    pub quote: PricingQuote,
    /// Gateway order or payment link object, passed through unchanged
    pub payment: Value,
    pub payment_kind: PaymentKind,
    /// Label of the selected payment mode
    pub payment_type_used: String,
}

/// Drives a booking from raw payload to initiated payment
pub struct OrderOrchestrator {
    availability_validator: ValidationEngine,
    order_validator: ValidationEngine,
    availability: AvailabilityEngine,
    pricing: PricingEngine,
    ledger: Arc<dyn OrderLedger>,
    gateway: Arc<dyn PaymentGateway>,
    failure_hook: Arc<dyn PaymentFailureHook>,
    settings: OrderSettings,
}

impl OrderOrchestrator {
    pub fn new(
        store: Arc<ConfigStore>,
        clock: Arc<dyn Clock>,
        ledger: Arc<dyn OrderLedger>,
        gateway: Arc<dyn PaymentGateway>,
        settings: OrderSettings,
    ) -> AppResult<Self> {
        let product_type = settings.product_type.clone();
        Ok(Self {
            availability_validator: ValidationEngine::new(
                RequestKind::Availability,
                store.clone(),
                product_type.clone(),
            )?,
            order_validator: ValidationEngine::new(
                RequestKind::Order,
                store.clone(),
                product_type.clone(),
            )?,
            availability: AvailabilityEngine::new(store, clock, product_type),
            pricing: PricingEngine::new(),
            ledger,
            gateway,
            failure_hook: Arc::new(LogOnlyHook),
            settings,
        })
    }

    /// Replace the hook run when payment initiation fails
    pub fn with_failure_hook(mut self, hook: Arc<dyn PaymentFailureHook>) -> Self {
        self.failure_hook = hook;
        self
    }

    /// Validate, check availability, and price a booking without side effects
    #[instrument(skip(self, payload))]
    pub fn check_availability(&self, payload: &Value) -> AppResult<AvailabilityReport> {
        self.availability_validator.ensure_valid(payload)?;
        let request = BookingRequest::from_payload(payload)?;
        let accepted = self.availability.evaluate(&request)?;
        let pricing = self.pricing.quote_for(&accepted, request.quantity);

        Ok(build_report(&request, &accepted, pricing))
    }

    /// Run the full order state machine
    #[instrument(skip(self, payload))]
    pub async fn place_order(
        &self,
        payload: &Value,
        use_payment_link: bool,
    ) -> Result<OrderConfirmation, OrderFailure> {
        // Received -> Validated
        self.order_validator
            .ensure_valid(payload)
            .map_err(OrderFailure::at(OrderStage::Received))?;
        let request =
            BookingRequest::from_payload(payload).map_err(OrderFailure::at(OrderStage::Received))?;
        let customer = request.customer.clone().ok_or_else(|| OrderFailure {
            stage: OrderStage::Received,
            error: AppError::field("customer", "customer is required"),
        })?;

        // Validated -> AvailabilityConfirmed
        let accepted = self
            .availability
            .evaluate(&request)
            .map_err(OrderFailure::at(OrderStage::Validated))?;

        // AvailabilityConfirmed -> Quoted
        let quotes = self.pricing.quote_for(&accepted, request.quantity);
        let requested = request.payment_type.as_deref().unwrap_or_default();
        let quote = select_quote(quotes, requested)
            .map_err(OrderFailure::at(OrderStage::AvailabilityConfirmed))?;

        // Quoted -> Persisted
        let facts = BookingFacts {
            product_type: self.settings.product_type.clone(),
            location_name: accepted.location.name.clone(),
            start_date: request.start_date().to_string(),
            end_date: request.end_date().to_string(),
            quantity: request.quantity,
            pickup: request.pickup.clone(),
            drop: request.drop.clone(),
            pricing: quote.clone(),
            customer: customer.clone(),
        };
        let receipt = self.ledger.create_order(&facts).await.map_err(|e| {
            error!(error = %e, location = %facts.location_name, "Order ledger write failed");
            OrderFailure {
                stage: OrderStage::Quoted,
                error: e,
            }
        })?;
        info!(order_id = %receipt.order_id, total = %quote.total, "Order persisted");

        // Persisted -> PaymentInitiated
        let notes = payment_notes(&receipt.order_id, &request, &facts, &customer, &quote);
        let (kind, payment) = match self
            .initiate_payment(&receipt.order_id, &accepted, &customer, &quote, notes, use_payment_link)
            .await
        {
            Ok(initiated) => initiated,
            Err(e) => {
                error!(order_id = %receipt.order_id, error = %e, "Payment initiation failed");
                self.failure_hook
                    .on_payment_failure(&receipt.order_id, &e)
                    .await;
                return Err(OrderFailure {
                    stage: OrderStage::Persisted,
                    error: e,
                });
            }
        };

        // PaymentInitiated -> Completed
        info!(
            order_id = %receipt.order_id,
            payment_kind = ?kind,
            stage = %OrderStage::Completed,
            "Order completed"
        );

        Ok(OrderConfirmation {
            order_id: receipt.order_id,
            payment_type_used: quote.label.clone(),
            quote,
            payment,
            payment_kind: kind,
        })
    }

    async fn initiate_payment(
        &self,
        order_id: &str,
        accepted: &Availability<'_>,
        customer: &Customer,
        quote: &PricingQuote,
        notes: BTreeMap<String, String>,
        use_payment_link: bool,
    ) -> AppResult<(PaymentKind, Value)> {
        if use_payment_link {
            let request = PaymentLinkRequest {
                order_id: order_id.to_string(),
                amount: quote.total,
                currency: self.settings.currency.clone(),
                description: format!(
                    "{} at {} ({} x {} day(s))",
                    accepted.product.label, accepted.location.name, quote.quantity, quote.rental_days
                ),
                customer: customer.clone(),
                notes,
            };
            let link = self.gateway.create_payment_link(&request).await?;
            Ok((PaymentKind::PaymentLink, link))
        } else {
            let request = GatewayOrderRequest {
                order_id: order_id.to_string(),
                amount: quote.total,
                currency: self.settings.currency.clone(),
                notes,
            };
            let order = self.gateway.create_order(&request).await?;
            Ok((PaymentKind::Order, order))
        }
    }
}

/// Pick the quote whose payment mode key matches exactly
fn select_quote(quotes: Vec<PricingQuote>, payment_type: &str) -> AppResult<PricingQuote> {
    let available: Vec<String> = quotes.iter().map(|q| q.label.clone()).collect();
    quotes
        .into_iter()
        .find(|q| q.payment_type == payment_type)
        .ok_or(AppError::PaymentTypeUnavailable { available })
}

fn payment_notes(
    order_id: &str,
    request: &BookingRequest,
    facts: &BookingFacts,
    customer: &Customer,
    quote: &PricingQuote,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("orderId".to_string(), order_id.to_string()),
        ("location".to_string(), facts.location_name.clone()),
        ("startDate".to_string(), facts.start_date.clone()),
        ("endDate".to_string(), facts.end_date.clone()),
        ("quantity".to_string(), request.quantity.to_string()),
        ("pickup".to_string(), request.pickup.describe()),
        ("drop".to_string(), request.drop.describe()),
        ("customerName".to_string(), customer.full_name()),
        ("paymentType".to_string(), quote.label.clone()),
    ])
}

fn build_report(
    request: &BookingRequest,
    accepted: &Availability<'_>,
    pricing: Vec<PricingQuote>,
) -> AvailabilityReport {
    let location: &Location = accepted.location;
    AvailabilityReport {
        location_name: location.name.clone(),
        rental_days: accepted.rental_days,
        quantity: request.quantity,
        pricing,
        delivery_options: location
            .enabled_options(Direction::Pickup)
            .cloned()
            .collect(),
        drop_options: location
            .enabled_options(Direction::Drop)
            .cloned()
            .collect(),
        pickup_drop_points: location.pickup_drop_points.clone(),
        timings: TimingsView {
            season: location.timings.season.clone(),
            off_season: location.timings.off_season.clone(),
            current: location.timings_for_month(request.start.month()).to_string(),
        },
    }
}
