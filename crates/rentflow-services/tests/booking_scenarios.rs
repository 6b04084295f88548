//! End-to-end booking scenarios over a fixture catalog
//!
//! Collaborators are replaced by in-test mocks; time is pinned with a fixed
//! clock at 2026-01-01T00:00:00Z.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rentflow_core::{
    models::{
        BookingFacts, BookingRequest, Catalog, GatewayOrderRequest, LedgerReceipt, PaymentKind,
        PaymentLinkRequest, PaymentRecord, PaymentStatusReport,
    },
    traits::{Clock, OrderLedger, PaymentFailureHook, PaymentGateway},
    AppError,
};
use rentflow_services::{
    AvailabilityEngine, ConfigStore, OrderOrchestrator, OrderSettings, OrderStage, PricingEngine,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

// ==================== Fixtures ====================

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()))
}

fn catalog_json() -> Value {
    json!({
        "products": [{
            "productType": "bike-rentals",
            "label": "Vehicle Rentals",
            "active": true,
            "advanceBookingBufferHours": 24,
            "minRentalDays": 1,
            "maxQuantity": 5,
            "blackoutDates": ["2026-03-10", "2026-03-20"]
        }],
        "locations": [{
            "name": "Port Blair",
            "maxQtyPerBooking": 2,
            "totalStock": 10,
            "blackoutDates": ["2026-01-24", "2026-01-25"],
            "peakMonths": [1, 2, 3, 4, 12],
            "paymentModes": [
                {"paymentType": "full", "amount": 500, "label": "Pay Full", "enabled": false},
                {"paymentType": "partial", "amount": 200, "label": "Pay after confirmation", "enabled": true}
            ],
            "deliveryOptions": [
                {"title": "Self Pickup", "type": "self-pickup", "enabled": true},
                {"title": "Hotel Delivery", "type": "hotel", "enabled": false, "onlineCharge": 300}
            ],
            "dropOptions": [
                {"title": "Self Drop", "type": "self-drop", "enabled": true},
                {"title": "Hotel Pickup", "type": "hotel", "enabled": true, "onlineChargeApplicable": false}
            ],
            "timings": {"season": "08:00 AM - 06:00 PM", "offSeason": "09:00 AM - 05:00 PM"},
            "pickupDropPoints": [
                {"name": "Airport", "pickup": true, "drop": true},
                {"name": "Jetty", "pickup": false, "drop": true}
            ]
        }, {
            "name": "Havelock",
            "maxQtyPerBooking": 5,
            "totalStock": 3,
            "blackoutDates": ["2026-03-10"],
            "paymentModes": [
                {"paymentType": "full", "amount": 600, "label": "Pay Full", "enabled": true},
                {"paymentType": "partial", "amount": 250, "label": "Pay Partial", "enabled": true}
            ],
            "deliveryOptions": [
                {"title": "Hotel Delivery", "type": "hotel", "enabled": true, "onlineCharge": 150}
            ],
            "dropOptions": [
                {"title": "Self Drop", "type": "self-drop", "enabled": true, "onlineCharge": 0}
            ],
            "pickupDropPoints": [
                {"name": "Beach 7", "pickup": false, "drop": true}
            ]
        }]
    })
}

fn store_from(catalog: Value) -> Arc<ConfigStore> {
    let catalog: Catalog = serde_json::from_value(catalog).unwrap();
    Arc::new(ConfigStore::from_catalog(catalog).unwrap())
}

fn store() -> Arc<ConfigStore> {
    store_from(catalog_json())
}

fn engine(store: Arc<ConfigStore>) -> AvailabilityEngine {
    AvailabilityEngine::new(store, clock(), "bike-rentals")
}

fn port_blair(start: &str, end: &str, quantity: u32) -> Value {
    json!({
        "locationName": "Port Blair",
        "startDate": start,
        "endDate": end,
        "quantity": quantity,
        "pickupType": "self-pickup",
        "dropType": "self-drop",
        "pickup": "Airport",
        "drop": "Jetty"
    })
}

fn havelock(start: &str, end: &str, quantity: u32) -> Value {
    json!({
        "locationName": "Havelock",
        "startDate": start,
        "endDate": end,
        "quantity": quantity,
        "pickupType": "hotel",
        "dropType": "self-drop",
        "pickupHotelName": "Sea Shell",
        "drop": "Beach 7"
    })
}

fn with_order_fields(mut payload: Value, payment_type: &str) -> Value {
    payload["paymentType"] = json!(payment_type);
    payload["customer"] = json!({
        "firstName": "Asha",
        "lastName": "Rao",
        "countryCode": "+91",
        "mobile": "9876543210",
        "email": "asha@example.com"
    });
    payload
}

fn request(payload: &Value) -> BookingRequest {
    BookingRequest::from_payload(payload).unwrap()
}

fn rejection(engine: &AvailabilityEngine, payload: &Value) -> String {
    match engine.evaluate(&request(payload)) {
        Err(AppError::Unavailable(reason)) => reason,
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("booking was accepted"),
    }
}

// ==================== Mocks ====================

#[derive(Default)]
struct MockLedger {
    orders: Mutex<Vec<BookingFacts>>,
    payments: Mutex<Vec<PaymentRecord>>,
    fail: bool,
}

impl MockLedger {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl OrderLedger for MockLedger {
    async fn create_order(&self, facts: &BookingFacts) -> Result<LedgerReceipt, AppError> {
        if self.fail {
            return Err(AppError::Ledger("sheet unavailable".to_string()));
        }
        let mut orders = self.orders.lock();
        orders.push(facts.clone());
        Ok(LedgerReceipt {
            order_id: format!("ORD-{}", orders.len()),
            created_at: Utc::now(),
        })
    }

    async fn record_payment(&self, payment: &PaymentRecord) -> Result<(), AppError> {
        self.payments.lock().push(payment.clone());
        Ok(())
    }
}

#[derive(Default)]
struct MockGateway {
    orders: Mutex<Vec<GatewayOrderRequest>>,
    links: Mutex<Vec<PaymentLinkRequest>>,
    fail: bool,
}

impl MockGateway {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<Value, AppError> {
        if self.fail {
            return Err(AppError::PaymentGateway("401 bad credentials".to_string()));
        }
        self.orders.lock().push(request.clone());
        Ok(json!({"id": "order_gw_1", "receipt": request.order_id, "status": "created"}))
    }

    async fn create_payment_link(&self, request: &PaymentLinkRequest) -> Result<Value, AppError> {
        if self.fail {
            return Err(AppError::PaymentGateway("401 bad credentials".to_string()));
        }
        self.links.lock().push(request.clone());
        Ok(json!({"id": "plink_1", "reference_id": request.order_id, "short_url": "https://rzp.io/i/x"}))
    }

    async fn fetch_payment_status(
        &self,
        gateway_order_id: &str,
    ) -> Result<PaymentStatusReport, AppError> {
        Ok(PaymentStatusReport::pending(gateway_order_id))
    }

    fn verify_webhook_signature(&self, _raw_body: &[u8], _signature: &str) -> bool {
        true
    }

    fn captured_payment(&self, _raw_body: &[u8]) -> Result<Option<PaymentRecord>, AppError> {
        Ok(None)
    }
}

#[derive(Default)]
struct RecordingHook {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl PaymentFailureHook for RecordingHook {
    async fn on_payment_failure(&self, order_id: &str, _error: &AppError) {
        self.calls.lock().push(order_id.to_string());
    }
}

fn orchestrator(ledger: Arc<MockLedger>, gateway: Arc<MockGateway>) -> OrderOrchestrator {
    OrderOrchestrator::new(
        store(),
        clock(),
        ledger,
        gateway,
        OrderSettings {
            product_type: "bike-rentals".to_string(),
            currency: "INR".to_string(),
        },
    )
    .unwrap()
}

// ==================== Scenarios ====================

#[test]
fn scenario_a_two_day_self_service_booking() {
    let engine = engine(store());
    let payload = port_blair("2026-02-01", "2026-02-03", 1);
    let accepted = engine.evaluate(&request(&payload)).unwrap();
    assert_eq!(accepted.rental_days, 2);

    let quotes = PricingEngine::new().quote_for(&accepted, 1);
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].payment_type, "partial");
    assert_eq!(quotes[0].rental_amount, dec!(400));
    assert_eq!(quotes[0].total, dec!(400));
}

#[test]
fn scenario_b_quantity_above_location_cap() {
    let engine = engine(store());
    let reason = rejection(&engine, &port_blair("2026-02-01", "2026-02-03", 3));
    assert_eq!(reason, "Max quantity allowed is 2");
}

#[test]
fn scenario_c_location_blackout_cites_first_date() {
    let engine = engine(store());
    let reason = rejection(&engine, &port_blair("2026-01-24", "2026-01-26", 1));
    assert!(reason.contains("2026-01-24"), "{reason}");
}

#[test]
fn scenario_d_disabled_hotel_pickup() {
    let engine = engine(store());
    let mut payload = port_blair("2026-02-01", "2026-02-03", 1);
    payload["pickupType"] = json!("hotel");
    let reason = rejection(&engine, &payload);
    assert!(reason.starts_with("hotel pickup not available"), "{reason}");
}

#[tokio::test]
async fn scenario_e_disabled_payment_type_lists_labels() {
    let ledger = Arc::new(MockLedger::default());
    let gateway = Arc::new(MockGateway::default());
    let orchestrator = orchestrator(ledger.clone(), gateway.clone());

    let payload = with_order_fields(port_blair("2026-02-01", "2026-02-03", 1), "full");
    let failure = orchestrator.place_order(&payload, false).await.unwrap_err();

    assert_eq!(failure.stage, OrderStage::Received);
    match failure.error {
        AppError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "paymentType");
            assert_eq!(
                errors[0].message,
                "Invalid paymentType. Available options: Pay after confirmation"
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(ledger.orders.lock().is_empty());
}

// ==================== Properties ====================

#[test]
fn quantity_above_combined_ceiling_always_rejected() {
    let engine = engine(store());
    for quantity in 3..=8 {
        let reason = rejection(&engine, &port_blair("2026-02-01", "2026-02-03", quantity));
        assert_eq!(reason, "Max quantity allowed is 2");
    }

    // Havelock caps at 5 per booking and the product at 5; stock is 3
    for quantity in 6..=8 {
        let reason = rejection(&engine, &havelock("2026-02-01", "2026-02-03", quantity));
        assert_eq!(reason, "Max quantity allowed is 5");
    }
}

#[test]
fn quantity_above_stock_rejected() {
    let engine = engine(store());
    let reason = rejection(&engine, &havelock("2026-02-01", "2026-02-03", 4));
    assert_eq!(reason, "Only 3 vehicles available at Havelock");
}

#[test]
fn quotes_are_internally_consistent() {
    let engine = engine(store());
    let pricing = PricingEngine::new();
    for (end, quantity) in [("2026-02-02", 1), ("2026-02-05", 2), ("2026-02-11", 3)] {
        let accepted = engine
            .evaluate(&request(&havelock("2026-02-01", end, quantity)))
            .unwrap();
        for quote in pricing.quote_for(&accepted, quantity) {
            assert!(quote.is_consistent());
            assert_eq!(quote.pickup_charge, dec!(150));
            assert_eq!(
                quote.rental_amount,
                quote.rate_per_day * Decimal::from(accepted.rental_days) * Decimal::from(quantity)
            );
        }
    }
}

#[test]
fn blackout_overlap_is_inclusive() {
    let engine = engine(store());

    let reason = rejection(&engine, &port_blair("2026-01-20", "2026-01-24", 1));
    assert!(reason.contains("2026-01-24"));
    let reason = rejection(&engine, &port_blair("2026-01-25", "2026-01-27", 1));
    assert!(reason.contains("2026-01-25"));

    assert!(engine
        .evaluate(&request(&port_blair("2026-01-20", "2026-01-23", 1)))
        .is_ok());
    assert!(engine
        .evaluate(&request(&port_blair("2026-01-26", "2026-01-28", 1)))
        .is_ok());
}

#[test]
fn location_blackout_reported_over_product_blackout() {
    let engine = engine(store());

    let reason = rejection(&engine, &havelock("2026-03-09", "2026-03-11", 1));
    assert_eq!(reason, "Havelock is not available on 2026-03-10");

    let reason = rejection(&engine, &havelock("2026-03-19", "2026-03-21", 1));
    assert_eq!(reason, "Vehicle Rentals are not available on 2026-03-20");
}

#[test]
fn disabled_entries_never_offered() {
    let orchestrator = orchestrator(
        Arc::new(MockLedger::default()),
        Arc::new(MockGateway::default()),
    );
    let report = orchestrator
        .check_availability(&port_blair("2026-02-01", "2026-02-03", 1))
        .unwrap();

    assert!(report.pricing.iter().all(|q| q.payment_type != "full"));
    assert!(report.delivery_options.iter().all(|o| o.enabled));
    assert_eq!(report.delivery_options.len(), 1);
    assert_eq!(report.drop_options.len(), 2);
    assert_eq!(report.rental_days, 2);
    assert_eq!(report.timings.current, "08:00 AM - 06:00 PM");
}

#[test]
fn advance_buffer_enforced() {
    let engine = engine(store());
    let reason = rejection(
        &engine,
        &port_blair("2026-01-01T12:00:00Z", "2026-01-03T12:00:00Z", 1),
    );
    assert_eq!(reason, "Bookings must be made at least 24 hours in advance");

    assert!(engine
        .evaluate(&request(&port_blair(
            "2026-01-02T00:00:00Z",
            "2026-01-03T00:00:00Z",
            1
        )))
        .is_ok());
}

#[test]
fn advance_buffer_counts_from_start_of_day() {
    let mut catalog = catalog_json();
    catalog["products"][0]["advanceBookingBufferHours"] = json!(48);
    let engine = AvailabilityEngine::new(
        store_from(catalog),
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 22, 16, 0, 0).unwrap())),
        "bike-rentals",
    );

    // 48h from 16:00 lands on 2026-01-24 mid-afternoon; the whole day is bookable
    assert!(engine
        .evaluate(&request(&havelock("2026-01-24", "2026-01-26", 1)))
        .is_ok());

    let reason = rejection(&engine, &havelock("2026-01-23", "2026-01-26", 1));
    assert_eq!(reason, "Bookings must be made at least 48 hours in advance");
}

#[test]
fn minimum_rental_days_enforced() {
    let mut catalog = catalog_json();
    catalog["products"][0]["minRentalDays"] = json!(3);
    let engine = engine(store_from(catalog));

    let reason = rejection(&engine, &port_blair("2026-02-01", "2026-02-03", 1));
    assert_eq!(reason, "Minimum rental duration is 3 day(s)");
}

#[test]
fn same_day_booking_counts_one_day() {
    let engine = engine(store());
    let accepted = engine
        .evaluate(&request(&port_blair(
            "2026-02-01T09:00:00Z",
            "2026-02-01T17:00:00Z",
            1,
        )))
        .unwrap();
    assert_eq!(accepted.rental_days, 1);
}

#[test]
fn self_service_point_must_serve_direction() {
    let engine = engine(store());
    let mut payload = port_blair("2026-02-01", "2026-02-03", 1);
    payload["pickup"] = json!("Jetty");
    assert_eq!(rejection(&engine, &payload), "Invalid pickup point");
}

#[test]
fn unknown_location_is_not_found() {
    let engine = engine(store());
    let mut payload = port_blair("2026-02-01", "2026-02-03", 1);
    payload["locationName"] = json!("Atlantis");
    assert!(matches!(
        engine.evaluate(&request(&payload)),
        Err(AppError::LocationNotFound(_))
    ));
}

// ==================== Orchestration ====================

#[tokio::test]
async fn order_creates_ledger_row_then_gateway_order() {
    let ledger = Arc::new(MockLedger::default());
    let gateway = Arc::new(MockGateway::default());
    let orchestrator = orchestrator(ledger.clone(), gateway.clone());

    let payload = with_order_fields(havelock("2026-02-01", "2026-02-03", 2), "partial");
    let confirmation = orchestrator.place_order(&payload, false).await.unwrap();

    assert_eq!(confirmation.order_id, "ORD-1");
    assert_eq!(confirmation.payment_kind, PaymentKind::Order);
    assert_eq!(confirmation.payment_type_used, "Pay Partial");
    assert_eq!(confirmation.quote.total, dec!(1150));
    assert_eq!(confirmation.payment["receipt"], "ORD-1");

    let rows = ledger.orders.lock();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].start_date, "2026-02-01");
    assert_eq!(rows[0].pricing.payment_type, "partial");

    let orders = gateway.orders.lock();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_id, "ORD-1");
    assert_eq!(orders[0].amount, dec!(1150));
    assert_eq!(orders[0].notes["orderId"], "ORD-1");
    assert_eq!(orders[0].notes["pickup"], "hotel: Sea Shell");
    assert_eq!(orders[0].notes["customerName"], "Asha Rao");
    assert_eq!(orders[0].notes["paymentType"], "Pay Partial");
    assert!(gateway.links.lock().is_empty());
}

#[tokio::test]
async fn order_with_payment_link_uses_ledger_id_as_reference() {
    let ledger = Arc::new(MockLedger::default());
    let gateway = Arc::new(MockGateway::default());
    let orchestrator = orchestrator(ledger.clone(), gateway.clone());

    let payload = with_order_fields(port_blair("2026-02-01", "2026-02-03", 1), "partial");
    let confirmation = orchestrator.place_order(&payload, true).await.unwrap();

    assert_eq!(confirmation.payment_kind, PaymentKind::PaymentLink);
    assert_eq!(confirmation.payment["reference_id"], "ORD-1");
    let links = gateway.links.lock();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].customer.contact(), "+919876543210");
    assert!(gateway.orders.lock().is_empty());
}

#[tokio::test]
async fn ledger_failure_is_fatal_and_skips_gateway() {
    let gateway = Arc::new(MockGateway::default());
    let orchestrator = orchestrator(Arc::new(MockLedger::failing()), gateway.clone());

    let payload = with_order_fields(port_blair("2026-02-01", "2026-02-03", 1), "partial");
    let failure = orchestrator.place_order(&payload, false).await.unwrap_err();

    assert_eq!(failure.stage, OrderStage::Quoted);
    assert!(matches!(failure.error, AppError::Ledger(_)));
    assert_eq!(failure.error.public_message(), "Failed to create order");
    assert!(gateway.orders.lock().is_empty());
}

#[tokio::test]
async fn gateway_failure_keeps_ledger_row_and_runs_hook() {
    let ledger = Arc::new(MockLedger::default());
    let hook = Arc::new(RecordingHook::default());
    let orchestrator = orchestrator(ledger.clone(), Arc::new(MockGateway::failing()))
        .with_failure_hook(hook.clone());

    let payload = with_order_fields(port_blair("2026-02-01", "2026-02-03", 1), "partial");
    let failure = orchestrator.place_order(&payload, false).await.unwrap_err();

    assert_eq!(failure.stage, OrderStage::Persisted);
    assert!(matches!(failure.error, AppError::PaymentGateway(_)));
    assert_eq!(ledger.orders.lock().len(), 1);
    assert_eq!(*hook.calls.lock(), vec!["ORD-1".to_string()]);
}

#[tokio::test]
async fn availability_failure_reports_validated_stage() {
    let ledger = Arc::new(MockLedger::default());
    let orchestrator = orchestrator(ledger.clone(), Arc::new(MockGateway::default()));

    let payload = with_order_fields(port_blair("2026-01-24", "2026-01-26", 1), "partial");
    let failure = orchestrator.place_order(&payload, false).await.unwrap_err();

    assert_eq!(failure.stage, OrderStage::Validated);
    assert!(matches!(failure.error, AppError::Unavailable(_)));
    assert!(ledger.orders.lock().is_empty());
}

/// Stock is a static total with no reservation step, so simultaneous orders
/// are each checked against the full stock. This documents the oversell.
#[tokio::test]
async fn concurrent_orders_can_exceed_static_stock() {
    let ledger = Arc::new(MockLedger::default());
    let orchestrator = orchestrator(ledger.clone(), Arc::new(MockGateway::default()));

    let first = with_order_fields(havelock("2026-02-01", "2026-02-03", 3), "full");
    let second = first.clone();
    let (a, b) = tokio::join!(
        orchestrator.place_order(&first, false),
        orchestrator.place_order(&second, false)
    );

    assert!(a.is_ok() && b.is_ok());
    let booked: u32 = ledger.orders.lock().iter().map(|o| o.quantity).sum();
    assert_eq!(booked, 6);
    assert!(booked > 3, "both orders were accepted against a stock of 3");
}
