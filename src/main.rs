//! Rentflow booking server
//!
//! Serves availability checks and order placement for rental locations,
//! backed by a static catalog, an order ledger and a payment gateway.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use anyhow::Context;
use rentflow_api::{configure_routes, json_config, query_config, AppState};
use rentflow_core::{
    traits::{OrderLedger, SystemClock},
    AppConfig,
};
use rentflow_gateway::{InMemoryLedger, RazorpayClient, SheetsLedger};
use rentflow_services::{ConfigStore, OrderOrchestrator, OrderSettings};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rentflow={},rentflow_api={},rentflow_services={},rentflow_gateway={},actix_web=info",
            log_level, log_level, log_level, log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer).init();
    }
}

/// Sheets ledger when configured, otherwise rows are kept in memory
fn build_ledger(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderLedger>> {
    match &config.sheets {
        Some(sheets) => {
            let ledger = SheetsLedger::new(sheets).context("failed to build Sheets ledger")?;
            info!(spreadsheet = %sheets.spreadsheet_id, "Using Google Sheets order ledger");
            Ok(Arc::new(ledger))
        }
        None => {
            warn!("No sheets configured; orders are kept in memory and lost on restart");
            Ok(Arc::new(InMemoryLedger::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting Rentflow v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("failed to load configuration")?;

    let store = Arc::new(
        ConfigStore::from_path(&config.catalog.path).context("failed to load catalog")?,
    );
    let summary = store.summary();
    info!(
        locations = summary.total_locations,
        total_stock = summary.total_stock,
        "Catalog ready from {}",
        config.catalog.path
    );

    let ledger = build_ledger(&config)?;

    if config.razorpay.key_id.is_empty() || config.razorpay.key_secret.is_empty() {
        warn!("Razorpay credentials are not set; payment initiation will fail");
    }
    if config.razorpay.webhook_secret.is_empty() {
        warn!("Razorpay webhook secret is not set; every webhook will be rejected");
    }
    let gateway = Arc::new(
        RazorpayClient::new(&config.razorpay).context("failed to build Razorpay client")?,
    );

    let orchestrator = OrderOrchestrator::new(
        store.clone(),
        Arc::new(SystemClock),
        ledger.clone(),
        gateway.clone(),
        OrderSettings {
            product_type: config.booking.product_type.clone(),
            currency: config.booking.currency.clone(),
        },
    )
    .context("failed to build order orchestrator")?;

    let state = web::Data::new(AppState::new(
        store,
        Arc::new(orchestrator),
        gateway,
        ledger,
    ));

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    let cors_origins = config.server.cors_origins.clone();
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    HttpServer::new(move || {
        let origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                origin
                    .to_str()
                    .map(|o| origins.split(',').any(|allowed| allowed.trim() == o))
                    .unwrap_or(false)
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .app_data(query_config())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)
    .with_context(|| format!("failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
