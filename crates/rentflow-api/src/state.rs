//! Shared application state

use rentflow_core::traits::{OrderLedger, PaymentGateway};
use rentflow_services::{ConfigStore, OrderOrchestrator};
use std::sync::Arc;

/// Services shared by every worker
///
/// Registered once as `web::Data<AppState>`; everything inside is either
/// immutable or internally synchronized.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub orchestrator: Arc<OrderOrchestrator>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub ledger: Arc<dyn OrderLedger>,
}

impl AppState {
    pub fn new(
        store: Arc<ConfigStore>,
        orchestrator: Arc<OrderOrchestrator>,
        gateway: Arc<dyn PaymentGateway>,
        ledger: Arc<dyn OrderLedger>,
    ) -> Self {
        Self {
            store,
            orchestrator,
            gateway,
            ledger,
        }
    }
}
