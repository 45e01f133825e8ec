//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::{CustomerOrchestrator, PaymentOrchestrator, WebhookDispatcher};
use crate::config::StripeSettings;

/// Cloned per request; everything inside is Arc-shared.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerOrchestrator>,
    pub payments: Arc<PaymentOrchestrator>,
    pub dispatcher: Arc<WebhookDispatcher>,
    pub stripe: StripeSettings,
}
