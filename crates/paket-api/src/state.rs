//! Shared application state handed to every HTTP handler.

use std::sync::Arc;

use paket_core::DeliveryStore;
use paket_tracking::{DeliveryCreator, WebhookReconciler};

/// Handler state assembled once at startup and cloned per request.
///
/// Every field is an `Arc`, so cloning is cheap and all handlers observe
/// the same store and workflow instances.
#[derive(Clone)]
pub struct AppState {
    /// Delivery persistence, used directly by read-only lookups.
    pub store: Arc<dyn DeliveryStore>,
    /// Delivery creation workflow.
    pub creator: Arc<DeliveryCreator>,
    /// Webhook reconciliation workflow.
    pub reconciler: Arc<WebhookReconciler>,
}

impl AppState {
    /// Bundle the workflows behind the HTTP surface.
    pub fn new(
        store: Arc<dyn DeliveryStore>,
        creator: Arc<DeliveryCreator>,
        reconciler: Arc<WebhookReconciler>,
    ) -> Self {
        Self { store, creator, reconciler }
    }
}
