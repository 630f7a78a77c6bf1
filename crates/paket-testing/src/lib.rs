//! Test infrastructure for the delivery tracker.
//!
//! Provides fixture builders, scripted providers, and a ready-made
//! in-memory environment wiring the real workflows over a
//! [`MemoryDeliveryStore`] and a [`TestClock`]. Tests stay deterministic:
//! no database, no network, no wall-clock sleeps.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use paket_core::{
    models::Delivery,
    storage::{DeliveryStore, MemoryDeliveryStore},
    time::TestClock,
    UuidIdProvider,
};
use paket_providers::{ProviderHandle, ProviderRegistry};
use paket_tracking::{
    DeliveryCreator, StatusUpdater, SyncConfig, SyncEngine, WebhookReconciler,
};

pub mod fixtures;
pub mod providers;

pub use fixtures::{sample_address, sample_customer, DeliveryBuilder};
pub use providers::{ScriptedPullProvider, ScriptedPushProvider};

/// In-memory test environment wiring the real workflows.
///
/// Registers one scripted pull carrier under the name `novapost` and one
/// scripted push carrier under `swiftline`, matching the production
/// wiring so builder defaults resolve against the registry.
pub struct TestEnv {
    /// Shared in-memory store backing every workflow.
    pub store: Arc<MemoryDeliveryStore>,
    /// Deterministic clock for sync engine scheduling.
    pub clock: Arc<TestClock>,
    /// Scripted pull carrier registered as `novapost`.
    pub pull_provider: Arc<ScriptedPullProvider>,
    /// Scripted push carrier registered as `swiftline`.
    pub push_provider: Arc<ScriptedPushProvider>,
    registry: Arc<ProviderRegistry>,
}

impl TestEnv {
    /// Creates a fresh environment with both carriers available.
    pub fn new() -> Self {
        let store = Arc::new(MemoryDeliveryStore::new());
        let clock = Arc::new(TestClock::new());
        let pull_provider = Arc::new(ScriptedPullProvider::new("novapost"));
        let push_provider = Arc::new(ScriptedPushProvider::new("swiftline"));
        let registry = Arc::new(ProviderRegistry::new(vec![
            ProviderHandle::Pull(pull_provider.clone()),
            ProviderHandle::Push(push_provider.clone()),
        ]));

        Self { store, clock, pull_provider, push_provider, registry }
    }

    /// The provider registry shared by creation and sync.
    pub fn registry(&self) -> Arc<ProviderRegistry> {
        Arc::clone(&self.registry)
    }

    /// Store handle as the object-safe trait the workflows consume.
    pub fn store_handle(&self) -> Arc<dyn DeliveryStore> {
        self.store.clone()
    }

    /// Builds the creation workflow.
    pub fn creator(&self) -> DeliveryCreator {
        DeliveryCreator::new(
            self.store_handle(),
            self.registry(),
            Arc::new(UuidIdProvider::new()),
        )
    }

    /// Builds the status update workflow.
    pub fn updater(&self) -> StatusUpdater {
        StatusUpdater::new(self.store_handle())
    }

    /// Builds the webhook reconciliation workflow.
    pub fn reconciler(&self) -> WebhookReconciler {
        WebhookReconciler::new(self.store_handle(), self.updater())
    }

    /// Builds a sync engine over this environment's clock.
    pub fn sync_engine(&self, config: SyncConfig) -> SyncEngine {
        SyncEngine::new(
            self.store_handle(),
            self.registry(),
            self.updater(),
            self.clock.clone(),
            config,
        )
    }

    /// Saves a delivery directly, bypassing the creation workflow.
    ///
    /// Panics on store conflicts; environments are test code and fail
    /// loudly.
    pub async fn insert_delivery(&self, delivery: Delivery) {
        self.store.save(delivery).await.expect("insert test delivery");
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
