//! Provider registry with availability-aware selection.

use rand::Rng;
use tracing::debug;

use crate::{
    error::{ProviderError, Result},
    provider::ProviderHandle,
};

/// Fixed set of carriers registered at startup.
///
/// Selection is a two-step policy: filter to carriers that currently report
/// themselves available, then pick uniformly at random among the survivors.
/// Randomness spreads load across equivalent carriers; it is not a
/// correctness requirement.
#[derive(Debug)]
pub struct ProviderRegistry {
    providers: Vec<ProviderHandle>,
}

impl ProviderRegistry {
    /// Creates a registry over the given carriers.
    pub fn new(providers: Vec<ProviderHandle>) -> Self {
        Self { providers }
    }

    /// Returns every registered carrier, available or not.
    pub fn all(&self) -> &[ProviderHandle] {
        &self.providers
    }

    /// Resolves a carrier by its stable name.
    pub fn find(&self, name: &str) -> Option<&ProviderHandle> {
        self.providers.iter().find(|provider| provider.name() == name)
    }

    /// Selects an available carrier for a new shipment.
    ///
    /// Fails with [`ProviderError::NoneAvailable`] when every carrier is
    /// down or the registry is empty.
    pub async fn select(&self) -> Result<ProviderHandle> {
        let mut available = Vec::new();
        for provider in &self.providers {
            if provider.is_available().await {
                available.push(provider.clone());
            } else {
                debug!(provider = provider.name(), "skipping unavailable provider");
            }
        }

        if available.is_empty() {
            return Err(ProviderError::NoneAvailable);
        }

        let pick = rand::rng().random_range(0..available.len());
        let selected = available.swap_remove(pick);
        debug!(provider = selected.name(), candidates = available.len() + 1, "selected provider");
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use std::{future::Future, pin::Pin, sync::Arc};

    use chrono::Utc;
    use paket_core::models::{Address, CustomerInfo};
    use paket_core::OrderId;

    use super::*;
    use crate::provider::{ShippingLabel, ShippingProvider};

    struct FixedCarrier {
        name: &'static str,
        available: bool,
    }

    impl ShippingProvider for FixedCarrier {
        fn name(&self) -> &str {
            self.name
        }

        fn is_available(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
            let available = self.available;
            Box::pin(async move { Ok(available) })
        }

        fn generate_label(
            &self,
            _order_id: OrderId,
            _address: Address,
            _customer: CustomerInfo,
        ) -> Pin<Box<dyn Future<Output = Result<ShippingLabel>> + Send + '_>> {
            let name = self.name.to_string();
            Box::pin(async move {
                Ok(ShippingLabel {
                    provider: name.clone(),
                    tracking_number: format!("{name}-1"),
                    label_url: format!("https://labels.{name}.test/1"),
                    estimated_delivery: Utc::now(),
                })
            })
        }
    }

    fn handle(name: &'static str, available: bool) -> ProviderHandle {
        ProviderHandle::Push(Arc::new(FixedCarrier { name, available }))
    }

    #[tokio::test]
    async fn select_skips_unavailable_providers() {
        let registry = ProviderRegistry::new(vec![handle("down", false), handle("up", true)]);

        for _ in 0..10 {
            let selected = registry.select().await.expect("one provider is available");
            assert_eq!(selected.name(), "up");
        }
    }

    #[tokio::test]
    async fn select_fails_when_every_provider_is_down() {
        let registry = ProviderRegistry::new(vec![handle("a", false), handle("b", false)]);

        let error = registry.select().await.expect_err("no provider available");
        assert!(matches!(error, ProviderError::NoneAvailable));
    }

    #[tokio::test]
    async fn select_fails_on_empty_registry() {
        let registry = ProviderRegistry::new(Vec::new());

        let error = registry.select().await.expect_err("empty registry");
        assert!(matches!(error, ProviderError::NoneAvailable));
    }

    #[test]
    fn find_resolves_by_stable_name() {
        let registry =
            ProviderRegistry::new(vec![handle("novapost", true), handle("swiftline", true)]);

        assert!(registry.find("novapost").is_some());
        assert!(registry.find("swiftline").is_some());
        assert!(registry.find("unknown").is_none());
        assert_eq!(registry.all().len(), 2);
    }
}
