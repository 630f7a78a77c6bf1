//! SwiftLine carrier simulator, the webhook-reconciled reference provider.
//!
//! Push-only counterpart to NovaPost: it issues labels but exposes no
//! tracking query, so shipments it carries are updated exclusively through
//! carrier webhooks. Availability hovers around 85% and label purchase
//! takes 50-200 ms with an 8% failure rate.

use std::{future::Future, pin::Pin, time::Duration};

use chrono::Utc;
use paket_core::models::{Address, CustomerInfo};
use paket_core::OrderId;
use rand::Rng;

use crate::{
    error::{ProviderError, Result},
    provider::{ShippingLabel, ShippingProvider},
};

/// Simulated webhook-reconciled carrier.
#[derive(Debug, Clone, Default)]
pub struct SwiftLine {
    availability_override: Option<bool>,
}

impl SwiftLine {
    /// Stable registry name of this carrier.
    pub const NAME: &'static str = "swiftline";

    /// Creates the simulator with randomized availability.
    pub fn new() -> Self {
        Self { availability_override: None }
    }

    /// Creates the simulator with a fixed availability answer.
    pub fn with_availability(available: bool) -> Self {
        Self { availability_override: Some(available) }
    }
}

impl ShippingProvider for SwiftLine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_available(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        let available =
            self.availability_override.unwrap_or_else(|| rand::rng().random_bool(0.85));
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(available)
        })
    }

    fn generate_label(
        &self,
        _order_id: OrderId,
        _address: Address,
        _customer: CustomerInfo,
    ) -> Pin<Box<dyn Future<Output = Result<ShippingLabel>> + Send + '_>> {
        let latency = Duration::from_millis(rand::rng().random_range(50..=200));
        let fails = rand::rng().random_bool(0.08);
        let suffix: u16 = rand::rng().random_range(0..10000);
        let transit_days = i64::from(rand::rng().random_range(1_u8..=4));

        Box::pin(async move {
            tokio::time::sleep(latency).await;

            if fails {
                return Err(ProviderError::unavailable(
                    Self::NAME,
                    "label API temporarily unavailable",
                ));
            }

            let tracking_number =
                format!("SWL{}{suffix:04}", Utc::now().timestamp_millis());
            Ok(ShippingLabel {
                provider: Self::NAME.to_string(),
                label_url: format!(
                    "https://api.swiftline-logistics.com/shipping-labels/{tracking_number}.pdf"
                ),
                tracking_number,
                estimated_delivery: Utc::now() + chrono::Duration::days(transit_days),
            })
        })
    }
}
