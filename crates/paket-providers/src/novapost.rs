//! NovaPost carrier simulator, the poll-reconciled reference provider.
//!
//! Approximates a real carrier API: availability hovers around 90%, label
//! purchase takes 100-300 ms and fails about 5% of the time, and tracking
//! queries fail about 2% of the time. Randomized behavior is interface
//! surface for exercising the rest of the system, not business logic.

use std::{future::Future, pin::Pin, time::Duration};

use chrono::Utc;
use paket_core::models::{Address, CustomerInfo, DeliveryStatus, TrackingStatus};
use paket_core::OrderId;
use rand::Rng;

use crate::{
    error::{ProviderError, Result},
    provider::{PullProvider, ShippingLabel, ShippingProvider},
};

/// Simulated poll-reconciled carrier.
#[derive(Debug, Clone, Default)]
pub struct NovaPost {
    availability_override: Option<bool>,
}

impl NovaPost {
    /// Stable registry name of this carrier.
    pub const NAME: &'static str = "novapost";

    /// Creates the simulator with randomized availability.
    pub fn new() -> Self {
        Self { availability_override: None }
    }

    /// Creates the simulator with a fixed availability answer.
    ///
    /// Used for deterministic wiring in tests and demos.
    pub fn with_availability(available: bool) -> Self {
        Self { availability_override: Some(available) }
    }

    fn label_latency() -> Duration {
        Duration::from_millis(rand::rng().random_range(100..=300))
    }
}

impl ShippingProvider for NovaPost {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_available(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        let available =
            self.availability_override.unwrap_or_else(|| rand::rng().random_bool(0.90));
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
        let latency = Self::label_latency();
        let fails = rand::rng().random_bool(0.05);
        let suffix: u16 = rand::rng().random_range(0..10000);
        let transit_days = i64::from(rand::rng().random_range(2_u8..=4));

        Box::pin(async move {
            tokio::time::sleep(latency).await;

            if fails {
                return Err(ProviderError::unavailable(
                    Self::NAME,
                    "label API temporarily unavailable",
                ));
            }

            let tracking_number =
                format!("NOVA{}{suffix:04}", Utc::now().timestamp_millis());
            Ok(ShippingLabel {
                provider: Self::NAME.to_string(),
                label_url: format!(
                    "https://api.novapost-shipping.com/labels/{tracking_number}.pdf"
                ),
                tracking_number,
                estimated_delivery: Utc::now() + chrono::Duration::days(transit_days),
            })
        })
    }
}

impl PullProvider for NovaPost {
    fn tracking_status(
        &self,
        tracking_number: String,
    ) -> Pin<Box<dyn Future<Output = Result<TrackingStatus>> + Send + '_>> {
        let fails = rand::rng().random_bool(0.02);
        // Progression skews toward later states: 30% confirmed, 40% in
        // transit, 30% delivered.
        let draw: f64 = rand::rng().random();

        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;

            if fails {
                return Err(ProviderError::unavailable(
                    Self::NAME,
                    "tracking API temporarily unavailable",
                ));
            }

            let status = if draw < 0.3 {
                DeliveryStatus::Confirmed
            } else if draw < 0.7 {
                DeliveryStatus::InTransit
            } else {
                DeliveryStatus::Delivered
            };

            Ok(TrackingStatus {
                tracking_number,
                status,
                updated_at: Utc::now(),
                provider: Self::NAME.to_string(),
            })
        })
    }
}
