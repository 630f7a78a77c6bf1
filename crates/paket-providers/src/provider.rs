//! Shipping provider traits and the push/pull capability split.
//!
//! Every carrier integration implements [`ShippingProvider`]. Carriers that
//! expose a tracking query additionally implement [`PullProvider`], and the
//! split is carried in the type system by [`ProviderHandle`] so callers never
//! probe capabilities at runtime: a handle is either `Push` or `Pull`, decided
//! at registration time.

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use chrono::{DateTime, Utc};
use paket_core::models::{Address, CustomerInfo, TrackingStatus};
use paket_core::OrderId;
use tracing::debug;

use crate::error::Result;

/// A purchased shipping label returned by a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingLabel {
    /// Stable name of the carrier that issued the label.
    pub provider: String,
    /// Carrier-assigned tracking number, unique per label.
    pub tracking_number: String,
    /// URL where the printable label can be fetched.
    pub label_url: String,
    /// Carrier's delivery estimate at purchase time.
    pub estimated_delivery: DateTime<Utc>,
}

/// Base contract every carrier integration implements.
///
/// Label generation is fallible and must not leave partial state behind:
/// a failed call means no label exists and nothing was reserved.
pub trait ShippingProvider: Send + Sync + 'static {
    /// Stable identifier for this carrier, used for registry lookup and
    /// recorded on every delivery it labels.
    fn name(&self) -> &str;

    /// Reports whether the carrier can currently accept label requests.
    ///
    /// Callers treat a failed check the same as an unavailable carrier.
    fn is_available(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>>;

    /// Purchases a shipping label for the given order.
    ///
    /// Tracking numbers are unique per call.
    fn generate_label(
        &self,
        order_id: OrderId,
        address: Address,
        customer: CustomerInfo,
    ) -> Pin<Box<dyn Future<Output = Result<ShippingLabel>> + Send + '_>>;
}

/// Extended contract for carriers that can be polled for tracking state.
pub trait PullProvider: ShippingProvider {
    /// Queries the carrier for the current state of a shipment.
    fn tracking_status(
        &self,
        tracking_number: String,
    ) -> Pin<Box<dyn Future<Output = Result<TrackingStatus>> + Send + '_>>;
}

/// Reconciliation mode of a registered provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Carrier notifies us via webhooks; never polled.
    Push,
    /// Carrier is polled for tracking state by the sync engine.
    Pull,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Pull => write!(f, "pull"),
        }
    }
}

/// A registered provider tagged with its reconciliation mode.
#[derive(Clone)]
pub enum ProviderHandle {
    /// Webhook-reconciled carrier.
    Push(Arc<dyn ShippingProvider>),
    /// Poll-reconciled carrier.
    Pull(Arc<dyn PullProvider>),
}

impl ProviderHandle {
    /// Stable name of the underlying carrier.
    pub fn name(&self) -> &str {
        match self {
            Self::Push(provider) => provider.name(),
            Self::Pull(provider) => provider.name(),
        }
    }

    /// Reconciliation mode of the underlying carrier.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Push(_) => ProviderKind::Push,
            Self::Pull(_) => ProviderKind::Pull,
        }
    }

    /// Returns the pull-capable view of this provider, if it has one.
    pub fn as_pull(&self) -> Option<&dyn PullProvider> {
        match self {
            Self::Push(_) => None,
            Self::Pull(provider) => Some(provider.as_ref()),
        }
    }

    /// Availability check that treats carrier errors as unavailable.
    pub async fn is_available(&self) -> bool {
        let check = match self {
            Self::Push(provider) => provider.is_available(),
            Self::Pull(provider) => provider.is_available(),
        };
        match check.await {
            Ok(available) => available,
            Err(error) => {
                debug!(provider = self.name(), error = %error, "availability check failed");
                false
            },
        }
    }

    /// Purchases a label from the underlying carrier.
    pub async fn generate_label(
        &self,
        order_id: OrderId,
        address: Address,
        customer: CustomerInfo,
    ) -> Result<ShippingLabel> {
        match self {
            Self::Push(provider) => provider.generate_label(order_id, address, customer).await,
            Self::Pull(provider) => provider.generate_label(order_id, address, customer).await,
        }
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use paket_core::models::DeliveryStatus;

    use super::*;
    use crate::error::ProviderError;

    struct FlakyCarrier {
        fail_check: bool,
    }

    impl ShippingProvider for FlakyCarrier {
        fn name(&self) -> &str {
            "flaky"
        }

        fn is_available(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
            let fail = self.fail_check;
            Box::pin(async move {
                if fail {
                    Err(ProviderError::unavailable("flaky", "status endpoint down"))
                } else {
                    Ok(true)
                }
            })
        }

        fn generate_label(
            &self,
            order_id: OrderId,
            _address: Address,
            _customer: CustomerInfo,
        ) -> Pin<Box<dyn Future<Output = Result<ShippingLabel>> + Send + '_>> {
            Box::pin(async move {
                Ok(ShippingLabel {
                    provider: "flaky".to_string(),
                    tracking_number: format!("FLK-{order_id}"),
                    label_url: "https://labels.flaky.test/1".to_string(),
                    estimated_delivery: Utc::now(),
                })
            })
        }
    }

    impl PullProvider for FlakyCarrier {
        fn tracking_status(
            &self,
            tracking_number: String,
        ) -> Pin<Box<dyn Future<Output = Result<TrackingStatus>> + Send + '_>> {
            Box::pin(async move {
                Ok(TrackingStatus {
                    tracking_number,
                    status: DeliveryStatus::InTransit,
                    updated_at: Utc::now(),
                    provider: "flaky".to_string(),
                })
            })
        }
    }

    #[tokio::test]
    async fn availability_errors_read_as_unavailable() {
        let handle = ProviderHandle::Pull(Arc::new(FlakyCarrier { fail_check: true }));
        assert!(!handle.is_available().await);

        let handle = ProviderHandle::Pull(Arc::new(FlakyCarrier { fail_check: false }));
        assert!(handle.is_available().await);
    }

    #[tokio::test]
    async fn handle_kind_matches_registration() {
        let push = ProviderHandle::Push(Arc::new(FlakyCarrier { fail_check: false }));
        let pull = ProviderHandle::Pull(Arc::new(FlakyCarrier { fail_check: false }));

        assert_eq!(push.kind(), ProviderKind::Push);
        assert_eq!(pull.kind(), ProviderKind::Pull);
        assert!(push.as_pull().is_none());
        assert!(pull.as_pull().is_some());
    }

    #[tokio::test]
    async fn pull_view_reaches_tracking_query() {
        let handle = ProviderHandle::Pull(Arc::new(FlakyCarrier { fail_check: false }));
        let provider = handle.as_pull().expect("registered as pull");

        let status = provider
            .tracking_status("FLK-TEST".to_string())
            .await
            .expect("tracking query succeeds");
        assert_eq!(status.status, DeliveryStatus::InTransit);
        assert_eq!(status.tracking_number, "FLK-TEST");
    }
}
