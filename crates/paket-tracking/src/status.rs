//! Status update workflow, the single transition point for deliveries.
//!
//! Every status mutation in the system funnels through [`StatusUpdater`]:
//! webhook reconciliation and the polling sync engine both delegate here
//! instead of touching the entity themselves. The workflow is deliberately
//! permissive and rejects no transition; callers that need a policy apply
//! it before delegating.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use paket_core::{
    models::{DeliveryId, DeliveryStatus},
    storage::DeliveryStore,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TrackingError};

/// Outcome of a status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Delivery that was updated.
    pub delivery_id: DeliveryId,
    /// Status before the update.
    pub previous_status: DeliveryStatus,
    /// Status after the update.
    pub new_status: DeliveryStatus,
    /// Mutation timestamp recorded on the delivery.
    pub updated_at: DateTime<Utc>,
}

/// Applies status transitions to stored deliveries.
#[derive(Clone)]
pub struct StatusUpdater {
    store: Arc<dyn DeliveryStore>,
}

impl StatusUpdater {
    /// Creates the workflow over a delivery store.
    pub fn new(store: Arc<dyn DeliveryStore>) -> Self {
        Self { store }
    }

    /// Loads a delivery, overwrites its status, and persists it.
    ///
    /// Fails with a not-found error when the id matches nothing. The
    /// target status is applied even when it equals the current one;
    /// callers that want same-status no-ops check before delegating.
    pub async fn update(
        &self,
        delivery_id: DeliveryId,
        status: DeliveryStatus,
    ) -> Result<StatusUpdate> {
        let mut delivery = self
            .store
            .find_by_id(delivery_id.clone())
            .await?
            .ok_or_else(|| TrackingError::not_found(delivery_id.as_str()))?;

        let previous_status = delivery.status;
        delivery.update_status(status);
        self.store.save(delivery.clone()).await?;

        info!(
            delivery_id = %delivery.id,
            previous_status = %previous_status,
            new_status = %delivery.status,
            "delivery status updated"
        );

        Ok(StatusUpdate {
            delivery_id: delivery.id,
            previous_status,
            new_status: delivery.status,
            updated_at: delivery.updated_at,
        })
    }
}
