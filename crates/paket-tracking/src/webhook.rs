//! Webhook reconciliation workflow for push-reconciled carriers.
//!
//! Carriers notify us of shipment progress with a tracking number and a
//! status string. Reconciliation resolves the delivery, parses the status
//! against the closed set, and delegates the actual mutation to the status
//! update workflow. A notification that matches the current status raises
//! [`TrackingError::NoStatusChange`], which the outward boundary treats as
//! a successful no-op so carrier replays stay harmless.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use paket_core::{
    models::{DeliveryId, DeliveryStatus, OrderId},
    storage::DeliveryStore,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{Result, TrackingError},
    status::StatusUpdater,
};

/// Carrier notification as received on the webhook endpoint.
///
/// The status arrives as a raw string and is validated here. No
/// carrier-specific status translation is performed: carriers are expected
/// to speak the canonical status names. The signature is accepted but not
/// yet verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookNotification {
    /// Tracking number the notification refers to.
    pub tracking_number: String,
    /// Reported status in canonical wire form.
    pub status: String,
    /// Carrier-side event time, informational only.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Carrier signature over the payload, currently unverified.
    #[serde(default)]
    pub signature: Option<String>,
}

/// Result of applying a carrier notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookOutcome {
    /// Delivery that was updated.
    pub delivery_id: DeliveryId,
    /// Order the delivery belongs to.
    pub order_id: OrderId,
    /// Tracking number from the notification.
    pub tracking_number: String,
    /// Carrier handling the delivery.
    pub provider: String,
    /// Status before the notification was applied.
    pub previous_status: DeliveryStatus,
    /// Status after the notification was applied.
    pub new_status: DeliveryStatus,
}

/// Applies carrier webhook notifications to stored deliveries.
pub struct WebhookReconciler {
    store: Arc<dyn DeliveryStore>,
    updater: StatusUpdater,
}

impl WebhookReconciler {
    /// Creates the workflow over a store and the shared status updater.
    pub fn new(store: Arc<dyn DeliveryStore>, updater: StatusUpdater) -> Self {
        Self { store, updater }
    }

    /// Reconciles one carrier notification.
    ///
    /// Fails with a not-found error for an unknown tracking number and an
    /// invalid-status error for a status string outside the closed set.
    /// Raises [`TrackingError::NoStatusChange`] when the reported status
    /// equals the stored one; callers decide how to surface that signal.
    pub async fn process(&self, notification: WebhookNotification) -> Result<WebhookOutcome> {
        let delivery = self
            .store
            .find_by_tracking_number(notification.tracking_number.clone())
            .await?
            .ok_or_else(|| TrackingError::not_found(&notification.tracking_number))?;

        let new_status: DeliveryStatus = notification
            .status
            .parse()
            .map_err(|_| TrackingError::invalid_status(&notification.status))?;

        if delivery.status == new_status {
            debug!(
                tracking_number = %notification.tracking_number,
                status = %new_status,
                "webhook reported unchanged status"
            );
            return Err(TrackingError::NoStatusChange {
                delivery_id: delivery.id,
                status: new_status,
            });
        }

        let update = self.updater.update(delivery.id.clone(), new_status).await?;

        info!(
            delivery_id = %update.delivery_id,
            tracking_number = %notification.tracking_number,
            provider = %delivery.provider,
            previous_status = %update.previous_status,
            new_status = %update.new_status,
            "webhook notification applied"
        );

        Ok(WebhookOutcome {
            delivery_id: update.delivery_id,
            order_id: delivery.order_id,
            tracking_number: notification.tracking_number,
            provider: delivery.provider,
            previous_status: update.previous_status,
            new_status: update.new_status,
        })
    }
}
