//! Delivery creation workflow.
//!
//! Turns an incoming order into a confirmed delivery: validate the order
//! id, reject duplicates, pick an available carrier, purchase a label, and
//! persist the result. Nothing is persisted until a label exists, so a
//! failed carrier call leaves no partial state behind.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use paket_core::{
    models::{Address, CustomerInfo, Delivery, DeliveryId, DeliveryStatus, OrderId},
    storage::DeliveryStore,
    CoreError, IdProvider,
};
use paket_providers::ProviderRegistry;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TrackingError};

/// Input for the creation workflow.
///
/// The order id arrives as a raw string and is validated here; address and
/// customer fields are carried through to the carrier and the stored
/// delivery unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeliveryRequest {
    /// Raw order identifier as submitted by the caller.
    pub order_id: String,
    /// Destination address for the shipment.
    pub shipping_address: Address,
    /// Recipient contact details.
    pub customer_info: CustomerInfo,
}

/// Label summary returned when a delivery is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryLabel {
    /// Identifier of the newly created delivery.
    pub delivery_id: DeliveryId,
    /// Order the delivery belongs to.
    pub order_id: OrderId,
    /// Carrier that issued the label.
    pub provider: String,
    /// URL of the printable label.
    pub label_url: String,
    /// Carrier-assigned tracking number.
    pub tracking_number: String,
    /// Carrier's delivery estimate at purchase time.
    pub estimated_delivery: DateTime<Utc>,
    /// Status of the stored delivery, always confirmed on creation.
    pub status: DeliveryStatus,
}

/// Creates deliveries from incoming orders.
pub struct DeliveryCreator {
    store: Arc<dyn DeliveryStore>,
    registry: Arc<ProviderRegistry>,
    ids: Arc<dyn IdProvider>,
}

impl DeliveryCreator {
    /// Creates the workflow over a store, a carrier registry, and an id
    /// source.
    pub fn new(
        store: Arc<dyn DeliveryStore>,
        registry: Arc<ProviderRegistry>,
        ids: Arc<dyn IdProvider>,
    ) -> Self {
        Self { store, registry, ids }
    }

    /// Runs the creation workflow end to end.
    ///
    /// Fails with a validation error for a malformed order id, a
    /// duplicate-order error when the order already has a delivery, and
    /// provider errors when no carrier can issue a label. Store conflicts
    /// on save also surface as duplicate-order, covering the race where a
    /// concurrent request wins between the lookup and the insert.
    pub async fn create(&self, request: CreateDeliveryRequest) -> Result<DeliveryLabel> {
        let order_id = OrderId::parse(request.order_id)
            .map_err(|error| TrackingError::validation("order_id", error.to_string()))?;

        if self.store.find_by_order_id(order_id.clone()).await?.is_some() {
            warn!(order_id = %order_id, "rejected duplicate order");
            return Err(TrackingError::duplicate_order(order_id.as_str()));
        }

        let provider = self.registry.select().await?;
        let label = provider
            .generate_label(
                order_id.clone(),
                request.shipping_address.clone(),
                request.customer_info.clone(),
            )
            .await?;

        let delivery = Delivery::new(
            self.ids.new_delivery_id(),
            order_id,
            label.provider,
            label.tracking_number,
            label.label_url,
            DeliveryStatus::Confirmed,
            request.shipping_address,
            request.customer_info,
        );

        match self.store.save(delivery.clone()).await {
            Ok(()) => {},
            Err(CoreError::ConstraintViolation(message)) => {
                warn!(order_id = %delivery.order_id, %message, "lost creation race");
                return Err(TrackingError::duplicate_order(delivery.order_id.as_str()));
            },
            Err(other) => return Err(other.into()),
        }

        info!(
            delivery_id = %delivery.id,
            order_id = %delivery.order_id,
            provider = %delivery.provider,
            tracking_number = %delivery.tracking_number,
            "delivery created"
        );

        Ok(DeliveryLabel {
            delivery_id: delivery.id,
            order_id: delivery.order_id,
            provider: delivery.provider,
            label_url: delivery.label_url,
            tracking_number: delivery.tracking_number,
            estimated_delivery: label.estimated_delivery,
            status: delivery.status,
        })
    }
}
