//! Identifier generation for new deliveries.

use uuid::Uuid;

use crate::models::DeliveryId;

/// Source of fresh delivery identifiers.
///
/// Injected into the creation workflow so tests can mint predictable ids
/// while production uses random UUIDs.
pub trait IdProvider: Send + Sync + 'static {
    /// Returns a new, globally unique delivery id.
    fn new_delivery_id(&self) -> DeliveryId;
}

/// Default provider backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdProvider;

impl UuidIdProvider {
    /// Creates the provider.
    pub fn new() -> Self {
        Self
    }
}

impl IdProvider for UuidIdProvider {
    fn new_delivery_id(&self) -> DeliveryId {
        DeliveryId::from(Uuid::new_v4())
    }
}
