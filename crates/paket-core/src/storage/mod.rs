//! Persistence abstraction for deliveries.
//!
//! The store contract returns boxed futures so the PostgreSQL-backed
//! implementation and the in-memory test implementation stay object safe
//! behind `Arc<dyn DeliveryStore>`. Absence of a record is `None`, never an
//! error; only real failures surface as [`CoreError`].

use std::{future::Future, pin::Pin};

use crate::{
    error::CoreError,
    models::{Delivery, DeliveryId, DeliveryStatus, OrderId},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryDeliveryStore;
pub use postgres::PgDeliveryStore;

/// Object-safe persistence contract for deliveries.
///
/// `save` is an insert-or-update keyed on the delivery id. When a natural
/// key (order id or tracking number) already belongs to a *different*
/// delivery, it fails with [`CoreError::ConstraintViolation`]; saving the
/// same delivery id again updates the mutable fields in place.
pub trait DeliveryStore: Send + Sync + 'static {
    /// Inserts or updates a delivery.
    fn save(
        &self,
        delivery: Delivery,
    ) -> Pin<Box<dyn Future<Output = Result<(), CoreError>> + Send + '_>>;

    /// Looks up a delivery by its identifier.
    fn find_by_id(
        &self,
        id: DeliveryId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>>;

    /// Looks up the delivery created for an order, if any.
    fn find_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>>;

    /// Looks up a delivery by its carrier tracking number.
    fn find_by_tracking_number(
        &self,
        tracking_number: String,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>>;

    /// Returns all deliveries whose status is in `statuses`, oldest first.
    fn find_by_status(
        &self,
        statuses: Vec<DeliveryStatus>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Delivery>, CoreError>> + Send + '_>>;
}
