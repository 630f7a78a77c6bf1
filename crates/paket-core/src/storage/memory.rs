//! In-memory delivery store for tests and offline development.
//!
//! Mirrors the natural-key behavior of the PostgreSQL implementation so
//! workflow tests exercise the same conflict paths without a database.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tokio::sync::RwLock;

use crate::{
    error::CoreError,
    models::{Delivery, DeliveryId, DeliveryStatus, OrderId},
    storage::DeliveryStore,
};

/// Hash-map backed [`DeliveryStore`].
///
/// Cloning is cheap and shares the underlying map, so a test can hold a
/// handle while the system under test owns another.
#[derive(Debug, Default, Clone)]
pub struct MemoryDeliveryStore {
    deliveries: Arc<RwLock<HashMap<DeliveryId, Delivery>>>,
    save_errors: Arc<AtomicBool>,
}

impl MemoryDeliveryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored deliveries.
    pub async fn len(&self) -> usize {
        self.deliveries.read().await.len()
    }

    /// True when the store holds no deliveries.
    pub async fn is_empty(&self) -> bool {
        self.deliveries.read().await.is_empty()
    }

    /// Inserts a delivery directly, bypassing natural-key checks.
    ///
    /// Test setup helper; production code goes through [`DeliveryStore::save`].
    pub async fn add_delivery(&self, delivery: Delivery) {
        self.deliveries.write().await.insert(delivery.id.clone(), delivery);
    }

    /// Makes subsequent saves fail with a database error.
    ///
    /// Used by tests that exercise store-failure propagation.
    pub fn inject_save_error(&self, fail: bool) {
        self.save_errors.store(fail, Ordering::SeqCst);
    }

    /// Returns the stored delivery for `id`, for test assertions.
    pub async fn get(&self, id: &DeliveryId) -> Option<Delivery> {
        self.deliveries.read().await.get(id).cloned()
    }
}

impl DeliveryStore for MemoryDeliveryStore {
    fn save(
        &self,
        delivery: Delivery,
    ) -> Pin<Box<dyn Future<Output = Result<(), CoreError>> + Send + '_>> {
        Box::pin(async move {
            if self.save_errors.load(Ordering::SeqCst) {
                return Err(CoreError::Database("injected save failure".into()));
            }
            let mut map = self.deliveries.write().await;
            for (id, existing) in map.iter() {
                if *id == delivery.id {
                    continue;
                }
                if existing.order_id == delivery.order_id {
                    return Err(CoreError::ConstraintViolation(format!(
                        "duplicate order id: {}",
                        delivery.order_id
                    )));
                }
                if existing.tracking_number == delivery.tracking_number {
                    return Err(CoreError::ConstraintViolation(format!(
                        "duplicate tracking number: {}",
                        delivery.tracking_number
                    )));
                }
            }
            map.insert(delivery.id.clone(), delivery);
            Ok(())
        })
    }

    fn find_by_id(
        &self,
        id: DeliveryId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>> {
        Box::pin(async move { Ok(self.deliveries.read().await.get(&id).cloned()) })
    }

    fn find_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>> {
        Box::pin(async move {
            let map = self.deliveries.read().await;
            Ok(map.values().find(|d| d.order_id == order_id).cloned())
        })
    }

    fn find_by_tracking_number(
        &self,
        tracking_number: String,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>> {
        Box::pin(async move {
            let map = self.deliveries.read().await;
            Ok(map.values().find(|d| d.tracking_number == tracking_number).cloned())
        })
    }

    fn find_by_status(
        &self,
        statuses: Vec<DeliveryStatus>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Delivery>, CoreError>> + Send + '_>> {
        Box::pin(async move {
            let map = self.deliveries.read().await;
            let mut found: Vec<Delivery> =
                map.values().filter(|d| statuses.contains(&d.status)).cloned().collect();
            found.sort_by_key(|d| d.created_at);
            Ok(found)
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::{Address, CustomerInfo};

    fn delivery(order: &str, tracking: &str, status: DeliveryStatus) -> Delivery {
        Delivery::new(
            DeliveryId::from(Uuid::new_v4()),
            OrderId::parse(order).expect("valid order id"),
            "novapost",
            tracking,
            format!("https://api.novapost.com/labels/{tracking}.pdf"),
            status,
            Address {
                street: "1 Harbour Way".into(),
                city: "Gothenburg".into(),
                state: "VG".into(),
                zip_code: "41111".into(),
                country: "SE".into(),
            },
            CustomerInfo {
                name: "Astrid Berg".into(),
                email: "astrid@example.com".into(),
                phone: "+46-70-123-4567".into(),
            },
        )
    }

    #[tokio::test]
    async fn save_then_find_by_every_key() {
        let store = MemoryDeliveryStore::new();
        let d = delivery("ORDER-100", "NOVA100", DeliveryStatus::Confirmed);

        store.save(d.clone()).await.expect("save succeeds");

        let by_id = store.find_by_id(d.id.clone()).await.expect("lookup works");
        assert_eq!(by_id.as_ref().map(|d| d.tracking_number.as_str()), Some("NOVA100"));

        let by_order =
            store.find_by_order_id(d.order_id.clone()).await.expect("lookup works");
        assert_eq!(by_order.as_ref().map(|d| d.id.clone()), Some(d.id.clone()));

        let by_tracking =
            store.find_by_tracking_number("NOVA100".into()).await.expect("lookup works");
        assert_eq!(by_tracking.map(|d| d.id), Some(d.id));
    }

    #[tokio::test]
    async fn absent_records_return_none() {
        let store = MemoryDeliveryStore::new();
        let missing = store
            .find_by_tracking_number("NOVA404".into())
            .await
            .expect("absence is not an error");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn conflicting_order_id_is_a_constraint_violation() {
        let store = MemoryDeliveryStore::new();
        store
            .save(delivery("ORDER-200", "NOVA200", DeliveryStatus::Confirmed))
            .await
            .expect("first save succeeds");

        let clash = delivery("ORDER-200", "NOVA201", DeliveryStatus::Confirmed);
        let err = store.save(clash).await.expect_err("second save conflicts");
        assert!(matches!(err, CoreError::ConstraintViolation(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn conflicting_tracking_number_is_a_constraint_violation() {
        let store = MemoryDeliveryStore::new();
        store
            .save(delivery("ORDER-300", "NOVA300", DeliveryStatus::Confirmed))
            .await
            .expect("first save succeeds");

        let clash = delivery("ORDER-301", "NOVA300", DeliveryStatus::Confirmed);
        let err = store.save(clash).await.expect_err("second save conflicts");
        assert!(matches!(err, CoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn saving_same_delivery_updates_in_place() {
        let store = MemoryDeliveryStore::new();
        let mut d = delivery("ORDER-400", "NOVA400", DeliveryStatus::Confirmed);
        store.save(d.clone()).await.expect("first save succeeds");

        d.update_status(DeliveryStatus::InTransit);
        store.save(d.clone()).await.expect("update succeeds");

        let stored = store.get(&d.id).await.expect("present");
        assert_eq!(stored.status, DeliveryStatus::InTransit);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_by_status_filters_and_sorts_oldest_first() {
        let store = MemoryDeliveryStore::new();
        let first = delivery("ORDER-500", "NOVA500", DeliveryStatus::Confirmed);
        let second = delivery("ORDER-501", "NOVA501", DeliveryStatus::Delivered);
        let third = delivery("ORDER-502", "NOVA502", DeliveryStatus::InTransit);
        store.save(first.clone()).await.expect("save");
        store.save(second).await.expect("save");
        store.save(third.clone()).await.expect("save");

        let pollable =
            store.find_by_status(DeliveryStatus::POLLABLE.to_vec()).await.expect("query works");

        assert_eq!(pollable.len(), 2);
        assert_eq!(pollable[0].id, first.id);
        assert_eq!(pollable[1].id, third.id);
    }

    #[tokio::test]
    async fn injected_save_errors_surface_as_database_errors() {
        let store = MemoryDeliveryStore::new();
        store.inject_save_error(true);

        let err = store
            .save(delivery("ORDER-600", "NOVA600", DeliveryStatus::Confirmed))
            .await
            .expect_err("injected failure");
        assert!(matches!(err, CoreError::Database(_)));

        store.inject_save_error(false);
        store
            .save(delivery("ORDER-600", "NOVA600", DeliveryStatus::Confirmed))
            .await
            .expect("saves again once cleared");
    }
}
