//! PostgreSQL-backed delivery store.
//!
//! Deliveries live in a single `deliveries` table: TEXT identifiers, TEXT
//! status, JSONB address and customer columns, TIMESTAMPTZ timestamps.
//! Unique indexes on `order_id` and `tracking_number` enforce the
//! natural-key invariants; conflicts surface as
//! [`CoreError::ConstraintViolation`] through the `sqlx::Error` conversion.

use std::{future::Future, pin::Pin};

use sqlx::{postgres::PgRow, types::Json, FromRow, PgPool, Row};

use crate::{
    error::CoreError,
    models::{Address, CustomerInfo, Delivery, DeliveryId, DeliveryStatus, OrderId},
    storage::DeliveryStore,
};

/// [`DeliveryStore`] implementation over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgDeliveryStore {
    pool: PgPool,
}

impl PgDeliveryStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FromRow<'_, PgRow> for Delivery {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            provider: row.try_get("provider")?,
            tracking_number: row.try_get("tracking_number")?,
            status: row.try_get("status")?,
            label_url: row.try_get("label_url")?,
            shipping_address: row.try_get::<Json<Address>, _>("shipping_address")?.0,
            customer_info: row.try_get::<Json<CustomerInfo>, _>("customer_info")?.0,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl DeliveryStore for PgDeliveryStore {
    fn save(
        &self,
        delivery: Delivery,
    ) -> Pin<Box<dyn Future<Output = Result<(), CoreError>> + Send + '_>> {
        Box::pin(async move {
            sqlx::query(
                r#"
                INSERT INTO deliveries (
                    id, order_id, provider, tracking_number, status, label_url,
                    shipping_address, customer_info, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (id) DO UPDATE
                SET status = EXCLUDED.status,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(&delivery.id)
            .bind(&delivery.order_id)
            .bind(&delivery.provider)
            .bind(&delivery.tracking_number)
            .bind(delivery.status)
            .bind(&delivery.label_url)
            .bind(Json(&delivery.shipping_address))
            .bind(Json(&delivery.customer_info))
            .bind(delivery.created_at)
            .bind(delivery.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }

    fn find_by_id(
        &self,
        id: DeliveryId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>> {
        Box::pin(async move {
            let delivery = sqlx::query_as::<_, Delivery>(
                r#"
                SELECT id, order_id, provider, tracking_number, status, label_url,
                       shipping_address, customer_info, created_at, updated_at
                FROM deliveries
                WHERE id = $1
                "#,
            )
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(delivery)
        })
    }

    fn find_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>> {
        Box::pin(async move {
            let delivery = sqlx::query_as::<_, Delivery>(
                r#"
                SELECT id, order_id, provider, tracking_number, status, label_url,
                       shipping_address, customer_info, created_at, updated_at
                FROM deliveries
                WHERE order_id = $1
                "#,
            )
            .bind(&order_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(delivery)
        })
    }

    fn find_by_tracking_number(
        &self,
        tracking_number: String,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Delivery>, CoreError>> + Send + '_>> {
        Box::pin(async move {
            let delivery = sqlx::query_as::<_, Delivery>(
                r#"
                SELECT id, order_id, provider, tracking_number, status, label_url,
                       shipping_address, customer_info, created_at, updated_at
                FROM deliveries
                WHERE tracking_number = $1
                "#,
            )
            .bind(&tracking_number)
            .fetch_optional(&self.pool)
            .await?;
            Ok(delivery)
        })
    }

    fn find_by_status(
        &self,
        statuses: Vec<DeliveryStatus>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Delivery>, CoreError>> + Send + '_>> {
        Box::pin(async move {
            let names: Vec<String> =
                statuses.iter().map(|status| status.as_str().to_owned()).collect();
            let deliveries = sqlx::query_as::<_, Delivery>(
                r#"
                SELECT id, order_id, provider, tracking_number, status, label_url,
                       shipping_address, customer_info, created_at, updated_at
                FROM deliveries
                WHERE status = ANY($1)
                ORDER BY created_at ASC
                "#,
            )
            .bind(&names)
            .fetch_all(&self.pool)
            .await?;
            Ok(deliveries)
        })
    }
}
