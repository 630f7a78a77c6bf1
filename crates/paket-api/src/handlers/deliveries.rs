//! Delivery creation and status lookup handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use paket_core::models::{DeliveryId, DeliveryStatus, OrderId};
use paket_tracking::{CreateDeliveryRequest, TrackingError};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::{handlers::create_error_response, state::AppState};

/// Response body for the status lookup endpoint.
#[derive(Debug, Serialize)]
pub struct DeliveryStatusResponse {
    /// Delivery identifier
    pub delivery_id: DeliveryId,
    /// Originating order
    pub order_id: OrderId,
    /// Carrier handling the shipment
    pub provider: String,
    /// Carrier tracking number
    pub tracking_number: String,
    /// Current lifecycle status
    pub status: DeliveryStatus,
    /// When the delivery was created
    pub created_at: DateTime<Utc>,
    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}

/// Creates a delivery for an order.
///
/// Validates the order id, selects an available carrier, purchases a
/// shipping label, and persists the confirmed delivery.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 409: A delivery already exists for the order
/// - 422: Order id failed validation
/// - 503: No carrier available or label purchase failed
/// - 500: Store errors
#[instrument(name = "create_delivery", skip(state, request), fields(order_id = %request.order_id))]
pub async fn create_delivery(
    State(state): State<AppState>,
    Json(request): Json<CreateDeliveryRequest>,
) -> Response {
    info!("Processing delivery creation request");

    match state.creator.create(request).await {
        Ok(label) => {
            info!(
                delivery_id = %label.delivery_id,
                tracking_number = %label.tracking_number,
                "Delivery created"
            );
            (StatusCode::CREATED, Json(label)).into_response()
        },
        Err(error @ TrackingError::Store(_)) => {
            error!(error = %error, "Delivery creation failed");
            create_error_response(&error)
        },
        Err(error) => {
            warn!(error = %error, code = error.code(), "Delivery creation rejected");
            create_error_response(&error)
        },
    }
}

/// Returns the current status of one delivery.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 404: No delivery with the given id
/// - 422: Malformed delivery id
/// - 500: Store errors
#[instrument(name = "delivery_status", skip(state))]
pub async fn delivery_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let delivery_id = match DeliveryId::parse(id) {
        Ok(delivery_id) => delivery_id,
        Err(error) => {
            warn!(error = %error, "Rejected malformed delivery id");
            return create_error_response(&TrackingError::validation(
                "delivery_id",
                error.to_string(),
            ));
        },
    };

    match state.store.find_by_id(delivery_id.clone()).await {
        Ok(Some(delivery)) => (
            StatusCode::OK,
            Json(DeliveryStatusResponse {
                delivery_id: delivery.id,
                order_id: delivery.order_id,
                provider: delivery.provider,
                tracking_number: delivery.tracking_number,
                status: delivery.status,
                created_at: delivery.created_at,
                updated_at: delivery.updated_at,
            }),
        )
            .into_response(),
        Ok(None) => {
            info!(delivery_id = %delivery_id, "Delivery not found");
            create_error_response(&TrackingError::not_found(delivery_id.as_str()))
        },
        Err(error) => {
            error!(error = %error, "Status lookup failed");
            create_error_response(&TrackingError::Store(error))
        },
    }
}
