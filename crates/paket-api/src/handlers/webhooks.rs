//! Carrier status notification handler.
//!
//! Push-reconciled carriers call this endpoint with a tracking number and
//! a status string. A replayed notification carrying the current status is
//! answered with 200 and `"changed": false` so carriers never retry
//! no-ops.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use paket_core::models::{DeliveryId, DeliveryStatus};
use paket_tracking::{TrackingError, WebhookNotification};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::{handlers::create_error_response, state::AppState};

/// Response from webhook processing.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Delivery the notification was matched to
    pub delivery_id: DeliveryId,
    /// Status of the delivery after processing
    pub status: DeliveryStatus,
    /// False when the notification repeated the current status
    pub changed: bool,
}

/// Ingests a carrier delivery-status notification.
///
/// Resolves the delivery by tracking number, validates the reported
/// status, and applies the transition.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 404: Unknown tracking number
/// - 422: Status string outside the known set
/// - 500: Store errors
#[instrument(
    name = "delivery_status_webhook",
    skip(state, notification),
    fields(
        tracking_number = %notification.tracking_number,
        reported_status = %notification.status,
    )
)]
pub async fn delivery_status_webhook(
    State(state): State<AppState>,
    Json(notification): Json<WebhookNotification>,
) -> Response {
    info!("Processing carrier status notification");

    match state.reconciler.process(notification).await {
        Ok(outcome) => {
            info!(
                delivery_id = %outcome.delivery_id,
                previous_status = %outcome.previous_status,
                new_status = %outcome.new_status,
                "Notification applied"
            );
            (
                StatusCode::OK,
                Json(WebhookResponse {
                    delivery_id: outcome.delivery_id,
                    status: outcome.new_status,
                    changed: true,
                }),
            )
                .into_response()
        },
        Err(TrackingError::NoStatusChange { delivery_id, status }) => {
            debug!(delivery_id = %delivery_id, status = %status, "Notification repeated current status");
            (StatusCode::OK, Json(WebhookResponse { delivery_id, status, changed: false }))
                .into_response()
        },
        Err(error @ TrackingError::Store(_)) => {
            error!(error = %error, "Notification processing failed");
            create_error_response(&error)
        },
        Err(error) => {
            warn!(error = %error, code = error.code(), "Notification rejected");
            create_error_response(&error)
        },
    }
}
