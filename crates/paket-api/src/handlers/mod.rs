//! HTTP request handlers for the paket API.
//!
//! This module contains all HTTP endpoint handlers following a consistent
//! pattern:
//! - Input validation with appropriate error codes
//! - Tracing for observability
//! - Standardized error responses
//!
//! # Handler Organization
//!
//! Handlers are grouped by functionality:
//! - `deliveries` - Delivery creation and status lookup
//! - `webhooks` - Carrier status notification ingestion
//! - `health` - Liveness probe
//!
//! # Error Handling
//!
//! All failures serialize to the same envelope:
//!
//! ```json
//! {"error": {"code": "DUPLICATE_ORDER", "message": "..."}}
//! ```
//!
//! with the HTTP status derived from the workflow error variant.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use paket_tracking::TrackingError;
use serde::Serialize;

pub mod deliveries;
pub mod health;
pub mod webhooks;

// Re-export handlers for convenient access
pub use deliveries::{create_delivery, delivery_status};
pub use health::health_check;
pub use webhooks::delivery_status_webhook;

/// Error response with code and message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details including code and message
    pub error: ErrorDetail,
}

/// Detailed error information.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Stable machine-readable error code
    pub code: String,
    /// Human-readable error description
    pub message: String,
}

/// Maps a workflow error to its HTTP status.
///
/// `NoStatusChange` never reaches this mapping in practice: the webhook
/// handler answers it with 200 before converting to an error response.
fn error_status(error: &TrackingError) -> StatusCode {
    match error {
        TrackingError::Validation { .. } | TrackingError::InvalidStatus { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        },
        TrackingError::DuplicateOrder { .. } => StatusCode::CONFLICT,
        TrackingError::NoProviderAvailable | TrackingError::ProviderUnavailable { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        },
        TrackingError::DeliveryNotFound { .. } => StatusCode::NOT_FOUND,
        TrackingError::NoStatusChange { .. } => StatusCode::OK,
        TrackingError::InvalidSignature { .. } => StatusCode::UNAUTHORIZED,
        TrackingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Creates a standardized error response.
fn create_error_response(error: &TrackingError) -> Response {
    let error_response = ErrorResponse {
        error: ErrorDetail { code: error.code().to_string(), message: error.to_string() },
    };

    (error_status(error), Json(error_response)).into_response()
}

#[cfg(test)]
mod tests {
    use paket_core::CoreError;

    use super::*;

    #[test]
    fn validation_errors_map_to_unprocessable_entity() {
        let error = TrackingError::validation("order_id", "must be at least 3 characters");
        assert_eq!(error_status(&error), StatusCode::UNPROCESSABLE_ENTITY);

        let error = TrackingError::invalid_status("SHIPPED");
        assert_eq!(error_status(&error), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn duplicate_order_maps_to_conflict() {
        let error = TrackingError::duplicate_order("ORDER-1");
        assert_eq!(error_status(&error), StatusCode::CONFLICT);
    }

    #[test]
    fn provider_failures_map_to_service_unavailable() {
        let error = TrackingError::NoProviderAvailable;
        assert_eq!(error_status(&error), StatusCode::SERVICE_UNAVAILABLE);

        let error = TrackingError::ProviderUnavailable {
            provider: "novapost".to_string(),
            message: "label generation failed".to_string(),
        };
        assert_eq!(error_status(&error), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn missing_delivery_maps_to_not_found() {
        let error = TrackingError::not_found("NOVA17000");
        assert_eq!(error_status(&error), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_errors_map_to_internal_server_error() {
        let error = TrackingError::Store(CoreError::Database("connection refused".to_string()));
        assert_eq!(error_status(&error), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_carries_code_and_status() {
        let error = TrackingError::duplicate_order("ORDER-1");
        let response = create_error_response(&error);

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
