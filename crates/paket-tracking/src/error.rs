//! Error taxonomy for delivery lifecycle workflows.
//!
//! Every workflow failure maps to exactly one variant, and every variant
//! carries a stable machine-readable code for the HTTP error envelope.
//! Outcomes that are not failures at the outward boundary (notably
//! [`TrackingError::NoStatusChange`]) still travel through this type so
//! callers can pattern match on them before converting to a response.

use paket_core::{
    models::{DeliveryId, DeliveryStatus},
    CoreError,
};
use paket_providers::ProviderError;
use thiserror::Error;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Failures and terminal signals raised by the lifecycle workflows.
#[derive(Debug, Clone, Error)]
pub enum TrackingError {
    /// A request field failed domain validation.
    #[error("validation failed for {field}: {message}")]
    Validation {
        /// Name of the offending request field.
        field: &'static str,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A delivery already exists for the submitted order.
    #[error("delivery already exists for order {order_id}")]
    DuplicateOrder {
        /// Order id that already has a delivery.
        order_id: String,
    },

    /// No registered shipping provider reported itself available.
    #[error("no shipping provider available")]
    NoProviderAvailable,

    /// The selected provider failed while serving the request.
    #[error("provider {provider} unavailable: {message}")]
    ProviderUnavailable {
        /// Stable name of the failing provider.
        provider: String,
        /// Carrier-reported reason.
        message: String,
    },

    /// No delivery matches the given identifier or tracking number.
    #[error("delivery not found for {locator}")]
    DeliveryNotFound {
        /// Identifier or tracking number used in the lookup.
        locator: String,
    },

    /// A reported status string is outside the known status set.
    #[error("invalid delivery status: {status}")]
    InvalidStatus {
        /// The unrecognized status string as received.
        status: String,
    },

    /// The reported status equals the current status.
    ///
    /// A replay-safety signal, not a failure: the outward boundary treats
    /// it as a successful no-op.
    #[error("delivery {delivery_id} already has status {status}")]
    NoStatusChange {
        /// Delivery whose status was reported.
        delivery_id: DeliveryId,
        /// The status both sides agree on.
        status: DeliveryStatus,
    },

    /// A webhook signature failed verification.
    ///
    /// Reserved: signature verification is a named hook that is not yet
    /// wired, so this variant is never raised today.
    #[error("invalid webhook signature: {reason}")]
    InvalidSignature {
        /// Why verification failed.
        reason: String,
    },

    /// The delivery store failed.
    #[error("store error: {0}")]
    Store(#[from] CoreError),
}

impl TrackingError {
    /// Creates a validation error for a named request field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    /// Creates a duplicate-order error.
    pub fn duplicate_order(order_id: impl Into<String>) -> Self {
        Self::DuplicateOrder { order_id: order_id.into() }
    }

    /// Creates a not-found error for an identifier or tracking number.
    pub fn not_found(locator: impl Into<String>) -> Self {
        Self::DeliveryNotFound { locator: locator.into() }
    }

    /// Creates an invalid-status error preserving the raw input.
    pub fn invalid_status(status: impl Into<String>) -> Self {
        Self::InvalidStatus { status: status.into() }
    }

    /// Stable machine-readable code for the HTTP error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::DuplicateOrder { .. } => "DUPLICATE_ORDER",
            Self::NoProviderAvailable => "NO_PROVIDER_AVAILABLE",
            Self::ProviderUnavailable { .. } => "PROVIDER_UNAVAILABLE",
            Self::DeliveryNotFound { .. } => "DELIVERY_NOT_FOUND",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::NoStatusChange { .. } => "NO_STATUS_CHANGE",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// True when retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NoProviderAvailable | Self::ProviderUnavailable { .. } => true,
            Self::Store(inner) => inner.is_retryable(),
            Self::Validation { .. }
            | Self::DuplicateOrder { .. }
            | Self::DeliveryNotFound { .. }
            | Self::InvalidStatus { .. }
            | Self::NoStatusChange { .. }
            | Self::InvalidSignature { .. } => false,
        }
    }
}

impl From<ProviderError> for TrackingError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::NoneAvailable => Self::NoProviderAvailable,
            ProviderError::Unavailable { provider, message } => {
                Self::ProviderUnavailable { provider, message }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(TrackingError::validation("order_id", "too short").code(), "VALIDATION_ERROR");
        assert_eq!(TrackingError::duplicate_order("ORDER-1").code(), "DUPLICATE_ORDER");
        assert_eq!(TrackingError::NoProviderAvailable.code(), "NO_PROVIDER_AVAILABLE");
        assert_eq!(TrackingError::not_found("NOVA123").code(), "DELIVERY_NOT_FOUND");
        assert_eq!(TrackingError::invalid_status("SHIPPED").code(), "INVALID_STATUS");
        assert_eq!(
            TrackingError::Store(CoreError::Database("down".into())).code(),
            "STORE_ERROR"
        );
    }

    #[test]
    fn provider_errors_map_onto_taxonomy() {
        assert!(matches!(
            TrackingError::from(ProviderError::NoneAvailable),
            TrackingError::NoProviderAvailable
        ));

        let mapped = TrackingError::from(ProviderError::unavailable("novapost", "label down"));
        match mapped {
            TrackingError::ProviderUnavailable { provider, message } => {
                assert_eq!(provider, "novapost");
                assert_eq!(message, "label down");
            },
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(TrackingError::NoProviderAvailable.is_retryable());
        assert!(TrackingError::Store(CoreError::Database("down".into())).is_retryable());
        assert!(!TrackingError::Store(CoreError::ConstraintViolation("dup".into())).is_retryable());
        assert!(!TrackingError::validation("order_id", "bad").is_retryable());
        assert!(!TrackingError::duplicate_order("ORDER-1").is_retryable());
    }
}
