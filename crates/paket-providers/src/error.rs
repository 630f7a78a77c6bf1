//! Error types for shipping provider operations.
//!
//! Providers surface two failure shapes: a specific carrier refusing or
//! failing a call, and the registry finding no carrier able to serve a
//! request at all. Both carry enough context for callers to decide whether
//! the operation is worth retrying.

use thiserror::Error;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Error conditions raised by shipping providers and the registry.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// No registered provider reported itself available.
    #[error("no shipping provider available")]
    NoneAvailable,

    /// A specific provider failed or refused the call.
    #[error("provider {provider} unavailable: {message}")]
    Unavailable {
        /// Stable name of the provider that failed.
        provider: String,
        /// Carrier-reported reason for the failure.
        message: String,
    },
}

impl ProviderError {
    /// Creates an unavailable error for a named provider.
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable { provider: provider.into(), message: message.into() }
    }

    /// Determines if this error represents a temporary failure.
    ///
    /// Both variants reflect transient carrier conditions; a later attempt
    /// may succeed once availability recovers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NoneAvailable | Self::Unavailable { .. } => true,
        }
    }
}
