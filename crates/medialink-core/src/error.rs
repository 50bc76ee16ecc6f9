//! Error types for media operations.
//!
//! Three classes of failure reach the caller:
//!
//! - [`MediaError::InvalidInput`]: a parameter was missing or malformed. Raised
//!   before any storage call is made.
//! - [`MediaError::NotFound`]: no route matched, or the requested object does
//!   not exist.
//! - [`MediaError::Upstream`]: the object store failed. Never retried here.

use crate::store::StoreError;

/// Error returned by routing and media operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// A request parameter was missing or malformed.
    #[error("invalid parameter '{param}': {reason}")]
    InvalidInput {
        /// Name of the offending parameter.
        param: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The route or the object does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The object store call failed.
    #[error(transparent)]
    Upstream(#[from] StoreError),
}

impl MediaError {
    /// Create an [`MediaError::InvalidInput`].
    #[must_use]
    pub fn invalid_input(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            param,
            reason: reason.into(),
        }
    }

    /// Create a [`MediaError::NotFound`].
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// HTTP status code this error is reported with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::NotFound(_) => 404,
            Self::Upstream(_) => 500,
        }
    }

    /// Whether the caller, not the service, is at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Convenience result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;
