//! Service error types.

use thiserror::Error;

use bondbook_core::FieldErrors;
use bondbook_traits::error::{ResolveError, TraitError};

/// Bond service error type.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more fields were rejected
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The legal-name lookup failed; nothing was persisted
    #[error("could not resolve legal name for {lei}: {source}")]
    Resolver {
        /// LEI that was being resolved
        lei: String,
        /// Underlying resolver failure
        #[source]
        source: ResolveError,
    },

    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(#[from] TraitError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl ServiceError {
    /// True if the resolver gave up because its deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ServiceError::Resolver {
                source: ResolveError::Timeout,
                ..
            }
        )
    }
}
