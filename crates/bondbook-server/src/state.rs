//! Application state.

use axum::http::HeaderName;

use bondbook_engine::BondService;

use crate::config::ConfigError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The bond service.
    pub service: BondService,

    /// Header the authenticating proxy puts the user in.
    pub identity_header: HeaderName,
}

impl AppState {
    /// Create state with an already-parsed identity header.
    pub fn new(service: BondService, identity_header: HeaderName) -> Self {
        Self {
            service,
            identity_header,
        }
    }

    /// Create state, parsing the identity header name.
    pub fn with_identity_header(service: BondService, header: &str) -> Result<Self, ConfigError> {
        let identity_header = HeaderName::from_bytes(header.trim().as_bytes())
            .map_err(|e| ConfigError::Invalid(format!("identity_header {header:?}: {e}")))?;
        Ok(Self::new(service, identity_header))
    }
}
