//! Caller identity.
//!
//! Bondbook runs behind an authenticating proxy that puts the user name in
//! a request header. A missing or blank header means the request is
//! unauthenticated.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use bondbook_core::OwnerId;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated owner of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub OwnerId);

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(&state.identity_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(|user| Identity(OwnerId::new(user)))
            .ok_or(ApiError::Unauthenticated)
    }
}
