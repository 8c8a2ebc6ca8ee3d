//! Legal-name resolution.

use async_trait::async_trait;

use bondbook_core::{LegalName, Lei};

use crate::error::ResolveError;

/// Maps a validated LEI to the legal name of the entity that owns it.
///
/// Implementations talk to an external registry (or a fixture). They must
/// bound the call with a deadline and must not retry or cache on their own.
#[async_trait]
pub trait LegalNameResolver: Send + Sync {
    /// Resolve the legal name for `lei`.
    async fn resolve_legal_name(&self, lei: &Lei) -> Result<LegalName, ResolveError>;

    /// Short name of the backend, for logs.
    fn name(&self) -> &'static str;
}
