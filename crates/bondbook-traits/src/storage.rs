//! Storage traits for persistence.
//!
//! These traits define interfaces for storage backends:
//! - [`BondStore`]: Bond records, keyed by LEI and scoped by owner
//! - [`CurrencyStore`]: The currency registry (reference data)
//!
//! Storage implementations are EXTENSIONS (e.g., redb).

use std::sync::Arc;

use async_trait::async_trait;

use bondbook_core::{Bond, BondFilter, CurrencyCode, OwnerId};

use crate::error::TraitError;

/// Bond record storage.
#[async_trait]
pub trait BondStore: Send + Sync {
    /// Insert a new bond.
    ///
    /// Must check and insert atomically: fails with
    /// [`TraitError::AlreadyExists`] if the LEI is taken and
    /// [`TraitError::ConstraintViolation`] if the currency is not registered.
    /// Existing records are never overwritten.
    async fn insert(&self, bond: &Bond) -> Result<(), TraitError>;

    /// List the bonds owned by `owner` that match `filter`, ordered by LEI.
    async fn list(&self, owner: &OwnerId, filter: &BondFilter) -> Result<Vec<Bond>, TraitError>;
}

/// Currency registry storage.
#[async_trait]
pub trait CurrencyStore: Send + Sync {
    /// Exact-match existence check.
    async fn exists(&self, code: &str) -> Result<bool, TraitError>;

    /// Add codes to the registry.
    ///
    /// Idempotent: codes already present are left alone. Returns the size of
    /// the registry afterwards.
    async fn populate(&self, codes: &[CurrencyCode]) -> Result<u64, TraitError>;

    /// Number of registered codes.
    async fn count(&self) -> Result<u64, TraitError>;

    /// All registered codes, in code order.
    async fn list(&self) -> Result<Vec<CurrencyCode>, TraitError>;
}

/// Combined storage adapter.
#[derive(Clone)]
pub struct StorageAdapter {
    /// Bond store
    pub bonds: Arc<dyn BondStore>,
    /// Currency registry
    pub currencies: Arc<dyn CurrencyStore>,
}
