//! Builder for the bond service.

use std::sync::Arc;

use bondbook_traits::resolver::LegalNameResolver;
use bondbook_traits::storage::StorageAdapter;

use crate::error::ServiceError;
use crate::service::BondService;

/// Builder for constructing a [`BondService`].
pub struct BondServiceBuilder {
    storage: Option<StorageAdapter>,
    resolver: Option<Arc<dyn LegalNameResolver>>,
}

impl BondServiceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            storage: None,
            resolver: None,
        }
    }

    /// Set the storage adapter.
    pub fn with_storage(mut self, storage: StorageAdapter) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the legal-name resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn LegalNameResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Build the service.
    pub fn build(self) -> Result<BondService, ServiceError> {
        let storage = self
            .storage
            .ok_or_else(|| ServiceError::Configuration("storage not configured".into()))?;

        let resolver = self
            .resolver
            .ok_or_else(|| ServiceError::Configuration("resolver not configured".into()))?;

        Ok(BondService::new(storage, resolver))
    }
}

impl Default for BondServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
