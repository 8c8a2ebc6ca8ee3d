//! Assembling the service from configuration.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use bondbook_core::CurrencyCode;
use bondbook_engine::{BondService, BondServiceBuilder};
use bondbook_ext_file::{bundled_currencies, load_currency_file, StaticNameResolver};
use bondbook_ext_gleif::{GleifConfig, GleifResolver};
use bondbook_ext_redb::{create_memory_storage, create_redb_storage};
use bondbook_traits::error::TraitError;
use bondbook_traits::resolver::LegalNameResolver;
use bondbook_traits::storage::StorageAdapter;

use crate::config::{ResolverConfig, ResolverKind, ServerConfig};
use crate::error::ServerError;

/// Open the configured storage, creating parent directories as needed.
pub fn open_storage(config: &ServerConfig) -> Result<StorageAdapter, TraitError> {
    match &config.storage_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            info!("Opening storage at {}", path.display());
            create_redb_storage(path)
        }
        None => {
            info!("Using in-memory storage");
            create_memory_storage()
        }
    }
}

/// Build the configured legal-name resolver.
pub fn build_resolver(config: &ResolverConfig) -> Result<Arc<dyn LegalNameResolver>, ServerError> {
    let resolver: Arc<dyn LegalNameResolver> = match config.kind {
        ResolverKind::Gleif => {
            info!(
                "Resolving legal names via {} (timeout {}s)",
                config.base_url, config.timeout_secs
            );
            Arc::new(GleifResolver::new(
                GleifConfig::default()
                    .with_base_url(config.base_url.clone())
                    .with_timeout(Duration::from_secs(config.timeout_secs)),
            )?)
        }
        ResolverKind::Static => {
            let resolver = match &config.fixture_file {
                Some(path) => StaticNameResolver::from_json_file(path)?,
                None => StaticNameResolver::bundled()?,
            };
            info!("Resolving legal names from a fixture of {} entries", resolver.len());
            Arc::new(resolver)
        }
    };
    Ok(resolver)
}

/// Read a currency list, falling back to the bundled one.
pub fn load_currencies(path: Option<&Path>) -> Result<Vec<CurrencyCode>, TraitError> {
    match path {
        Some(path) => load_currency_file(path),
        None => bundled_currencies(),
    }
}

/// Build the bond service, populating currencies if configured to.
pub async fn build_service(config: &ServerConfig) -> Result<BondService, ServerError> {
    let service = BondServiceBuilder::new()
        .with_storage(open_storage(config)?)
        .with_resolver(build_resolver(&config.resolver)?)
        .build()?;

    if config.populate_on_start {
        let codes = load_currencies(config.currencies_file.as_deref())?;
        service.populate_currencies(&codes).await?;
    }

    Ok(service)
}
