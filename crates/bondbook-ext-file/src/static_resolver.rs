//! Fixture-backed legal-name resolver.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;

use bondbook_core::{LegalName, Lei};
use bondbook_traits::error::{ResolveError, TraitError};
use bondbook_traits::resolver::LegalNameResolver;

/// Legal-name fixture shipped with Bondbook.
///
/// Only `BNP PARIBAS` and `ASLAM CONSULTING AS` are registered names; the
/// `SYNTHETIC ISSUER` entries are made-up names for real LEIs, for offline
/// use only.
pub const BUNDLED_LEGAL_NAMES: &str = include_str!("../data/legal_names.json");

/// In-memory LEI to legal-name map.
///
/// Stands in for the GLEIF registry in offline development and tests.
/// Unknown LEIs resolve to [`ResolveError::NotFound`].
#[derive(Debug, Default)]
pub struct StaticNameResolver {
    names: DashMap<String, LegalName>,
}

impl StaticNameResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_entry(self, lei: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(lei, name);
        self
    }

    /// Add or replace one entry.
    pub fn insert(&self, lei: impl Into<String>, name: impl Into<String>) {
        self.names.insert(lei.into(), LegalName::new(name));
    }

    /// Parse a JSON object of `{"LEI": "Legal Name"}` pairs.
    ///
    /// Every key must be a valid LEI.
    pub fn from_json_str(json: &str) -> Result<Self, TraitError> {
        let entries: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(|e| TraitError::ParseError(e.to_string()))?;

        let resolver = Self::new();
        for (key, name) in entries {
            let lei = Lei::parse(&key)
                .map_err(|e| TraitError::InvalidInput(format!("fixture key {key}: {e}")))?;
            resolver.insert(lei.as_str(), name);
        }
        Ok(resolver)
    }

    /// Load a JSON fixture from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| TraitError::IoError(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// The bundled fixture.
    pub fn bundled() -> Result<Self, TraitError> {
        Self::from_json_str(BUNDLED_LEGAL_NAMES)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[async_trait]
impl LegalNameResolver for StaticNameResolver {
    async fn resolve_legal_name(&self, lei: &Lei) -> Result<LegalName, ResolveError> {
        self.names
            .get(lei.as_str())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ResolveError::NotFound(lei.to_string()))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
