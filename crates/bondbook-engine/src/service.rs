//! The bond service: creation pipeline and owner-scoped reads.

use std::sync::Arc;

use tracing::{debug, info, warn};

use bondbook_core::{
    Bond, BondFilter, BondSubmission, CurrencyCode, Field, FieldErrors, OwnerId, ValidationError,
    MAX_LEGAL_NAME_LEN,
};
use bondbook_traits::error::TraitError;
use bondbook_traits::resolver::LegalNameResolver;
use bondbook_traits::storage::{BondStore, CurrencyStore, StorageAdapter};

use crate::error::ServiceError;

/// Creates and lists bonds on behalf of authenticated owners.
///
/// Creation runs in strict order: field validation (shape, checksum,
/// currency registry), legal-name enrichment, then an atomic insert.
/// Nothing is persisted unless every stage succeeds.
#[derive(Clone)]
pub struct BondService {
    bonds: Arc<dyn BondStore>,
    currencies: Arc<dyn CurrencyStore>,
    resolver: Arc<dyn LegalNameResolver>,
}

impl BondService {
    /// Create a service over the given storage and resolver.
    pub fn new(storage: StorageAdapter, resolver: Arc<dyn LegalNameResolver>) -> Self {
        Self {
            bonds: storage.bonds,
            currencies: storage.currencies,
            resolver,
        }
    }

    /// Name of the configured resolver backend.
    pub fn resolver_name(&self) -> &'static str {
        self.resolver.name()
    }

    /// Validate, enrich and persist a new bond owned by `owner`.
    pub async fn create(
        &self,
        owner: &OwnerId,
        submission: &BondSubmission,
    ) -> Result<Bond, ServiceError> {
        let mut parsed = submission.parse();

        // Unknown codes are reported here and dropped, so `into_fields`
        // only shape-checks codes the registry already accepted.
        if let Some(code) = parsed.currency.take() {
            if self.currencies.exists(&code).await? {
                parsed.currency = Some(code);
            } else {
                parsed
                    .errors
                    .add(Field::Currency, ValidationError::UnknownCurrency(code));
            }
        }

        let fields = parsed.into_fields().map_err(|errors| {
            debug!(%owner, %errors, "bond submission rejected");
            ServiceError::Validation(errors)
        })?;

        let mut legal_name = self
            .resolver
            .resolve_legal_name(&fields.lei)
            .await
            .map_err(|source| {
                warn!(
                    lei = %fields.lei,
                    resolver = self.resolver.name(),
                    error = %source,
                    "legal name lookup failed"
                );
                ServiceError::Resolver {
                    lei: fields.lei.to_string(),
                    source,
                }
            })?;

        if legal_name.truncate_to_limit() {
            warn!(
                lei = %fields.lei,
                "legal name truncated to {MAX_LEGAL_NAME_LEN} characters"
            );
        }

        let bond = Bond::new(fields, legal_name, owner.clone());

        match self.bonds.insert(&bond).await {
            Ok(()) => {
                info!(lei = %bond.lei, isin = %bond.isin, %owner, "bond created");
                Ok(bond)
            }
            Err(TraitError::AlreadyExists(_)) => Err(ServiceError::Validation(FieldErrors::single(
                Field::Lei,
                ValidationError::DuplicateKey,
            ))),
            // The currency was removed between validation and insert.
            Err(TraitError::ConstraintViolation(_)) => {
                Err(ServiceError::Validation(FieldErrors::single(
                    Field::Currency,
                    ValidationError::UnknownCurrency(bond.currency.to_string()),
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List the bonds owned by `owner` that match `filter`.
    pub async fn list(&self, owner: &OwnerId, filter: &BondFilter) -> Result<Vec<Bond>, ServiceError> {
        let bonds = self.bonds.list(owner, filter).await?;
        debug!(%owner, count = bonds.len(), "bonds listed");
        Ok(bonds)
    }

    /// Load currency codes into the registry. Returns the registry size.
    pub async fn populate_currencies(&self, codes: &[CurrencyCode]) -> Result<u64, ServiceError> {
        let total = self.currencies.populate(codes).await?;
        info!(submitted = codes.len(), total, "currency registry populated");
        Ok(total)
    }

    /// Number of registered currencies.
    pub async fn currency_count(&self) -> Result<u64, ServiceError> {
        Ok(self.currencies.count().await?)
    }
}
