//! # Bondbook Ext Redb
//!
//! Embedded storage implementation using redb for Bondbook.
//!
//! This crate provides default storage implementations for:
//! - Bond records (`bonds` table, keyed by LEI, JSON values)
//! - The currency registry (`currencies` table, keyed by code)
//!
//! Both stores share one [`Database`], so a bond insert can check the
//! currency and the LEI and write the record in a single write transaction.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::debug;

use bondbook_core::{Bond, BondFilter, CurrencyCode, OwnerId};
use bondbook_traits::error::TraitError;
use bondbook_traits::storage::{BondStore, CurrencyStore, StorageAdapter};

// Table definitions
const BONDS: TableDefinition<&str, &[u8]> = TableDefinition::new("bonds");
const CURRENCIES: TableDefinition<&str, ()> = TableDefinition::new("currencies");

fn db_err(e: impl Display) -> TraitError {
    TraitError::DatabaseError(e.to_string())
}

fn decode_bond(bytes: &[u8]) -> Result<Bond, TraitError> {
    serde_json::from_slice(bytes).map_err(|e| TraitError::ParseError(e.to_string()))
}

/// Create both tables so readers never see a missing table.
fn initialize_tables(db: &Database) -> Result<(), TraitError> {
    let write_txn = db.begin_write().map_err(db_err)?;
    {
        write_txn.open_table(BONDS).map_err(db_err)?;
        write_txn.open_table(CURRENCIES).map_err(db_err)?;
    }
    write_txn.commit().map_err(db_err)
}

/// Redb-based bond store.
pub struct RedbBondStore {
    db: Arc<Database>,
}

impl RedbBondStore {
    /// Create a new redb bond store.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BondStore for RedbBondStore {
    async fn insert(&self, bond: &Bond) -> Result<(), TraitError> {
        let bytes =
            serde_json::to_vec(bond).map_err(|e| TraitError::SerializationError(e.to_string()))?;

        let write_txn = self.db.begin_write().map_err(db_err)?;
        {
            let currencies = write_txn.open_table(CURRENCIES).map_err(db_err)?;
            if currencies
                .get(bond.currency.as_str())
                .map_err(db_err)?
                .is_none()
            {
                return Err(TraitError::ConstraintViolation(format!(
                    "currency {} is not registered",
                    bond.currency
                )));
            }

            let mut bonds = write_txn.open_table(BONDS).map_err(db_err)?;
            if bonds.get(bond.lei.as_str()).map_err(db_err)?.is_some() {
                return Err(TraitError::AlreadyExists(format!("bond {}", bond.lei)));
            }
            bonds
                .insert(bond.lei.as_str(), bytes.as_slice())
                .map_err(db_err)?;
        }
        write_txn.commit().map_err(db_err)?;

        debug!(lei = %bond.lei, owner = %bond.owner, "bond stored");
        Ok(())
    }

    async fn list(&self, owner: &OwnerId, filter: &BondFilter) -> Result<Vec<Bond>, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;

        let table = match read_txn.open_table(BONDS) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(vec![]),
            Err(e) => return Err(db_err(e)),
        };

        let visible = |bond: &Bond| bond.owner == *owner && filter.matches(bond);

        // The LEI is the key, so an LEI filter is a point lookup.
        if let Some(lei) = filter.lei.as_deref() {
            return match table.get(lei).map_err(db_err)? {
                Some(data) => {
                    let bond = decode_bond(data.value())?;
                    Ok(if visible(&bond) { vec![bond] } else { vec![] })
                }
                None => Ok(vec![]),
            };
        }

        let mut bonds = Vec::new();
        for result in table.iter().map_err(db_err)? {
            let (_, value) = result.map_err(db_err)?;
            let bond = decode_bond(value.value())?;
            if visible(&bond) {
                bonds.push(bond);
            }
        }
        Ok(bonds)
    }
}

/// Redb-based currency registry.
pub struct RedbCurrencyStore {
    db: Arc<Database>,
}

impl RedbCurrencyStore {
    /// Create a new redb currency store.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CurrencyStore for RedbCurrencyStore {
    async fn exists(&self, code: &str) -> Result<bool, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;

        let table = match read_txn.open_table(CURRENCIES) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(false),
            Err(e) => return Err(db_err(e)),
        };

        Ok(table.get(code).map_err(db_err)?.is_some())
    }

    async fn populate(&self, codes: &[CurrencyCode]) -> Result<u64, TraitError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;
        let (added, total) = {
            let mut table = write_txn.open_table(CURRENCIES).map_err(db_err)?;
            let mut added = 0usize;
            for code in codes {
                if table.insert(code.as_str(), ()).map_err(db_err)?.is_none() {
                    added += 1;
                }
            }
            (added, table.len().map_err(db_err)?)
        };
        write_txn.commit().map_err(db_err)?;

        debug!(added, total, "currency registry populated");
        Ok(total)
    }

    async fn count(&self) -> Result<u64, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;

        let table = match read_txn.open_table(CURRENCIES) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(e) => return Err(db_err(e)),
        };

        table.len().map_err(db_err)
    }

    async fn list(&self) -> Result<Vec<CurrencyCode>, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;

        let table = match read_txn.open_table(CURRENCIES) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(vec![]),
            Err(e) => return Err(db_err(e)),
        };

        let mut codes = Vec::new();
        for result in table.iter().map_err(db_err)? {
            let (key, _) = result.map_err(db_err)?;
            let code = CurrencyCode::parse(key.value())
                .map_err(|e| TraitError::ParseError(e.to_string()))?;
            codes.push(code);
        }
        Ok(codes)
    }
}

fn adapter(db: Database) -> Result<StorageAdapter, TraitError> {
    initialize_tables(&db)?;
    let db = Arc::new(db);

    Ok(StorageAdapter {
        bonds: Arc::new(RedbBondStore::new(db.clone())),
        currencies: Arc::new(RedbCurrencyStore::new(db)),
    })
}

/// Create a redb storage adapter backed by a file.
pub fn create_redb_storage(path: impl AsRef<Path>) -> Result<StorageAdapter, TraitError> {
    let db = Database::create(path).map_err(db_err)?;
    adapter(db)
}

/// Create an in-memory storage adapter.
///
/// Nothing is written to disk; data is lost when the adapter is dropped.
pub fn create_memory_storage() -> Result<StorageAdapter, TraitError> {
    let db = Database::builder()
        .create_with_backend(redb::backends::InMemoryBackend::new())
        .map_err(db_err)?;
    adapter(db)
}
