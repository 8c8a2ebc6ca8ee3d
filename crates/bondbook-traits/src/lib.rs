//! # Bondbook Traits
//!
//! Trait definitions for the Bondbook service.
//!
//! This crate contains ONLY trait definitions with ZERO runtime dependencies.
//! All implementations are in separate extension crates.
//!
//! ## Module Structure
//!
//! - [`storage`]: Traits for persistence (bonds, currency registry)
//! - [`resolver`]: Trait for resolving an LEI to its legal name
//! - [`error`]: Error types shared by the traits
//!
//! ## Dependency Injection
//!
//! The bond service consumes these traits via dependency injection:
//!
//! ```ignore
//! BondServiceBuilder::new()
//!     .with_storage(StorageAdapter)
//!     .with_resolver(impl LegalNameResolver)
//!     .build()
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod resolver;
pub mod storage;

// Re-export commonly used types
pub use error::{ResolveError, TraitError};
pub use resolver::LegalNameResolver;
pub use storage::{BondStore, CurrencyStore, StorageAdapter};
