//! # Bondbook Core
//!
//! Core types and validation rules for the Bondbook bond register.
//!
//! This crate provides the foundational building blocks used throughout Bondbook:
//!
//! - **Identifiers**: [`Lei`] (ISO 17442) and [`Isin`] (ISO 6166) with
//!   length and checksum validation
//! - **Types**: [`Bond`], [`BondSubmission`], [`CurrencyCode`], [`LegalName`], [`OwnerId`]
//! - **Filters**: [`BondFilter`], the exact-match filter used by the read path
//! - **Errors**: field-scoped [`ValidationError`]s collected into [`FieldErrors`]
//!
//! ## Example
//!
//! ```rust
//! use bondbook_core::prelude::*;
//!
//! let lei = Lei::parse("R0MUWSFPU8MPRO8K5P83").unwrap();
//! assert_eq!(lei.as_str(), "R0MUWSFPU8MPRO8K5P83");
//!
//! let err = Isin::parse("NOOOOOOOOPE").unwrap_err();
//! assert_eq!(err.to_string(), "This value must be 12 characters long");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod identifiers;
pub mod types;

pub use error::{Field, FieldErrors, ValidationError};
pub use filter::BondFilter;
pub use identifiers::{validate_isin, validate_lei, IdentifierKind, Isin, Lei};
pub use types::{
    Bond, BondFields, BondSubmission, CurrencyCode, LegalName, OwnerId, ParsedSubmission,
    MAX_LEGAL_NAME_LEN,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Field, FieldErrors, ValidationError};
    pub use crate::filter::BondFilter;
    pub use crate::identifiers::{Isin, Lei};
    pub use crate::types::{Bond, BondFields, BondSubmission, CurrencyCode, LegalName, OwnerId};
}
