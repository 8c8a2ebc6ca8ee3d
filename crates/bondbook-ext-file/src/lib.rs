//! # Bondbook Ext File
//!
//! File-based reference data for Bondbook.
//!
//! This crate provides:
//! - Currency lists (one ISO 4217 code per line), including the bundled list
//! - A static legal-name resolver backed by a JSON fixture
//!
//! For live legal names, use the GLEIF extension.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod currencies;
mod static_resolver;

pub use currencies::*;
pub use static_resolver::*;
