//! # Bondbook Engine
//!
//! The bond service for Bondbook.
//!
//! This crate provides:
//! - [`BondService`]: the creation pipeline and the owner-scoped read path
//! - [`BondServiceBuilder`]: wires storage and a legal-name resolver together
//!
//! ## Pipeline
//!
//! ```text
//! BondSubmission ─> shape ─> checksum ─> currency registry ─┬─> FieldErrors (400)
//!                                                            │
//!                                                            └─> resolver ─> insert ─> Bond
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let service = BondServiceBuilder::new()
//!     .with_storage(storage_adapter)
//!     .with_resolver(resolver)
//!     .build()?;
//!
//! let bond = service.create(&owner, &submission).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod error;
pub mod service;

// Re-exports
pub use builder::BondServiceBuilder;
pub use error::ServiceError;
pub use service::BondService;
