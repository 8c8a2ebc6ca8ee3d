//! Validation error types.
//!
//! Errors raised while turning client input into a bond are always scoped to
//! a single [`Field`]. A create request may fail on several fields at once, so
//! they are collected into [`FieldErrors`], which serialises to the
//! field-keyed map returned over HTTP (`{"lei": ["..."]}`).

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::identifiers::IdentifierKind;

/// A client-supplied field of a bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Legal Entity Identifier.
    Lei,
    /// International Securities Identification Number.
    Isin,
    /// Issue size.
    Size,
    /// Currency code.
    Currency,
    /// Maturity date.
    Maturity,
}

impl Field {
    /// Wire name of the field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Lei => "lei",
            Field::Isin => "isin",
            Field::Size => "size",
            Field::Currency => "currency",
            Field::Maturity => "maturity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The field was not supplied.
    #[error("This field is required.")]
    Required,

    /// The field was sent as an explicit null.
    #[error("This field may not be null.")]
    Null,

    /// The field was supplied but empty.
    #[error("This field may not be blank.")]
    Blank,

    /// The field is not an integer.
    #[error("A valid integer is required.")]
    InvalidInteger,

    /// The field is not an ISO calendar date.
    #[error("Date has wrong format. Use one of these formats instead: YYYY-MM-DD.")]
    InvalidDate,

    /// The field does not have its fixed length.
    #[error("This value must be {required} characters long")]
    InvalidLength {
        /// Required number of characters.
        required: usize,
    },

    /// The identifier has the right length but fails its check digits.
    #[error("{value} is not a valid {kind}")]
    InvalidChecksum {
        /// Which identifier scheme rejected the value.
        kind: IdentifierKind,
        /// The rejected value, as supplied.
        value: String,
    },

    /// The currency code is not in the registry.
    #[error("{0} is not a valid currency")]
    UnknownCurrency(String),

    /// A bond with this LEI already exists.
    #[error("bond with this lei already exists.")]
    DuplicateKey,
}

/// Validation failures grouped by field.
///
/// Fields keep insertion order per field and are emitted in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, Vec<ValidationError>>,
}

impl FieldErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error set holding one failure.
    pub fn single(field: Field, error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(field, error);
        errors
    }

    /// Record a failure for `field`.
    pub fn add(&mut self, field: Field, error: ValidationError) {
        self.errors.entry(field).or_default().push(error);
    }

    /// True when no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one failure.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Failures recorded for `field`.
    pub fn get(&self, field: Field) -> &[ValidationError] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.errors {
            for error in errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, error)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, errors) in &self.errors {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            map.serialize_entry(field.as_str(), &messages)?;
        }
        map.end()
    }
}
