//! ISO 4217 currency code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A three-letter ISO 4217 alphabetic currency code.
///
/// Only the shape is checked here. Whether the code is known is decided by
/// the currency registry, which is the single source of valid codes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Length of an alphabetic currency code.
    pub const LENGTH: usize = 3;

    /// Parse a code made of exactly three ASCII uppercase letters.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        if code.len() == Self::LENGTH && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_string()))
        } else {
            Err(ValidationError::UnknownCurrency(code.to_string()))
        }
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
