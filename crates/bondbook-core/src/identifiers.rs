//! Securities and entity identifiers.
//!
//! Both identifiers go through two separate stages: a fixed-length check and
//! then a check-digit check. A value of the wrong length never reaches the
//! checksum, so callers see "must be N characters long" rather than a
//! checksum failure for short input.
//!
//! - LEI (ISO 17442): 20 characters, ISO 7064 MOD 97-10 over the whole code.
//! - ISIN (ISO 6166): 12 characters, two-letter country prefix, Luhn check
//!   digit over the letter-expanded code.
//!
//! Lowercase input is accepted and stored uppercased.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of characters in an LEI.
pub const LEI_LENGTH: usize = 20;

/// Number of characters in an ISIN.
pub const ISIN_LENGTH: usize = 12;

/// Identifier scheme, used in checksum error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// Legal Entity Identifier.
    Lei,
    /// International Securities Identification Number.
    Isin,
}

impl IdentifierKind {
    /// Fixed length of identifiers of this kind.
    #[must_use]
    pub fn length(&self) -> usize {
        match self {
            IdentifierKind::Lei => LEI_LENGTH,
            IdentifierKind::Isin => ISIN_LENGTH,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Lei => f.write_str("LEI"),
            IdentifierKind::Isin => f.write_str("ISIN"),
        }
    }
}

/// Value of an identifier character: `0-9` map to 0-9, `A-Z` to 10-35.
fn char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' | 'A'..='Z' => c.to_digit(36),
        _ => None,
    }
}

fn checksum_error(kind: IdentifierKind, value: &str) -> ValidationError {
    ValidationError::InvalidChecksum {
        kind,
        value: value.to_string(),
    }
}

fn check_length(kind: IdentifierKind, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() == kind.length() {
        Ok(())
    } else {
        Err(ValidationError::InvalidLength {
            required: kind.length(),
        })
    }
}

/// Validate LEI check digits (ISO 7064 MOD 97-10).
///
/// The length is assumed to have been checked already. Returns the
/// uppercased value on success; errors carry the value as given.
pub fn validate_lei(value: &str) -> Result<String, ValidationError> {
    let normalized = value.to_ascii_uppercase();
    let mut remainder: u32 = 0;
    for c in normalized.chars() {
        let v = char_value(c).ok_or_else(|| checksum_error(IdentifierKind::Lei, value))?;
        remainder = if v < 10 {
            (remainder * 10 + v) % 97
        } else {
            (remainder * 100 + v) % 97
        };
    }

    if remainder == 1 {
        Ok(normalized)
    } else {
        Err(checksum_error(IdentifierKind::Lei, value))
    }
}

/// Validate an ISIN check digit (Luhn over the letter-expanded code).
///
/// The length is assumed to have been checked already. Returns the
/// uppercased value on success; errors carry the value as given.
pub fn validate_isin(value: &str) -> Result<String, ValidationError> {
    let invalid = || checksum_error(IdentifierKind::Isin, value);
    let normalized = value.to_ascii_uppercase();

    let country_ok = normalized.chars().take(2).filter(char::is_ascii_uppercase).count() == 2;
    let check_ok = normalized.chars().last().is_some_and(|c| c.is_ascii_digit());
    if !country_ok || !check_ok {
        return Err(invalid());
    }

    let mut digits = Vec::with_capacity(normalized.len() * 2);
    for c in normalized.chars() {
        let v = char_value(c).ok_or_else(invalid)?;
        if v >= 10 {
            digits.push(v / 10);
        }
        digits.push(v % 10);
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    if sum % 10 == 0 {
        Ok(normalized)
    } else {
        Err(invalid())
    }
}

/// A validated Legal Entity Identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lei(String);

impl Lei {
    /// Run the length and checksum stages over `value`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        check_length(IdentifierKind::Lei, value)?;
        validate_lei(value).map(Self)
    }

    /// Get the LEI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Lei {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated International Securities Identification Number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isin(String);

impl Isin {
    /// Run the length and checksum stages over `value`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        check_length(IdentifierKind::Isin, value)?;
        validate_isin(value).map(Self)
    }

    /// Get the ISIN as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Isin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
