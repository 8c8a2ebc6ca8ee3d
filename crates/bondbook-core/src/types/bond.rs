//! Bond records and the submissions they are created from.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Field, FieldErrors, ValidationError};
use crate::identifiers::{Isin, Lei};
use crate::types::CurrencyCode;

/// Maximum stored length of a legal name, in characters.
pub const MAX_LEGAL_NAME_LEN: usize = 100;

/// Wire format of maturity dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identity of the authenticated caller that owns a bond.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new owner ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Registered legal name of the entity behind an LEI.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegalName(String);

impl LegalName {
    /// Wrap a legal name as returned by the registry.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cut the name down to [`MAX_LEGAL_NAME_LEN`] characters.
    ///
    /// Returns true if anything was removed.
    pub fn truncate_to_limit(&mut self) -> bool {
        match self.0.char_indices().nth(MAX_LEGAL_NAME_LEN) {
            Some((idx, _)) => {
                self.0.truncate(idx);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for LegalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A create request as the client sent it.
///
/// Every field is optional and untyped so that missing or malformed values
/// surface as field errors instead of rejecting the whole request.
/// It carries no legal name or owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondSubmission {
    /// Legal Entity Identifier.
    pub lei: Option<String>,
    /// ISIN.
    pub isin: Option<String>,
    /// Issue size, as an integer literal.
    pub size: Option<String>,
    /// Currency code.
    pub currency: Option<String>,
    /// Maturity date, `YYYY-MM-DD`.
    pub maturity: Option<String>,
    /// Fields the client sent as an explicit null rather than omitting.
    #[serde(skip)]
    pub nulls: Vec<Field>,
}

/// Result of the field-level stages over a [`BondSubmission`].
///
/// The currency is left as submitted: its only check is a registry lookup,
/// which happens outside this crate.
#[derive(Debug, Clone, Default)]
pub struct ParsedSubmission {
    /// Validated LEI, if it passed length and checksum.
    pub lei: Option<Lei>,
    /// Validated ISIN, if it passed length and checksum.
    pub isin: Option<Isin>,
    /// Parsed size.
    pub size: Option<i64>,
    /// Currency code as submitted.
    pub currency: Option<String>,
    /// Parsed maturity.
    pub maturity: Option<NaiveDate>,
    /// Failures so far.
    pub errors: FieldErrors,
}

/// Fully validated client fields, ready for enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondFields {
    /// Legal Entity Identifier.
    pub lei: Lei,
    /// ISIN.
    pub isin: Isin,
    /// Issue size.
    pub size: i64,
    /// Currency, known to the registry.
    pub currency: CurrencyCode,
    /// Maturity date.
    pub maturity: NaiveDate,
}

/// A persisted bond.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    /// Legal Entity Identifier, primary key.
    pub lei: Lei,
    /// ISIN.
    pub isin: Isin,
    /// Issue size.
    pub size: i64,
    /// Currency code.
    pub currency: CurrencyCode,
    /// Maturity date.
    pub maturity: NaiveDate,
    /// Legal name resolved from the LEI at creation.
    pub legal_name: LegalName,
    /// Identity that created the bond.
    pub owner: OwnerId,
}

impl Bond {
    /// Assemble a bond from validated fields and server-derived data.
    pub fn new(fields: BondFields, legal_name: LegalName, owner: OwnerId) -> Self {
        Self {
            lei: fields.lei,
            isin: fields.isin,
            size: fields.size,
            currency: fields.currency,
            maturity: fields.maturity,
            legal_name,
            owner,
        }
    }
}

impl BondSubmission {
    /// Record that `field` has no usable value.
    fn absent(&self, field: Field, errors: &mut FieldErrors) {
        let error = if self.nulls.contains(&field) {
            ValidationError::Null
        } else {
            ValidationError::Required
        };
        errors.add(field, error);
    }

    fn required<'a>(
        &self,
        value: Option<&'a str>,
        field: Field,
        errors: &mut FieldErrors,
    ) -> Option<&'a str> {
        match value {
            Some(v) if !v.is_empty() => Some(v),
            Some(_) => {
                errors.add(field, ValidationError::Blank);
                None
            }
            None => {
                self.absent(field, errors);
                None
            }
        }
    }

    /// Run the shape, checksum and type-parsing stages on every field.
    ///
    /// Fields are checked independently and all failures are collected.
    /// A field that fails its length check is not checksummed.
    pub fn parse(&self) -> ParsedSubmission {
        let mut errors = FieldErrors::new();

        let lei = self
            .required(self.lei.as_deref().map(str::trim), Field::Lei, &mut errors)
            .and_then(|v| Lei::parse(v).map_err(|e| errors.add(Field::Lei, e)).ok());

        let isin = self
            .required(self.isin.as_deref().map(str::trim), Field::Isin, &mut errors)
            .and_then(|v| Isin::parse(v).map_err(|e| errors.add(Field::Isin, e)).ok());

        // Blank numeric and date inputs count as missing.
        let size = match self.size.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| errors.add(Field::Size, ValidationError::InvalidInteger))
                .ok(),
            None => {
                self.absent(Field::Size, &mut errors);
                None
            }
        };

        let maturity = match self.maturity.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => NaiveDate::parse_from_str(v, DATE_FORMAT)
                .map_err(|_| errors.add(Field::Maturity, ValidationError::InvalidDate))
                .ok(),
            None => {
                self.absent(Field::Maturity, &mut errors);
                None
            }
        };

        let currency = self
            .required(self.currency.as_deref(), Field::Currency, &mut errors)
            .map(str::to_string);

        ParsedSubmission {
            lei,
            isin,
            size,
            currency,
            maturity,
            errors,
        }
    }
}

impl ParsedSubmission {
    /// Finish validation, failing with every collected field error.
    pub fn into_fields(self) -> Result<BondFields, FieldErrors> {
        let mut errors = self.errors;

        let currency = self.currency.and_then(|code| {
            CurrencyCode::parse(&code)
                .map_err(|e| errors.add(Field::Currency, e))
                .ok()
        });

        match (self.lei, self.isin, self.size, currency, self.maturity) {
            (Some(lei), Some(isin), Some(size), Some(currency), Some(maturity))
                if errors.is_empty() =>
            {
                Ok(BondFields {
                    lei,
                    isin,
                    size,
                    currency,
                    maturity,
                })
            }
            _ => Err(errors),
        }
    }
}
