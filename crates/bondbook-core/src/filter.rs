//! Exact-match filters for the bond listing.

use chrono::NaiveDate;

use crate::types::Bond;

/// Equality filter over the client-visible bond fields.
///
/// Every populated criterion must match (logical AND). Unknown keys are
/// ignored. A value that cannot be parsed for its field (`size=abc`) makes
/// the filter match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondFilter {
    /// Legal name.
    pub legal_name: Option<String>,
    /// Currency code.
    pub currency: Option<String>,
    /// LEI.
    pub lei: Option<String>,
    /// ISIN.
    pub isin: Option<String>,
    /// Issue size.
    pub size: Option<i64>,
    /// Maturity date.
    pub maturity: Option<NaiveDate>,
    unsatisfiable: bool,
}

impl BondFilter {
    /// A filter that matches every bond.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from query-string pairs. Later keys win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::new();
        for (key, value) in pairs {
            filter.set(key.as_ref(), value.as_ref());
        }
        filter
    }

    /// Set one criterion from its query key. Returns false for unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "legal_name" => self.legal_name = Some(value.to_string()),
            "currency" => self.currency = Some(value.to_string()),
            "lei" => self.lei = Some(value.to_string()),
            "isin" => self.isin = Some(value.to_string()),
            "size" => match value.trim().parse() {
                Ok(size) => self.size = Some(size),
                Err(_) => self.unsatisfiable = true,
            },
            "maturity" => match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
                Ok(date) => self.maturity = Some(date),
                Err(_) => self.unsatisfiable = true,
            },
            _ => return false,
        }
        true
    }

    /// Require this legal name.
    pub fn with_legal_name(mut self, name: impl Into<String>) -> Self {
        self.legal_name = Some(name.into());
        self
    }

    /// Require this currency.
    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(code.into());
        self
    }

    /// Require this LEI.
    pub fn with_lei(mut self, lei: impl Into<String>) -> Self {
        self.lei = Some(lei.into());
        self
    }

    /// Require this ISIN.
    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }

    /// Require this size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Require this maturity.
    pub fn with_maturity(mut self, maturity: NaiveDate) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Check a bond against every criterion.
    pub fn matches(&self, bond: &Bond) -> bool {
        fn eq<T: PartialEq + ?Sized>(want: Option<&T>, have: &T) -> bool {
            want.map_or(true, |w| w == have)
        }

        !self.unsatisfiable
            && eq(self.legal_name.as_deref(), bond.legal_name.as_str())
            && eq(self.currency.as_deref(), bond.currency.as_str())
            && eq(self.lei.as_deref(), bond.lei.as_str())
            && eq(self.isin.as_deref(), bond.isin.as_str())
            && eq(self.size.as_ref(), &bond.size)
            && eq(self.maturity.as_ref(), &bond.maturity)
    }
}
