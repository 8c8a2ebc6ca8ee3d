//! Currency reference lists.
//!
//! One ISO 4217 code per line. Surrounding whitespace is trimmed, blank
//! lines and `#` comments are skipped.

use std::path::Path;

use tracing::debug;

use bondbook_core::CurrencyCode;
use bondbook_traits::error::TraitError;

/// The currency list shipped with Bondbook.
pub const BUNDLED_CURRENCIES: &str = include_str!("../data/currencies.csv");

/// Parse a currency list.
///
/// Fails on the first line that is not exactly three ASCII uppercase
/// letters, naming its line number.
pub fn parse_currency_list(text: &str) -> Result<Vec<CurrencyCode>, TraitError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut codes = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line());

        let raw = match record.len() {
            0 => continue,
            1 => &record[0],
            n => {
                return Err(TraitError::ParseError(format!(
                    "line {line}: expected one currency code, found {n} fields"
                )))
            }
        };
        if raw.is_empty() {
            continue;
        }

        let code = CurrencyCode::parse(raw).map_err(|_| {
            TraitError::ParseError(format!("line {line}: {raw:?} is not a currency code"))
        })?;
        codes.push(code);
    }

    Ok(codes)
}

/// Read and parse a currency list from disk.
pub fn load_currency_file(path: impl AsRef<Path>) -> Result<Vec<CurrencyCode>, TraitError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| TraitError::IoError(format!("{}: {e}", path.display())))?;
    let codes = parse_currency_list(&text)?;
    debug!(path = %path.display(), count = codes.len(), "loaded currency list");
    Ok(codes)
}

/// Parse the bundled currency list.
pub fn bundled_currencies() -> Result<Vec<CurrencyCode>, TraitError> {
    parse_currency_list(BUNDLED_CURRENCIES)
}
