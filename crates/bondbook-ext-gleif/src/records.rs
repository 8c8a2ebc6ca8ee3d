//! Wire format of the LEI-lookup API.
//!
//! The API returns a JSON array of records in an XML-derived layout where
//! text nodes sit under a `$` key:
//!
//! ```json
//! [{"LEI": {"$": "R0MUWSFPU8MPRO8K5P83"},
//!   "Entity": {"LegalName": {"$": "BNP PARIBAS"}}}]
//! ```

use serde::Deserialize;

/// A text node.
#[derive(Debug, Deserialize)]
pub(crate) struct Text {
    #[serde(rename = "$")]
    pub value: String,
}

/// The parts of an LEI record we read. Everything else is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct LeiRecord {
    #[serde(rename = "LEI")]
    pub lei: Text,
    #[serde(rename = "Entity", default)]
    pub entity: Option<Entity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Entity {
    #[serde(rename = "LegalName", default)]
    pub legal_name: Option<Text>,
}

impl LeiRecord {
    pub fn legal_name(&self) -> Option<&str> {
        self.entity
            .as_ref()
            .and_then(|e| e.legal_name.as_ref())
            .map(|n| n.value.as_str())
    }
}
