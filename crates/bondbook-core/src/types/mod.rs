//! Domain types for the bond register.

mod bond;
mod currency;

pub use bond::{
    Bond, BondFields, BondSubmission, LegalName, OwnerId, ParsedSubmission, MAX_LEGAL_NAME_LEN,
};
pub use currency::CurrencyCode;
