//! Request and response bodies.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use axum::{Form, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use bondbook_core::{Bond, BondSubmission, Field};

use crate::error::ApiError;

/// A loosely typed body value.
///
/// JSON clients may send `size` as a number; form clients send strings.
/// Either way the value is handed to validation as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Explicit `null`.
    Null,
    /// String value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Non-integer number.
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Text(s) => Some(s),
            Scalar::Integer(i) => Some(i.to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Bool(b) => Some(b.to_string()),
        }
    }
}

/// Keeps `null` as `Some(Scalar::Null)`; a missing key stays `None` via
/// `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Some)
}

fn text(value: Option<Scalar>, field: Field, nulls: &mut Vec<Field>) -> Option<String> {
    match value? {
        Scalar::Null => {
            nulls.push(field);
            None
        }
        other => other.into_text(),
    }
}

/// Body of `POST /bonds/`.
///
/// `legal_name` and any other unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBondRequest {
    /// ISIN.
    #[serde(default, deserialize_with = "present")]
    pub isin: Option<Scalar>,
    /// Issue size.
    #[serde(default, deserialize_with = "present")]
    pub size: Option<Scalar>,
    /// Currency code.
    #[serde(default, deserialize_with = "present")]
    pub currency: Option<Scalar>,
    /// Maturity date, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "present")]
    pub maturity: Option<Scalar>,
    /// Legal Entity Identifier.
    #[serde(default, deserialize_with = "present")]
    pub lei: Option<Scalar>,
}

impl CreateBondRequest {
    /// Convert to the service input.
    pub fn into_submission(self) -> BondSubmission {
        let mut nulls = Vec::new();
        BondSubmission {
            lei: text(self.lei, Field::Lei, &mut nulls),
            isin: text(self.isin, Field::Isin, &mut nulls),
            size: text(self.size, Field::Size, &mut nulls),
            currency: text(self.currency, Field::Currency, &mut nulls),
            maturity: text(self.maturity, Field::Maturity, &mut nulls),
            nulls,
        }
    }

    /// Read the text parts of a `multipart/form-data` body.
    ///
    /// Parts with other names, or without a name, are skipped.
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut request = Self::default();
        while let Some(part) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let Some(name) = part.name().map(str::to_string) else {
                continue;
            };
            let slot = match name.as_str() {
                "lei" => &mut request.lei,
                "isin" => &mut request.isin,
                "size" => &mut request.size,
                "currency" => &mut request.currency,
                "maturity" => &mut request.maturity,
                _ => continue,
            };
            let value = part
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            *slot = Some(Scalar::Text(value));
        }
        Ok(request)
    }
}

/// A create body read from JSON, an urlencoded form or a multipart form.
#[derive(Debug)]
pub struct BondPayload(pub CreateBondRequest);

impl<S> FromRequest<S> for BondPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mime = content_type.split(';').next().unwrap_or_default().trim();

        match mime {
            "application/json" => {
                let Json(body) = Json::<CreateBondRequest>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                Ok(Self(body))
            }
            "application/x-www-form-urlencoded" => {
                let Form(body) = Form::<CreateBondRequest>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                Ok(Self(body))
            }
            "multipart/form-data" => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                CreateBondRequest::from_multipart(multipart).await.map(Self)
            }
            other => Err(ApiError::UnsupportedMediaType(format!(
                "Unsupported media type \"{other}\" in request."
            ))),
        }
    }
}

/// A bond as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondResponse {
    /// ISIN.
    pub isin: String,
    /// Issue size.
    pub size: i64,
    /// Currency code.
    pub currency: String,
    /// Maturity date.
    pub maturity: NaiveDate,
    /// Legal Entity Identifier.
    pub lei: String,
    /// Legal name resolved at creation.
    pub legal_name: String,
}

impl From<Bond> for BondResponse {
    fn from(bond: Bond) -> Self {
        Self {
            isin: bond.isin.to_string(),
            size: bond.size,
            currency: bond.currency.to_string(),
            maturity: bond.maturity,
            lei: bond.lei.to_string(),
            legal_name: bond.legal_name.to_string(),
        }
    }
}
