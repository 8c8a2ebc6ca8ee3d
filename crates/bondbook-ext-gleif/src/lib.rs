//! # Bondbook Ext GLEIF
//!
//! Legal-name resolution against the GLEIF LEI-lookup API.
//!
//! One GET per lookup, bounded by a request timeout. Responses are not
//! cached and failed lookups are not retried.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod records;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use bondbook_core::{LegalName, Lei};
use bondbook_traits::error::ResolveError;
use bondbook_traits::resolver::LegalNameResolver;

use records::LeiRecord;

/// Default lookup endpoint.
pub const DEFAULT_BASE_URL: &str = "https://leilookup.gleif.org/api/v2/leirecords";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`GleifResolver`].
#[derive(Debug, Clone)]
pub struct GleifConfig {
    /// Lookup endpoint; the LEI is sent as the `lei` query parameter.
    pub base_url: String,
    /// Deadline for the whole request, body included.
    pub timeout: Duration,
}

impl Default for GleifConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GleifConfig {
    /// Override the endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Resolver backed by the GLEIF LEI-lookup API.
#[derive(Debug, Clone)]
pub struct GleifResolver {
    client: Client,
    base_url: String,
}

impl GleifResolver {
    /// Build a resolver with its own HTTP client.
    pub fn new(config: GleifConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("bondbook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ResolveError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }
}

fn transport_error(e: reqwest::Error) -> ResolveError {
    if e.is_timeout() {
        ResolveError::Timeout
    } else {
        ResolveError::Transport(e.to_string())
    }
}

/// Pick the legal name for `lei` out of a lookup response body.
fn legal_name_from_body(lei: &Lei, body: &[u8]) -> Result<LegalName, ResolveError> {
    let records: Vec<LeiRecord> =
        serde_json::from_slice(body).map_err(|e| ResolveError::Malformed(e.to_string()))?;

    let record = records
        .iter()
        .find(|r| r.lei.value == lei.as_str())
        .ok_or_else(|| ResolveError::NotFound(lei.to_string()))?;

    record
        .legal_name()
        .map(LegalName::new)
        .ok_or_else(|| ResolveError::Malformed(format!("record for {lei} has no legal name")))
}

#[async_trait]
impl LegalNameResolver for GleifResolver {
    async fn resolve_legal_name(&self, lei: &Lei) -> Result<LegalName, ResolveError> {
        debug!(%lei, url = %self.base_url, "looking up legal name");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("lei", lei.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let name = legal_name_from_body(lei, &body)?;

        debug!(%lei, legal_name = %name, "legal name resolved");
        Ok(name)
    }

    fn name(&self) -> &'static str {
        "gleif"
    }
}
