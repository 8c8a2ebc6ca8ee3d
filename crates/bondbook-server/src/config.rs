//! Server configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bondbook_ext_gleif::DEFAULT_BASE_URL;

/// Header carrying the caller identity when none is configured.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-authenticated-user";

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ServerConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which legal-name resolver to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// The GLEIF LEI-lookup API
    #[default]
    Gleif,
    /// A JSON fixture, for offline use
    Static,
}

/// Legal-name resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Resolver backend
    #[serde(default)]
    pub kind: ResolverKind,

    /// GLEIF lookup endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// GLEIF request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// JSON fixture for the static resolver; the bundled fixture if absent
    pub fixture_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: ResolverKind::default(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            fixture_file: None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Redb database file; in-memory storage if absent
    pub storage_path: Option<PathBuf>,

    /// Currency list; the bundled list if absent
    pub currencies_file: Option<PathBuf>,

    /// Load the currency list into the registry at startup
    #[serde(default = "default_true")]
    pub populate_on_start: bool,

    /// Request header carrying the authenticated user
    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    /// Legal-name resolver
    #[serde(default)]
    pub resolver: ResolverConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_identity_header() -> String {
    DEFAULT_IDENTITY_HEADER.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage_path: None,
            currencies_file: None,
            populate_on_start: true,
            identity_header: default_identity_header(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Socket address to listen on. `host` must be an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.trim().parse().map_err(|_| {
            ConfigError::Invalid(format!("host {:?} is not an IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.identity_header.trim().is_empty() {
            return Err(ConfigError::Invalid("identity_header must not be empty".into()));
        }
        if self.resolver.timeout_secs == 0 {
            return Err(ConfigError::Invalid("resolver.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
