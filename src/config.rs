// Configuration module - environment-sourced service configuration
//
// Configuration is read once at startup and handed to the rest of the
// service as an immutable struct. Nothing here is re-read per request.

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{DEFAULT_LOGO_PATH, DEFAULT_PORT, DEFAULT_REGION, DEFAULT_STACK_NAME};

/// Errors detected while reading the environment.
///
/// These are startup errors only; a running service never produces them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT value '{0}': expected a TCP port number")]
    InvalidPort(String),

    #[error("incomplete TLS configuration: {0} is set but {1} is not")]
    IncompleteTls(&'static str, &'static str),
}

/// Immutable service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Path of the logo composited onto every upload.
    pub logo_path: PathBuf,
    /// Deployment label reported by the greeting endpoint.
    pub stack_name: String,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Plain HTTP listen port.
    pub port: u16,
    /// When present, a secondary TLS listener is bound on the fixed TLS port.
    pub tls: Option<TlsConfig>,
}

/// PEM file paths for the secondary TLS listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Object storage connection settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage region, `eu-west-1` unless overridden.
    pub region: String,
    /// Static access key id; when absent the SDK's default provider chain is
    /// used instead.
    pub access_key_id: Option<String>,
    /// Static secret access key, paired with `access_key_id`.
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible servers. Switches public URLs to
    /// path style.
    pub endpoint: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Tests pass closures over plain maps so they never touch
    /// the process environment. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let tls = match (lookup("TLS_CERT_FILE"), lookup("TLS_KEY_FILE")) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (Some(_), None) => {
                return Err(ConfigError::IncompleteTls("TLS_CERT_FILE", "TLS_KEY_FILE"))
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteTls("TLS_KEY_FILE", "TLS_CERT_FILE"))
            }
            (None, None) => None,
        };

        Ok(Config {
            server: ServerConfig { port, tls },
            storage: StorageConfig {
                region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                access_key_id: lookup("KEY_ID"),
                secret_access_key: lookup("ACCESS_KEY"),
                endpoint: lookup("S3_ENDPOINT"),
            },
            logo_path: lookup("LOGO_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGO_PATH)),
            stack_name: lookup("STACK_NAME").unwrap_or_else(|| DEFAULT_STACK_NAME.to_string()),
        })
    }
}
