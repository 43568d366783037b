//! Service settings loaded via OrthoConfig.
//!
//! Every field can be supplied as a CLI flag or a `USER_SERVICE_*`
//! environment variable. Optional values fall back to the defaults below
//! through the accessor methods.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use user_service::domain::EmptyObservationPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.github.com";

/// Errors raised when a loaded setting cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database_url is required (set USER_SERVICE_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("bind_addr `{value}` is not a socket address: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("provider_base_url `{value}` is not a URL: {source}")]
    InvalidProviderUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("empty_observation_policy: {0}")]
    InvalidPolicy(#[from] user_service::domain::reconciler::UnknownPolicyError),
}

/// Runtime configuration for the user service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServiceSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Base URL of the identity provider API.
    pub provider_base_url: Option<String>,
    /// Whole-request timeout for provider calls, in seconds.
    pub provider_timeout_secs: Option<u64>,
    /// `clear` or `retain`; see [`EmptyObservationPolicy`].
    pub empty_observation_policy: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    pub pool_max_size: Option<u32>,
}

impl ServiceSettings {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    pub fn provider_base_url(&self) -> Result<Url, SettingsError> {
        let value = self
            .provider_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PROVIDER_BASE_URL);
        Url::parse(value).map_err(|source| SettingsError::InvalidProviderUrl {
            value: value.to_owned(),
            source,
        })
    }

    /// Provider timeout. Unset means requests are unbounded.
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_secs.map(Duration::from_secs)
    }

    pub fn empty_observation_policy(&self) -> Result<EmptyObservationPolicy, SettingsError> {
        match self.empty_observation_policy.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(EmptyObservationPolicy::default()),
        }
    }
}
