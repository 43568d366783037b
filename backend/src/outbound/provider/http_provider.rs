//! Reqwest-backed identity provider adapter.
//!
//! Issues three GET requests per user against a GitHub-compatible API:
//! `/users/{name}`, `/users/{name}/followers` and `/users/{name}/repos`.
//! Non-success statuses collapse to "no data" and are logged; transport,
//! timeout and decode failures are returned as errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{AccountDto, FollowerDto, RepositoryDto};
use crate::domain::ports::{IdentityProvider, IdentityProviderError, ProviderAccount};

const DEFAULT_USER_AGENT: &str = "user-service/0.1";
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Errors raised while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpIdentityProviderBuildError {
    #[error("provider base URL `{0}` cannot carry a path")]
    InvalidBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for [`HttpIdentityProvider`].
#[derive(Debug, Clone)]
pub struct HttpIdentityProviderConfig {
    pub base_url: Url,
    pub user_agent: String,
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl HttpIdentityProviderConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Identity provider adapter over HTTP.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl HttpIdentityProvider {
    /// Build the adapter.
    ///
    /// # Errors
    ///
    /// Fails when the base URL cannot take path segments or the reqwest
    /// client cannot be constructed.
    pub fn new(config: HttpIdentityProviderConfig) -> Result<Self, HttpIdentityProviderBuildError> {
        if config.base_url.cannot_be_a_base() {
            return Err(HttpIdentityProviderBuildError::InvalidBaseUrl(
                config.base_url.to_string(),
            ));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url,
            user_agent: config.user_agent,
        })
    }

    fn user_url(&self, username: &str, tail: Option<&str>) -> Result<Url, IdentityProviderError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                IdentityProviderError::transport("provider base URL cannot carry a path")
            })?;
            segments.pop_if_empty().push("users").push(username);
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }
        Ok(url)
    }

    /// GET `url` and decode the body, or `None` on a non-success status.
    async fn get_json<T>(&self, url: Url) -> Result<Option<T>, IdentityProviderError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, ACCEPT_JSON)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %url,
                status = status.as_u16(),
                "identity provider returned non-success status; treating as no data"
            );
            return Ok(None);
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(url = %url, bytes = body.len(), "identity provider response received");
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|error| IdentityProviderError::decode(format!("{url}: {error}")))
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::timeout(error.to_string())
    } else if error.is_decode() {
        IdentityProviderError::decode(error.to_string())
    } else {
        IdentityProviderError::transport(error.to_string())
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn fetch_profile(
        &self,
        username: &str,
    ) -> Result<Option<ProviderAccount>, IdentityProviderError> {
        let url = self.user_url(username, None)?;
        let account: Option<AccountDto> = self.get_json(url).await?;
        Ok(account.map(ProviderAccount::from))
    }

    async fn fetch_followers(&self, username: &str) -> Result<Vec<String>, IdentityProviderError> {
        let url = self.user_url(username, Some("followers"))?;
        let followers: Option<Vec<FollowerDto>> = self.get_json(url).await?;
        Ok(followers
            .unwrap_or_default()
            .into_iter()
            .map(|follower| follower.login)
            .collect())
    }

    async fn fetch_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<String>, IdentityProviderError> {
        let url = self.user_url(username, Some("repos"))?;
        let repositories: Option<Vec<RepositoryDto>> = self.get_json(url).await?;
        Ok(repositories
            .unwrap_or_default()
            .into_iter()
            .map(|repository| repository.name)
            .collect())
    }
}

#[cfg(test)]
#[path = "http_provider_tests.rs"]
mod tests;
