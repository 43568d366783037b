//! Driven port for the external identity provider.
//!
//! A non-success HTTP status is not an error at this boundary: adapters
//! return `None` or an empty list so callers see "no data". Only transport,
//! timeout and decode failures surface as [`IdentityProviderError`].

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Fatal failures while talking to the identity provider.
    pub enum IdentityProviderError {
        /// The provider could not be reached.
        Transport { message: String } => "identity provider transport failed: {message}",
        /// The request exceeded the configured client timeout.
        Timeout { message: String } => "identity provider timed out: {message}",
        /// A success response carried a body that could not be decoded.
        Decode { message: String } => "identity provider response could not be decoded: {message}",
    }
}

/// Public account fields reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderAccount {
    pub login: Option<String>,
    pub email: Option<String>,
}

/// Port for reading public account data from the provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Account details, or `None` when the provider answered non-2xx.
    async fn fetch_profile(
        &self,
        username: &str,
    ) -> Result<Option<ProviderAccount>, IdentityProviderError>;

    /// Follower logins, empty when the provider answered non-2xx.
    async fn fetch_followers(&self, username: &str) -> Result<Vec<String>, IdentityProviderError>;

    /// Repository names, empty when the provider answered non-2xx.
    async fn fetch_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<String>, IdentityProviderError>;
}
