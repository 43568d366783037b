//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Url;
use user_service::domain::EmptyObservationPolicy;
use user_service::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) provider_base_url: Url,
    pub(crate) provider_timeout: Option<Duration>,
    pub(crate) policy: EmptyObservationPolicy,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, provider_base_url: Url) -> Self {
        Self {
            bind_addr,
            db_pool,
            provider_base_url,
            provider_timeout: None,
            policy: EmptyObservationPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Choose how empty provider lists affect stored relations.
    #[must_use]
    pub fn with_policy(mut self, policy: EmptyObservationPolicy) -> Self {
        self.policy = policy;
        self
    }
}
