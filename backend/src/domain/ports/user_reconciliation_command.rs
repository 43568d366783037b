//! Driving port for refreshing a user from the identity provider.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserInfoChangedEvent};

/// Driving port consumed by inbound adapters to reconcile one user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserReconciliationCommand: Send + Sync {
    /// Pull provider data, merge it into the store and describe the result.
    ///
    /// # Errors
    ///
    /// - `not_found` when the user does not exist.
    /// - `conflict` when the provider email belongs to another user.
    /// - `service_unavailable` when the store or the provider cannot be
    ///   reached.
    async fn reconcile(&self, user_id: UserId) -> Result<UserInfoChangedEvent, Error>;
}
