//! Driving port for in-place profile updates.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, UserId};

/// Request to update the mutable profile fields of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    pub user_id: UserId,
    pub update: ProfileUpdate,
}

/// Driving port consumed by inbound adapters to edit a user profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Apply the partial update and persist it.
    ///
    /// # Errors
    ///
    /// - `not_found` when the user does not exist.
    /// - `conflict` when the new email belongs to another user.
    /// - `service_unavailable` when the store cannot be reached.
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<(), Error>;
}
