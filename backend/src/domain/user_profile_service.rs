//! Profile update service implementing [`UserProfileCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{UpdateProfileRequest, UserProfileCommand, UserRepository};
use crate::domain::user_service_errors::map_persistence_error;

/// Applies partial profile updates through the user store.
#[derive(Clone)]
pub struct UserProfileService<R> {
    users: Arc<R>,
}

impl<R> UserProfileService<R> {
    /// Build the service over a user store.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> UserProfileCommand for UserProfileService<R>
where
    R: UserRepository,
{
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<(), Error> {
        let UpdateProfileRequest { user_id, update } = request;
        let mut user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;

        user.apply_profile_update(&update);
        self.users
            .update_profile(&user)
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user_id, "user profile updated");
        Ok(())
    }
}
