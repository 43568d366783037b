//! Reconciliation service implementing [`UserReconciliationCommand`].
//!
//! One call loads the user, asks the identity provider for the account,
//! followers and repositories keyed by the stored username, plans the
//! relation writes against what is persisted, applies everything in one
//! store transaction and returns the resulting `UserInfoChanged` event.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    IdentityProvider, UserReconciliation, UserReconciliationCommand, UserRepository,
};
use crate::domain::reconciler::{EmptyObservationPolicy, RelationPlan, plan_relation};
use crate::domain::user_events::{ChangeEventBuilder, UserInfoChangedEvent};
use crate::domain::user_service_errors::{map_persistence_error, map_provider_error};
use crate::domain::{Error, ProviderProfile, RelationKind, User, UserId};

/// Merges identity provider data into the user store.
#[derive(Clone)]
pub struct UserReconciliationService<R, P> {
    users: Arc<R>,
    provider: Arc<P>,
    events: ChangeEventBuilder,
    policy: EmptyObservationPolicy,
}

impl<R, P> UserReconciliationService<R, P> {
    /// Build the service with the default empty observation policy.
    pub fn new(users: Arc<R>, provider: Arc<P>, events: ChangeEventBuilder) -> Self {
        Self {
            users,
            provider,
            events,
            policy: EmptyObservationPolicy::default(),
        }
    }

    /// Override how empty provider observations treat persisted relations.
    pub fn with_policy(mut self, policy: EmptyObservationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<R, P> UserReconciliationService<R, P>
where
    R: UserRepository,
    P: IdentityProvider,
{
    async fn load_user(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn observe(&self, username: &str) -> Result<ProviderProfile, Error> {
        let account = self
            .provider
            .fetch_profile(username)
            .await
            .map_err(map_provider_error)?
            .unwrap_or_default();
        let followers = self
            .provider
            .fetch_followers(username)
            .await
            .map_err(map_provider_error)?;
        let repositories = self
            .provider
            .fetch_repositories(username)
            .await
            .map_err(map_provider_error)?;

        Ok(ProviderProfile {
            email: account.email,
            username: account.login,
            followers,
            repositories,
        })
    }

    async fn plan(
        &self,
        user_id: UserId,
        kind: RelationKind,
        observed: &[String],
    ) -> Result<RelationPlan, Error> {
        let existing = if observed.is_empty() {
            Vec::new()
        } else {
            self.users
                .list_relation(user_id, kind)
                .await
                .map_err(map_persistence_error)?
        };
        let plan = plan_relation(observed, &existing, self.policy);
        debug!(
            user_id = %user_id,
            relation = %kind,
            observed = observed.len(),
            inserts = plan.insert_count(),
            clear = matches!(plan, RelationPlan::Clear),
            "relation planned"
        );
        Ok(plan)
    }
}

#[async_trait]
impl<R, P> UserReconciliationCommand for UserReconciliationService<R, P>
where
    R: UserRepository,
    P: IdentityProvider,
{
    async fn reconcile(&self, user_id: UserId) -> Result<UserInfoChangedEvent, Error> {
        let mut user = self.load_user(user_id).await?;
        let observed = self.observe(user.username()).await?;
        user.merge_provider_profile(&observed);

        let followers = self
            .plan(user_id, RelationKind::Followers, &observed.followers)
            .await?;
        let repositories = self
            .plan(user_id, RelationKind::Repositories, &observed.repositories)
            .await?;

        let reconciliation = UserReconciliation {
            user,
            followers,
            repositories,
        };
        self.users
            .apply_reconciliation(&reconciliation)
            .await
            .map_err(map_persistence_error)?;

        info!(
            user_id = %user_id,
            followers_inserted = reconciliation.followers.insert_count(),
            repositories_inserted = reconciliation.repositories.insert_count(),
            "user reconciled from identity provider"
        );
        Ok(self.events.build(&reconciliation.user))
    }
}

#[cfg(test)]
#[path = "user_reconciliation_service_tests.rs"]
mod tests;
