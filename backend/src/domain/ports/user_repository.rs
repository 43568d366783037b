//! Driven port for the user store.
//!
//! The store owns the `users` row plus the two relation tables. Adapters
//! must apply [`UserRepository::update_profile`] and
//! [`UserRepository::apply_reconciliation`] atomically: either every write
//! lands or none does.

use async_trait::async_trait;

use crate::domain::reconciler::RelationPlan;
use crate::domain::{RelationKind, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserPersistenceError {
        /// The store could not be reached or no connection was available.
        Connection { message: String } => "user repository connection failed: {message}",
        /// A statement failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// No user row exists for the identifier.
        NotFound { id: i32 } => "user {id} not found",
        /// Another user already owns the email address.
        EmailConflict { email: String } => "email {email} is already in use",
    }
}

/// Writes produced by one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReconciliation {
    /// User state after merging the provider profile.
    pub user: User,
    pub followers: RelationPlan,
    pub repositories: RelationPlan,
}

impl UserReconciliation {
    /// Plan for the given relation.
    pub fn plan(&self, kind: RelationKind) -> &RelationPlan {
        match kind {
            RelationKind::Followers => &self.followers,
            RelationKind::Repositories => &self.repositories,
        }
    }
}

/// Port for reading and mutating persisted users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the scalar fields of a user. Relations come back empty.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Persisted values of one relation, in insertion order.
    ///
    /// Values stored as `NULL` are returned as `None`.
    async fn list_relation(
        &self,
        id: UserId,
        kind: RelationKind,
    ) -> Result<Vec<Option<String>>, UserPersistenceError>;

    /// Persist the scalar fields of `user`.
    ///
    /// # Errors
    ///
    /// - [`UserPersistenceError::EmailConflict`] when another user owns the
    ///   email; nothing is written.
    /// - [`UserPersistenceError::NotFound`] when the row vanished.
    async fn update_profile(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Apply relation plans and the scalar update in one transaction.
    ///
    /// Relation writes happen first, then the email uniqueness check, then
    /// the scalar update. The first failure rolls everything back.
    async fn apply_reconciliation(
        &self,
        reconciliation: &UserReconciliation,
    ) -> Result<(), UserPersistenceError>;
}
