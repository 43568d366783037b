//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod user_profile_command;
mod user_reconciliation_command;
mod user_repository;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError, ProviderAccount};
#[cfg(test)]
pub use user_profile_command::MockUserProfileCommand;
pub use user_profile_command::{UpdateProfileRequest, UserProfileCommand};
#[cfg(test)]
pub use user_reconciliation_command::MockUserReconciliationCommand;
pub use user_reconciliation_command::UserReconciliationCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserReconciliation, UserRepository};
