//! Mapping from driven-port failures to domain [`Error`] values.

use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{IdentityProviderError, UserPersistenceError};

/// Translate a user store failure into the domain error taxonomy.
pub(crate) fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::NotFound { id } => Error::not_found(format!("user {id} not found")),
        UserPersistenceError::EmailConflict { email } => {
            Error::conflict(format!("email {email} is already in use")).with_details(json!({
                "field": "email",
                "code": "email_in_use",
            }))
        }
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Translate an identity provider failure into the domain error taxonomy.
///
/// Every provider failure is fatal to the calling operation and surfaces as
/// `service_unavailable`.
pub(crate) fn map_provider_error(error: IdentityProviderError) -> Error {
    Error::service_unavailable(format!("identity provider unavailable: {error}"))
}
