//! Mapping from pool and Diesel failures to [`UserPersistenceError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::UserPersistenceError;

use super::pool::PoolError;

/// Pool failures mean the store is unreachable.
pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Map a Diesel failure raised while writing `email`.
///
/// A unique violation on the email column becomes
/// [`UserPersistenceError::EmailConflict`]; everything else follows
/// [`map_diesel_error`].
pub(super) fn map_write_error(error: DieselError, email: &str) -> UserPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        let on_email = info
            .constraint_name()
            .is_some_and(|name| name.contains("email"));
        if on_email {
            debug!(constraint = ?info.constraint_name(), "email uniqueness violated");
            return UserPersistenceError::email_conflict(email);
        }
    }
    map_diesel_error(error)
}

/// Map a Diesel failure to a connection or query error.
pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, detail = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::DatabaseError(DatabaseErrorKind::UnableToSendCommand, _)
        | DieselError::BrokenTransactionManager => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}
