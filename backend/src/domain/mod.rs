//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: hold the user model, the set reconciler, the `UserInfoChanged`
//! event and the services behind the driving ports. Nothing in here knows
//! about HTTP, SQL or the provider's wire format.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - User (alias to `user::User`): the user aggregate.
//! - UserInfoChangedEvent: event returned by reconciliation.
//! - UserProfileService / UserReconciliationService: driving port
//!   implementations.

pub mod error;
pub mod ports;
pub mod reconciler;
pub mod trace_id;
pub mod user;
pub mod user_events;
mod user_profile_service;
mod user_reconciliation_service;
mod user_service_errors;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::reconciler::{EmptyObservationPolicy, RelationPlan};
pub use self::trace_id::TraceId;
pub use self::user::{
    ProfileUpdate, ProviderProfile, RelationKind, User, UserId, UserValidationError,
};
pub use self::user_events::{
    ChangeEventBuilder, EventIdGenerator, RandomEventIds, UserInfoChangedEvent,
};
pub use self::user_profile_service::UserProfileService;
pub use self::user_reconciliation_service::UserReconciliationService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use user_service::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such user"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
