//! `UserInfoChanged` event emitted after a reconciliation.
//!
//! The wire shape is a `meta` envelope plus a `payload` describing the
//! post-reconciliation user. Relation lists are omitted from the payload when
//! empty.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::TraceId;
use crate::domain::user::User;

/// Event type tag carried in `meta.type`.
pub const USER_INFO_CHANGED: &str = "UserInfoChanged";
/// Originating service recorded in `meta.service_id`.
pub const SERVICE_ID: &str = "user-service";
/// Current schema version of [`UserInfoChangedEvent`].
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Event envelope metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventMeta {
    #[serde(rename = "type")]
    #[schema(example = "UserInfoChanged")]
    pub kind: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub event_id: String,
    /// Unix timestamp in nanoseconds.
    pub created_at: i64,
    pub trace_id: String,
    #[schema(example = "user-service")]
    pub service_id: String,
    #[schema(example = 1)]
    pub version: u32,
}

/// User state after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfoPayload {
    pub id: i32,
    #[serde(rename = "userName")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub followers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repos: Vec<String>,
    #[serde(rename = "userEmail")]
    pub email: String,
    #[serde(rename = "userFirstName")]
    pub first_name: String,
    #[serde(rename = "userLastName")]
    pub last_name: String,
    #[serde(rename = "userTimeZoneId")]
    pub time_zone_id: String,
}

impl From<&User> for UserInfoPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            username: user.username().to_owned(),
            followers: user.followers().to_vec(),
            repos: user.repositories().to_vec(),
            email: user.email().to_owned(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            time_zone_id: user.time_zone_id().to_owned(),
        }
    }
}

/// Versioned `UserInfoChanged` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfoChangedEvent {
    pub meta: EventMeta,
    pub payload: UserInfoPayload,
}

/// Source of unique event identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait EventIdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Random UUIDv4 event identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEventIds;

impl EventIdGenerator for RandomEventIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Assembles [`UserInfoChangedEvent`] values.
///
/// The event id and timestamp come from the injected generator and clock.
/// The trace id is the request's [`TraceId`] when one is in scope, otherwise
/// a fresh identifier.
#[derive(Clone)]
pub struct ChangeEventBuilder {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn EventIdGenerator>,
}

impl ChangeEventBuilder {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn EventIdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Build the event describing `user` as it stands now.
    pub fn build(&self, user: &User) -> UserInfoChangedEvent {
        let now = self.clock.utc();
        let created_at = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_millis().saturating_mul(1_000_000));

        UserInfoChangedEvent {
            meta: EventMeta {
                kind: USER_INFO_CHANGED.to_owned(),
                event_id: self.ids.next_id().to_string(),
                created_at,
                trace_id: TraceId::current_or_generate().to_string(),
                service_id: SERVICE_ID.to_owned(),
                version: EVENT_SCHEMA_VERSION,
            },
            payload: UserInfoPayload::from(user),
        }
    }
}

impl Default for ChangeEventBuilder {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock), Arc::new(RandomEventIds))
    }
}

impl std::fmt::Debug for ChangeEventBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeEventBuilder").finish_non_exhaustive()
    }
}
