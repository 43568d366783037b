//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the user and health endpoints together with the
//! error envelope and event schemas. The document backs Swagger UI in debug
//! builds and is exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::user_events::{EventMeta, UserInfoPayload};
use crate::domain::{Error, ErrorCode, UserInfoChangedEvent};
use crate::inbound::http::users::{UpdateUserData, UpdateUserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User service API",
        description = "Profile updates and identity provider reconciliation for stored users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::produce_user_info,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UpdateUserRequest,
        UpdateUserData,
        UserInfoChangedEvent,
        EventMeta,
        UserInfoPayload
    )),
    tags(
        (name = "users", description = "Profile updates and reconciliation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
