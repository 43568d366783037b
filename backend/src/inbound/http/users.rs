//! User profile and reconciliation handlers.
//!
//! ```text
//! PUT /users/{user_id} {"data":{"email":"a@b.test","first_name":"Ada","last_name":"Lovelace","time_zone_id":"Europe/London"}}
//! POST /produce/{user_id}
//! ```
//!
//! Identifiers outside `\d+` never match a route and fall through to 404.

use actix_web::{HttpResponse, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UpdateProfileRequest;
use crate::domain::{Error, ProfileUpdate, UserInfoChangedEvent};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_user_id, require_text};

const USER_ID: FieldName = FieldName::new("user_id");

/// Envelope for `PUT /users/{user_id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub data: Option<UpdateUserData>,
}

/// Mutable profile fields. All four are required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserData {
    #[schema(example = "ada@example.test")]
    pub email: Option<String>,
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    #[schema(example = "Lovelace")]
    pub last_name: Option<String>,
    #[schema(example = "Europe/London")]
    pub time_zone_id: Option<String>,
}

fn parse_update(payload: UpdateUserRequest) -> Result<ProfileUpdate, Error> {
    let data = payload
        .data
        .ok_or_else(|| missing_field_error(FieldName::new("data")))?;
    Ok(ProfileUpdate {
        email: Some(require_text(data.email, FieldName::new("email"))?),
        first_name: Some(require_text(data.first_name, FieldName::new("first_name"))?),
        last_name: Some(require_text(data.last_name, FieldName::new("last_name"))?),
        time_zone_id: Some(require_text(
            data.time_zone_id,
            FieldName::new("time_zone_id"),
        )?),
    })
}

/// Overwrite the mutable profile fields of one user.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(("user_id" = i32, Path, description = "Positive user identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Invalid request or email already in use", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Store unavailable or internal error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{user_id:\\d+}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = parse_user_id(&path.into_inner(), USER_ID)?;
    let update = parse_update(payload.into_inner())?;
    state
        .profile
        .update_profile(UpdateProfileRequest { user_id, update })
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Refresh one user from the identity provider and return the change event.
#[utoipa::path(
    post,
    path = "/produce/{user_id}",
    params(("user_id" = i32, Path, description = "Positive user identifier")),
    responses(
        (status = 200, description = "User reconciled", body = UserInfoChangedEvent),
        (status = 400, description = "Invalid identifier or email already in use", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Store or provider unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "produceUserInfo"
)]
#[post("/produce/{user_id:\\d+}")]
pub async fn produce_user_info(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserInfoChangedEvent>> {
    let user_id = parse_user_id(&path.into_inner(), USER_ID)?;
    let event = state.reconciliation.reconcile(user_id).await?;
    Ok(web::Json(event))
}
