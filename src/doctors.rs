// Doctor directory, read from the users table

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AuthenticatedUser, Role, UserResponse};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorList {
    pub doctors: Vec<UserResponse>,
}

/// List every registered doctor; password hashes are never serialized
#[utoipa::path(
    get,
    path = "/api/doctors",
    responses((status = 200, description = "Registered doctors", body = DoctorList)),
    security(("bearer" = [])),
    tag = "doctors"
)]
pub async fn list_doctors(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<DoctorList>, ApiError> {
    let doctors = state
        .users
        .list_by_user_type(Role::Doctor.as_str())
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(DoctorList { doctors }))
}
