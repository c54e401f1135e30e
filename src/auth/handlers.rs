// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest},
};
use crate::models::MessageResponse;
use crate::validation::ValidatedJson;
use crate::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already exists")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let response = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log a user in; also mounted at /auth/user/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Missing token or invalid old password"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn change_password_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    state
        .auth_service
        .change_password(user.user_id, request)
        .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
