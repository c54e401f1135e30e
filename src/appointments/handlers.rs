// HTTP handlers for appointment endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::appointments::models::{
    Appointment, AppointmentList, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::policy::{self, AppointmentScope};
use crate::validation::{ApiPath, ValidatedJson};
use crate::AppState;

/// List appointments; patients and doctors only see their own
#[utoipa::path(
    get,
    path = "/api/appointments",
    responses(
        (status = 200, description = "Visible appointments, newest first", body = AppointmentList),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<AppointmentList>, ApiError> {
    let scope = AppointmentScope::for_user(&user);
    tracing::debug!("Listing appointments for user_id={} scope={:?}", user.user_id, scope);

    let appointments = state.appointments.list(scope).await?;
    tracing::debug!("Found {} appointments", appointments.len());
    Ok(Json(AppointmentList { appointments }))
}

/// Fetch one appointment by id, without an ownership check
#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(("id" = i32, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment found", body = Appointment),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer" = [])),
    tag = "appointments"
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = state
        .appointments
        .find_by_id(id)
        .await?
        .ok_or(ApiError::not_found("Appointment"))?;

    Ok(Json(appointment))
}

/// Book an appointment; patients only, always for themselves
#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Doctor ID is required"),
        (status = 403, description = "Only patients can book appointments")
    ),
    security(("bearer" = [])),
    tag = "appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<ValidatedJson<CreateAppointmentRequest>, ApiError>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    policy::require_patient(&user)?;
    let ValidatedJson(request) = body?;

    let new_appointment = policy::stamp_appointment(&user, request)?;
    let appointment = state.appointments.create(&new_appointment).await?;

    tracing::info!(
        "Appointment created - id={} patient={} doctor={}",
        appointment.id,
        appointment.patient_id,
        appointment.doctor_id
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    params(("id" = i32, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = Appointment),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer" = [])),
    tag = "appointments"
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(update): ValidatedJson<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let mut appointment = state
        .appointments
        .find_by_id(id)
        .await?
        .ok_or(ApiError::not_found("Appointment"))?;

    appointment.apply(update);

    let saved = state
        .appointments
        .save(&appointment)
        .await?
        .ok_or(ApiError::not_found("Appointment"))?;

    tracing::info!("Updated appointment id={} status={:?}", id, saved.status);
    Ok(Json(saved))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    params(("id" = i32, Path, description = "Appointment ID")),
    responses((status = 200, description = "Appointment deleted", body = MessageResponse)),
    security(("bearer" = [])),
    tag = "appointments"
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.appointments.soft_delete(id).await? {
        tracing::info!("Soft-deleted appointment id={}", id);
    }

    Ok(Json(MessageResponse::new("Appointment deleted successfully")))
}
