// HTTP handlers for patient endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::patients::models::{CreatePatientRequest, Patient, PatientList, UpdatePatientRequest};
use crate::policy::{self, PatientScope};
use crate::validation::{ApiPath, ValidatedJson};
use crate::AppState;

/// List patients; caregivers only see the patients they own
#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "Visible patients, newest first", body = PatientList),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "patients"
)]
pub async fn list_patients(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<PatientList>, ApiError> {
    let scope = PatientScope::for_user(&user);
    tracing::debug!("Listing patients for user_id={} scope={:?}", user.user_id, scope);

    let patients = state.patients.list(scope).await?;
    tracing::debug!("Retrieved {} patients", patients.len());
    Ok(Json(PatientList { patients }))
}

/// Fetch one patient by id
///
/// Any authenticated caller may read any patient; there is no ownership check.
#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = i32, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient found", body = Patient),
        (status = 404, description = "Patient not found")
    ),
    security(("bearer" = [])),
    tag = "patients"
)]
pub async fn get_patient(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Patient>, ApiError> {
    let patient = state
        .patients
        .find_by_id(id)
        .await?
        .ok_or(ApiError::not_found("Patient"))?;

    Ok(Json(patient))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid input")
    ),
    security(("bearer" = [])),
    tag = "patients"
)]
pub async fn create_patient(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let new_patient = policy::stamp_patient(&user, request);
    let patient = state.patients.create(&new_patient).await?;

    tracing::info!(
        "Created patient id={} caregiver_id={:?}",
        patient.id,
        patient.caregiver_id
    );
    Ok((StatusCode::CREATED, Json(patient)))
}

/// Overlay the supplied fields onto the stored patient
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(("id" = i32, Path, description = "Patient ID")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 404, description = "Patient not found")
    ),
    security(("bearer" = [])),
    tag = "patients"
)]
pub async fn update_patient(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(update): ValidatedJson<UpdatePatientRequest>,
) -> Result<Json<Patient>, ApiError> {
    let mut patient = state
        .patients
        .find_by_id(id)
        .await?
        .ok_or(ApiError::not_found("Patient"))?;

    patient.apply(update);

    let saved = state
        .patients
        .save(&patient)
        .await?
        .ok_or(ApiError::not_found("Patient"))?;

    tracing::info!("Updated patient id={}", id);
    Ok(Json(saved))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    params(("id" = i32, Path, description = "Patient ID")),
    responses((status = 200, description = "Patient deleted", body = MessageResponse)),
    security(("bearer" = [])),
    tag = "patients"
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.patients.soft_delete(id).await? {
        tracing::info!("Soft-deleted patient id={}", id);
    } else {
        tracing::debug!("Delete of patient id={} matched no live row", id);
    }

    Ok(Json(MessageResponse::new("Patient deleted successfully")))
}
