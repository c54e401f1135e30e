use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::policy;
use crate::prescriptions::models::{
    CreatePrescriptionRequest, Prescription, PrescriptionQuery, UpdatePrescriptionRequest,
};
use crate::validation::{ApiPath, ApiQuery, ValidatedJson};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/prescriptions",
    params(PrescriptionQuery),
    responses((status = 200, description = "Prescriptions", body = [Prescription])),
    security(("bearer" = [])),
    tag = "prescriptions"
)]
pub async fn list_prescriptions(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<PrescriptionQuery>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let prescriptions = state.prescriptions.list(query.patient_id).await?;
    Ok(Json(prescriptions))
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/{id}",
    params(("id" = i32, Path, description = "Prescription ID")),
    responses(
        (status = 200, description = "Prescription found", body = Prescription),
        (status = 404, description = "Prescription not found")
    ),
    security(("bearer" = [])),
    tag = "prescriptions"
)]
pub async fn get_prescription(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Prescription>, ApiError> {
    let prescription = state
        .prescriptions
        .find_by_id(id)
        .await?
        .ok_or(ApiError::not_found("Prescription"))?;

    Ok(Json(prescription))
}

/// Create a prescription signed by the calling doctor
#[utoipa::path(
    post,
    path = "/api/prescriptions",
    request_body = CreatePrescriptionRequest,
    responses(
        (status = 201, description = "Prescription created", body = Prescription),
        (status = 400, description = "Invalid request")
    ),
    security(("bearer" = [])),
    tag = "prescriptions"
)]
pub async fn create_prescription(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    let new_prescription = policy::stamp_prescription(&user, request);
    let prescription = state.prescriptions.create(&new_prescription).await?;

    tracing::info!(
        "Prescription created - id={} patient={} doctor={}",
        prescription.id,
        prescription.patient_id,
        prescription.doctor_id
    );
    Ok((StatusCode::CREATED, Json(prescription)))
}

#[utoipa::path(
    put,
    path = "/api/prescriptions/{id}",
    params(("id" = i32, Path, description = "Prescription ID")),
    request_body = UpdatePrescriptionRequest,
    responses(
        (status = 200, description = "Prescription updated", body = Prescription),
        (status = 404, description = "Prescription not found")
    ),
    security(("bearer" = [])),
    tag = "prescriptions"
)]
pub async fn update_prescription(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(update): ValidatedJson<UpdatePrescriptionRequest>,
) -> Result<Json<Prescription>, ApiError> {
    let mut prescription = state
        .prescriptions
        .find_by_id(id)
        .await?
        .ok_or(ApiError::not_found("Prescription"))?;

    prescription.apply(update);

    let saved = state
        .prescriptions
        .save(&prescription)
        .await?
        .ok_or(ApiError::not_found("Prescription"))?;

    Ok(Json(saved))
}

#[utoipa::path(
    delete,
    path = "/api/prescriptions/{id}",
    params(("id" = i32, Path, description = "Prescription ID")),
    responses((status = 200, description = "Prescription deleted", body = MessageResponse)),
    security(("bearer" = [])),
    tag = "prescriptions"
)]
pub async fn delete_prescription(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.prescriptions.soft_delete(id).await? {
        tracing::info!("Soft-deleted prescription id={}", id);
    }

    Ok(Json(MessageResponse::new("Prescription deleted successfully")))
}
