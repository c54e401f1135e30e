// HTTP handlers for job board endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::jobs::models::{CreateJobRequest, Job, JobCreated, JobList, JobQuery, UpdateJobRequest};
use crate::models::MessageResponse;
use crate::policy;
use crate::validation::{ApiPath, ApiQuery, ValidatedJson};
use crate::AppState;

/// List job postings with the given status (active when omitted)
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobQuery),
    responses((status = 200, description = "Job postings", body = JobList)),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<JobQuery>,
) -> Result<Json<JobList>, ApiError> {
    let jobs = state.jobs.list(query.status.unwrap_or_default()).await?;
    Ok(Json(JobList { jobs }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job found", body = Job),
        (status = 404, description = "Job not found")
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn get_job(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Job>, ApiError> {
    let job = state
        .jobs
        .find_by_id(id)
        .await?
        .ok_or(ApiError::not_found("Job"))?;

    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobCreated),
        (status = 400, description = "Invalid request")
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobCreated>), ApiError> {
    let new_job = policy::stamp_job(&user, request);
    let job = state.jobs.create(&new_job).await?;

    tracing::info!("Job created - id={} posted_by={}", job.id, job.posted_by);
    Ok((
        StatusCode::CREATED,
        Json(JobCreated {
            job,
            message: "Job created successfully".to_string(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(("id" = i32, Path, description = "Job ID")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated", body = Job),
        (status = 404, description = "Job not found")
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn update_job(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(update): ValidatedJson<UpdateJobRequest>,
) -> Result<Json<Job>, ApiError> {
    let mut job = state
        .jobs
        .find_by_id(id)
        .await?
        .ok_or(ApiError::not_found("Job"))?;

    job.apply(update);

    let saved = state
        .jobs
        .save(&job)
        .await?
        .ok_or(ApiError::not_found("Job"))?;

    tracing::info!("Updated job id={} status={:?}", id, saved.status);
    Ok(Json(saved))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = i32, Path, description = "Job ID")),
    responses((status = 200, description = "Job deleted", body = MessageResponse)),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn delete_job(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.jobs.soft_delete(id).await? {
        tracing::info!("Soft-deleted job id={}", id);
    }

    Ok(Json(MessageResponse::new("Job deleted successfully")))
}
