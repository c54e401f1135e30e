use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::quiz::models::{QuizResult, QuizResultQuery, SaveQuizResultRequest};
use crate::validation::{ApiQuery, ValidatedJson};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/quiz/results",
    params(QuizResultQuery),
    responses((status = 200, description = "Quiz results, newest first", body = [QuizResult])),
    security(("bearer" = [])),
    tag = "quiz"
)]
pub async fn list_quiz_results(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<QuizResultQuery>,
) -> Result<Json<Vec<QuizResult>>, ApiError> {
    let results = state.quiz_results.list(query.patient_id).await?;
    Ok(Json(results))
}

#[utoipa::path(
    post,
    path = "/api/quiz/results",
    request_body = SaveQuizResultRequest,
    responses(
        (status = 201, description = "Quiz result saved", body = QuizResult),
        (status = 400, description = "Invalid request")
    ),
    security(("bearer" = [])),
    tag = "quiz"
)]
pub async fn save_quiz_result(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<SaveQuizResultRequest>,
) -> Result<(StatusCode, Json<QuizResult>), ApiError> {
    let result = state.quiz_results.create(&request).await?;

    tracing::info!(
        "Quiz result saved - id={} patient={} score={}/{} by user_id={}",
        result.id,
        result.patient_id,
        result.score,
        result.max_score,
        user.user_id
    );
    Ok((StatusCode::CREATED, Json(result)))
}
