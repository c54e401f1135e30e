// Doctor recommendation proxy
// Forwards rating/experience to the external scoring service and relays its answer

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::validation::ValidatedJson;
use crate::AppState;

/// Inputs forwarded to the scoring service; both fields are required
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecommendRequest {
    /// Desired doctor rating; required, a missing value is rejected with 400
    #[schema(example = 4)]
    pub rating: i32,
    /// Years of practice; required, a missing value is rejected with 400
    #[schema(example = 10)]
    pub experience: i32,
}

/// HTTP client for the recommendation service
///
/// Built once at startup and shared through `AppState`. No retries and no
/// timeout beyond the transport defaults.
#[derive(Debug, Clone)]
pub struct RecommendationClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecommendationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/recommend", self.base_url)
    }

    /// POST the request and return the service's JSON object unchanged
    pub async fn recommend(&self, request: &RecommendRequest) -> Result<Map<String, Value>, ApiError> {
        let url = self.endpoint();
        tracing::debug!("Calling recommendation service at {}", url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %url, "Recommendation service request failed");
                ApiError::ServiceUnavailable("ML service unavailable".to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read recommendation response");
            ApiError::InternalError("Failed to read ML response".to_string())
        })?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) => {
                tracing::debug!("Recommendation service answered {} with {} keys", status, map.len());
                Ok(map)
            }
            Ok(other) => {
                tracing::error!("Recommendation service returned non-object JSON: {}", other);
                Err(ApiError::InternalError(
                    "Failed to parse ML response".to_string(),
                ))
            }
            Err(e) => {
                tracing::error!(error = %e, status = %status, "Recommendation response is not JSON");
                Err(ApiError::InternalError(
                    "Failed to parse ML response".to_string(),
                ))
            }
        }
    }
}

/// Ask the recommendation service to score a doctor profile
#[utoipa::path(
    post,
    path = "/api/recommend-doctor",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommendation service response, relayed verbatim"),
        (status = 400, description = "rating or experience missing or not an integer"),
        (status = 503, description = "ML service unavailable")
    ),
    security(("bearer" = [])),
    tag = "recommendations"
)]
pub async fn recommend_doctor(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<RecommendRequest>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    tracing::info!(
        "Recommendation requested by user_id={} rating={} experience={}",
        user.user_id,
        request.rating,
        request.experience
    );

    let answer = state.recommender.recommend(&request).await?;
    Ok(Json(answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> RecommendRequest {
        RecommendRequest {
            rating: 4,
            experience: 12,
        }
    }

    #[test]
    fn test_endpoint_appends_recommend() {
        let client = RecommendationClient::new("http://ml.internal:5001");
        assert_eq!(client.endpoint(), "http://ml.internal:5001/recommend");
    }

    #[test]
    fn test_fields_are_required() {
        assert!(serde_json::from_str::<RecommendRequest>(r#"{"rating": 4}"#).is_err());
    }

    #[tokio::test]
    async fn test_relays_object_verbatim() {
        let upstream = Router::new().route(
            "/recommend",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "recommended": true,
                    "echo": body,
                    "score": 0.87
                }))
            }),
        );
        let client = RecommendationClient::new(serve(upstream).await);

        let answer = client.recommend(&request()).await.unwrap();
        assert_eq!(answer["recommended"], json!(true));
        assert_eq!(answer["echo"], json!({"rating": 4, "experience": 12}));
        assert_eq!(answer["score"], json!(0.87));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let client = RecommendationClient::new("http://127.0.0.1:1");
        match client.recommend(&request()).await {
            Err(ApiError::ServiceUnavailable(message)) => {
                assert_eq!(message, "ML service unavailable")
            }
            other => panic!("expected ServiceUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_internal_error() {
        let upstream = Router::new().route("/recommend", post(|| async { "<html>oops</html>" }));
        let client = RecommendationClient::new(serve(upstream).await);

        assert!(matches!(
            client.recommend(&request()).await,
            Err(ApiError::InternalError(_))
        ));
    }

    #[tokio::test]
    async fn test_json_array_is_internal_error() {
        let upstream = Router::new().route("/recommend", post(|| async { Json(json!([1, 2])) }));
        let client = RecommendationClient::new(serve(upstream).await);

        assert!(matches!(
            client.recommend(&request()).await,
            Err(ApiError::InternalError(_))
        ));
    }
}
