use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Scored cognitive assessment; `answers` is stored as-is in a JSONB column
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct QuizResult {
    #[schema(example = 1)]
    pub id: i32,
    pub patient_id: i32,
    #[schema(example = 24)]
    pub score: i32,
    #[schema(example = 30)]
    pub max_score: i32,
    #[schema(value_type = Object)]
    pub answers: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_score_bounds", skip_on_field_errors = true))]
pub struct SaveQuizResultRequest {
    /// Required; an absent or zero id is rejected with 400
    #[serde(default)]
    #[validate(range(min = 1, message = "Patient ID is required"))]
    pub patient_id: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Score cannot be negative"))]
    pub score: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Max score cannot be negative"))]
    pub max_score: i32,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub answers: Value,
}

fn validate_score_bounds(request: &SaveQuizResultRequest) -> Result<(), ValidationError> {
    if request.max_score > 0 && request.score > request.max_score {
        let mut error = ValidationError::new("score_bounds");
        error.message = Some("Score cannot exceed max score".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuizResultQuery {
    pub patient_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answers_kept_verbatim() {
        let request: SaveQuizResultRequest = serde_json::from_value(json!({
            "patient_id": 3,
            "score": 7,
            "max_score": 10,
            "answers": {"q1": "b", "q2": ["a", "c"], "q3": null}
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.answers["q2"], json!(["a", "c"]));
        assert!(request.answers["q3"].is_null());
    }

    #[test]
    fn test_score_above_max_is_rejected() {
        let request: SaveQuizResultRequest =
            serde_json::from_value(json!({"patient_id": 3, "score": 11, "max_score": 10}))
                .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_missing_patient_is_rejected() {
        let request: SaveQuizResultRequest =
            serde_json::from_value(json!({"score": 1, "max_score": 10})).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("patient_id"));
    }
}
