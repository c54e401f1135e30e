use sqlx::PgPool;

use crate::error::ApiError;
use crate::policy::OwnerFilter;
use crate::quiz::models::{QuizResult, SaveQuizResultRequest};

const QUIZ_COLUMNS: &str = "id, patient_id, score, max_score, answers, created_at, updated_at";

#[derive(Clone)]
pub struct QuizResultRepository {
    pool: PgPool,
}

impl QuizResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first, optionally for one patient
    pub async fn list(&self, patient_id: Option<i32>) -> Result<Vec<QuizResult>, ApiError> {
        let filter = OwnerFilter::explicit("patient_id", patient_id);
        let mut sql = format!(
            "SELECT {} FROM quiz_results WHERE deleted_at IS NULL",
            QUIZ_COLUMNS
        );
        if let Some(filter) = &filter {
            sql.push_str(&filter.sql(1));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query_as::<_, QuizResult>(&sql);
        if let Some(filter) = filter {
            query = query.bind(filter.id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn create(&self, result: &SaveQuizResultRequest) -> Result<QuizResult, ApiError> {
        let sql = format!(
            r#"
            INSERT INTO quiz_results (patient_id, score, max_score, answers)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            QUIZ_COLUMNS
        );

        let created = sqlx::query_as::<_, QuizResult>(&sql)
            .bind(result.patient_id)
            .bind(result.score)
            .bind(result.max_score)
            .bind(&result.answers)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }
}
