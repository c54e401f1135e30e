use sqlx::PgPool;

use crate::error::ApiError;
use crate::jobs::models::{Job, JobStatus, NewJob};

const JOB_COLUMNS: &str = "id, title, company, location, job_type, description, requirements, \
     salary, posted_by, status, created_at, updated_at";

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: JobStatus) -> Result<Vec<Job>, ApiError> {
        let sql = format!(
            r#"
            SELECT {} FROM jobs
            WHERE deleted_at IS NULL AND status = $1
            ORDER BY created_at DESC, id DESC
            "#,
            JOB_COLUMNS
        );

        let jobs = sqlx::query_as::<_, Job>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(jobs)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Job>, ApiError> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE id = $1 AND deleted_at IS NULL",
            JOB_COLUMNS
        );

        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    pub async fn create(&self, job: &NewJob) -> Result<Job, ApiError> {
        let sql = format!(
            r#"
            INSERT INTO jobs
                (title, company, location, job_type, description, requirements, salary, posted_by, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let created = sqlx::query_as::<_, Job>(&sql)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.job_type)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.salary)
            .bind(job.posted_by)
            .bind(job.status)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn save(&self, job: &Job) -> Result<Option<Job>, ApiError> {
        let sql = format!(
            r#"
            UPDATE jobs
            SET title = $1, company = $2, location = $3, job_type = $4, description = $5,
                requirements = $6, salary = $7, posted_by = $8, status = $9, updated_at = NOW()
            WHERE id = $10 AND deleted_at IS NULL
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let saved = sqlx::query_as::<_, Job>(&sql)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.job_type)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.salary)
            .bind(job.posted_by)
            .bind(job.status)
            .bind(job.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(saved)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, ApiError> {
        let result =
            sqlx::query("UPDATE jobs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
