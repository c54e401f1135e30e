use sqlx::PgPool;

use crate::error::ApiError;
use crate::patients::models::{NewPatient, Patient};
use crate::policy::PatientScope;

const PATIENT_COLUMNS: &str =
    "id, name, age, gender, phone, address, diagnosis, caregiver_id, created_at, updated_at";

/// Repository for database operations on patients
#[derive(Clone)]
pub struct PatientRepository {
    pool: PgPool,
}

impl PatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Live patients visible under the given scope, newest first
    pub async fn list(&self, scope: PatientScope) -> Result<Vec<Patient>, ApiError> {
        let filter = scope.filter();
        let mut sql = format!(
            "SELECT {} FROM patients WHERE deleted_at IS NULL",
            PATIENT_COLUMNS
        );
        if let Some(filter) = &filter {
            sql.push_str(&filter.sql(1));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query_as::<_, Patient>(&sql);
        if let Some(filter) = filter {
            query = query.bind(filter.id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Patient>, ApiError> {
        let sql = format!(
            "SELECT {} FROM patients WHERE id = $1 AND deleted_at IS NULL",
            PATIENT_COLUMNS
        );

        let patient = sqlx::query_as::<_, Patient>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(patient)
    }

    pub async fn create(&self, patient: &NewPatient) -> Result<Patient, ApiError> {
        let sql = format!(
            r#"
            INSERT INTO patients (name, age, gender, phone, address, diagnosis, caregiver_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PATIENT_COLUMNS
        );

        let created = sqlx::query_as::<_, Patient>(&sql)
            .bind(&patient.name)
            .bind(patient.age)
            .bind(&patient.gender)
            .bind(&patient.phone)
            .bind(&patient.address)
            .bind(&patient.diagnosis)
            .bind(patient.caregiver_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Write every column of an already-fetched row back
    ///
    /// Returns None when the row was soft-deleted in the meantime.
    pub async fn save(&self, patient: &Patient) -> Result<Option<Patient>, ApiError> {
        let sql = format!(
            r#"
            UPDATE patients
            SET name = $1, age = $2, gender = $3, phone = $4, address = $5,
                diagnosis = $6, caregiver_id = $7, updated_at = NOW()
            WHERE id = $8 AND deleted_at IS NULL
            RETURNING {}
            "#,
            PATIENT_COLUMNS
        );

        let saved = sqlx::query_as::<_, Patient>(&sql)
            .bind(&patient.name)
            .bind(patient.age)
            .bind(&patient.gender)
            .bind(&patient.phone)
            .bind(&patient.address)
            .bind(&patient.diagnosis)
            .bind(patient.caregiver_id)
            .bind(patient.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(saved)
    }

    /// Mark a patient deleted; returns whether a live row was hit
    pub async fn soft_delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE patients SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
