use sqlx::PgPool;

use crate::error::ApiError;
use crate::policy::OwnerFilter;
use crate::prescriptions::models::{NewPrescription, Prescription};

const PRESCRIPTION_COLUMNS: &str = "id, patient_id, doctor_id, medication, dosage, frequency, \
     duration, instructions, created_at, updated_at";

#[derive(Clone)]
pub struct PrescriptionRepository {
    pool: PgPool,
}

impl PrescriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, patient_id: Option<i32>) -> Result<Vec<Prescription>, ApiError> {
        let filter = OwnerFilter::explicit("patient_id", patient_id);
        let mut sql = format!(
            "SELECT {} FROM prescriptions WHERE deleted_at IS NULL",
            PRESCRIPTION_COLUMNS
        );
        if let Some(filter) = &filter {
            sql.push_str(&filter.sql(1));
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, Prescription>(&sql);
        if let Some(filter) = filter {
            query = query.bind(filter.id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Prescription>, ApiError> {
        let sql = format!(
            "SELECT {} FROM prescriptions WHERE id = $1 AND deleted_at IS NULL",
            PRESCRIPTION_COLUMNS
        );

        let prescription = sqlx::query_as::<_, Prescription>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(prescription)
    }

    pub async fn create(&self, prescription: &NewPrescription) -> Result<Prescription, ApiError> {
        let sql = format!(
            r#"
            INSERT INTO prescriptions
                (patient_id, doctor_id, medication, dosage, frequency, duration, instructions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PRESCRIPTION_COLUMNS
        );

        let created = sqlx::query_as::<_, Prescription>(&sql)
            .bind(prescription.patient_id)
            .bind(prescription.doctor_id)
            .bind(&prescription.medication)
            .bind(&prescription.dosage)
            .bind(&prescription.frequency)
            .bind(&prescription.duration)
            .bind(&prescription.instructions)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn save(&self, prescription: &Prescription) -> Result<Option<Prescription>, ApiError> {
        let sql = format!(
            r#"
            UPDATE prescriptions
            SET patient_id = $1, doctor_id = $2, medication = $3, dosage = $4,
                frequency = $5, duration = $6, instructions = $7, updated_at = NOW()
            WHERE id = $8 AND deleted_at IS NULL
            RETURNING {}
            "#,
            PRESCRIPTION_COLUMNS
        );

        let saved = sqlx::query_as::<_, Prescription>(&sql)
            .bind(prescription.patient_id)
            .bind(prescription.doctor_id)
            .bind(&prescription.medication)
            .bind(&prescription.dosage)
            .bind(&prescription.frequency)
            .bind(&prescription.duration)
            .bind(&prescription.instructions)
            .bind(prescription.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(saved)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE prescriptions SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
