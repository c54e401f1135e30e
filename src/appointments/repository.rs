use sqlx::PgPool;

use crate::appointments::models::{Appointment, AppointmentWithNames, NewAppointment};
use crate::error::ApiError;
use crate::policy::AppointmentScope;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, date, time, appointment_type, \
     status, notes, created_at, updated_at";

/// Repository for database operations on appointments
#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Live appointments visible under the given scope, newest first,
    /// joined with patient and doctor names
    pub async fn list(&self, scope: AppointmentScope) -> Result<Vec<AppointmentWithNames>, ApiError> {
        let filter = scope.filter();
        let mut sql = String::from(
            r#"
            SELECT a.id, a.patient_id, patients.name AS patient_name,
                   a.doctor_id, doctors.name AS doctor_name,
                   a.date, a.time, a.appointment_type, a.status, a.notes, a.created_at
            FROM appointments a
            LEFT JOIN users doctors ON a.doctor_id = doctors.id
            LEFT JOIN users patients ON a.patient_id = patients.id
            WHERE a.deleted_at IS NULL"#,
        );
        if let Some(filter) = &filter {
            sql.push_str(&filter.sql(1));
        }
        sql.push_str(" ORDER BY a.created_at DESC, a.id DESC");

        let mut query = sqlx::query_as::<_, AppointmentWithNames>(&sql);
        if let Some(filter) = filter {
            query = query.bind(filter.id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Appointment>, ApiError> {
        let sql = format!(
            "SELECT {} FROM appointments WHERE id = $1 AND deleted_at IS NULL",
            APPOINTMENT_COLUMNS
        );

        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(appointment)
    }

    pub async fn create(&self, appointment: &NewAppointment) -> Result<Appointment, ApiError> {
        let sql = format!(
            r#"
            INSERT INTO appointments (patient_id, doctor_id, date, time, appointment_type, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            APPOINTMENT_COLUMNS
        );

        let created = sqlx::query_as::<_, Appointment>(&sql)
            .bind(appointment.patient_id)
            .bind(appointment.doctor_id)
            .bind(appointment.date)
            .bind(&appointment.time)
            .bind(&appointment.appointment_type)
            .bind(appointment.status)
            .bind(&appointment.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Write every column of an already-fetched row back
    pub async fn save(&self, appointment: &Appointment) -> Result<Option<Appointment>, ApiError> {
        let sql = format!(
            r#"
            UPDATE appointments
            SET patient_id = $1, doctor_id = $2, date = $3, time = $4,
                appointment_type = $5, status = $6, notes = $7, updated_at = NOW()
            WHERE id = $8 AND deleted_at IS NULL
            RETURNING {}
            "#,
            APPOINTMENT_COLUMNS
        );

        let saved = sqlx::query_as::<_, Appointment>(&sql)
            .bind(appointment.patient_id)
            .bind(appointment.doctor_id)
            .bind(appointment.date)
            .bind(&appointment.time)
            .bind(&appointment.appointment_type)
            .bind(appointment.status)
            .bind(&appointment.notes)
            .bind(appointment.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(saved)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE appointments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
