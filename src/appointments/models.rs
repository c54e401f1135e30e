use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Appointment between a patient identity and a doctor identity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    #[schema(example = 1)]
    pub id: i32,
    pub patient_id: i32,
    pub doctor_id: i32,
    pub date: DateTime<Utc>,
    #[schema(example = "10:30")]
    pub time: String,
    /// consultation, follow-up, emergency
    #[serde(rename = "type")]
    #[schema(example = "consultation")]
    pub appointment_type: String,
    pub status: AppointmentStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row joined with both parties' display names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AppointmentWithNames {
    pub id: i32,
    pub patient_id: i32,
    pub patient_name: Option<String>,
    pub doctor_id: i32,
    pub doctor_name: Option<String>,
    pub date: DateTime<Utc>,
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub status: AppointmentStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentRequest {
    /// Ignored; the booking patient is always the caller
    pub patient_id: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, message = "Doctor ID is required"))]
    pub doctor_id: i32,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub time: String,
    #[serde(default, rename = "type")]
    pub appointment_type: String,
    #[serde(default)]
    pub notes: String,
}

/// Partial body for PUT; every supplied field overwrites the stored one,
/// including both party ids
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub patient_id: Option<i32>,
    pub doctor_id: Option<i32>,
    pub date: Option<DateTime<Utc>>,
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub appointment_type: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

/// Row values for an insert, after ownership stamping
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: i32,
    pub doctor_id: i32,
    pub date: DateTime<Utc>,
    pub time: String,
    pub appointment_type: String,
    pub status: AppointmentStatus,
    pub notes: String,
}

impl Appointment {
    pub fn apply(&mut self, update: UpdateAppointmentRequest) {
        if let Some(patient_id) = update.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(doctor_id) = update.doctor_id {
            self.doctor_id = doctor_id;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(appointment_type) = update.appointment_type {
            self.appointment_type = appointment_type;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentList {
    pub appointments: Vec<AppointmentWithNames>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment() -> Appointment {
        let now = Utc::now();
        Appointment {
            id: 1,
            patient_id: 10,
            doctor_id: 20,
            date: now,
            time: "09:00".into(),
            appointment_type: "consultation".into(),
            status: AppointmentStatus::Pending,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_update_overwrites_foreign_keys() {
        // Create stamps patient_id from the caller; update trusts the body
        let mut record = appointment();
        let update: UpdateAppointmentRequest =
            serde_json::from_str(r#"{"patient_id": 999, "doctor_id": 888}"#).unwrap();
        record.apply(update);

        assert_eq!(record.patient_id, 999);
        assert_eq!(record.doctor_id, 888);
        assert_eq!(record.time, "09:00");
    }

    #[test]
    fn test_update_toggles_status() {
        let mut record = appointment();
        let update: UpdateAppointmentRequest =
            serde_json::from_str(r#"{"status": "confirmed", "type": "follow-up"}"#).unwrap();
        record.apply(update);

        assert_eq!(record.status, AppointmentStatus::Confirmed);
        assert_eq!(record.appointment_type, "follow-up");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<UpdateAppointmentRequest, _> =
            serde_json::from_str(r#"{"status": "rescheduled"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_doctor_fails_validation() {
        let request: CreateAppointmentRequest =
            serde_json::from_str(r#"{"date": "2026-11-02T10:00:00Z"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("doctor_id"));
    }

    #[test]
    fn test_create_ignores_client_status() {
        let request: CreateAppointmentRequest = serde_json::from_str(
            r#"{"doctor_id": 3, "date": "2026-11-02T10:00:00Z", "status": "completed"}"#,
        )
        .unwrap();
        assert_eq!(request.doctor_id, 3);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_appointment_serializes_type_field() {
        let value = serde_json::to_value(appointment()).unwrap();
        assert_eq!(value["type"], "consultation");
        assert_eq!(value["status"], "pending");
    }
}
