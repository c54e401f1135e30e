use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::validation::validate_not_blank;

/// Medication prescribed by a doctor for a patient
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Prescription {
    #[schema(example = 1)]
    pub id: i32,
    pub patient_id: i32,
    pub doctor_id: i32,
    #[schema(example = "Donepezil")]
    pub medication: String,
    #[schema(example = "5mg")]
    pub dosage: String,
    #[schema(example = "once daily")]
    pub frequency: String,
    pub duration: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePrescriptionRequest {
    #[serde(default)]
    #[validate(range(min = 1, message = "Patient ID is required"))]
    pub patient_id: i32,
    /// Ignored; the prescribing doctor is always the caller
    pub doctor_id: Option<i32>,
    #[validate(custom(function = "validate_not_blank", message = "Medication is required"))]
    pub medication: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePrescriptionRequest {
    pub patient_id: Option<i32>,
    pub doctor_id: Option<i32>,
    pub medication: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub patient_id: i32,
    pub doctor_id: i32,
    pub medication: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: String,
}

/// `?patient_id=` narrows the listing to one patient
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PrescriptionQuery {
    pub patient_id: Option<i32>,
}

impl Prescription {
    pub fn apply(&mut self, update: UpdatePrescriptionRequest) {
        if let Some(patient_id) = update.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(doctor_id) = update.doctor_id {
            self.doctor_id = doctor_id;
        }
        if let Some(medication) = update.medication {
            self.medication = medication;
        }
        if let Some(dosage) = update.dosage {
            self.dosage = dosage;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
        if let Some(instructions) = update.instructions {
            self.instructions = instructions;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_medication_is_rejected() {
        let request: CreatePrescriptionRequest =
            serde_json::from_str(r#"{"patient_id": 4, "medication": "  "}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("medication"));
    }

    #[test]
    fn test_missing_patient_fails_validation() {
        let request: CreatePrescriptionRequest =
            serde_json::from_str(r#"{"medication": "Memantine"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("patient_id"));
    }

    #[test]
    fn test_update_reassigns_doctor() {
        let now = Utc::now();
        let mut prescription = Prescription {
            id: 1,
            patient_id: 4,
            doctor_id: 2,
            medication: "Memantine".into(),
            dosage: "10mg".into(),
            frequency: "twice daily".into(),
            duration: "30 days".into(),
            instructions: String::new(),
            created_at: now,
            updated_at: now,
        };

        let update: UpdatePrescriptionRequest =
            serde_json::from_str(r#"{"doctor_id": 77, "dosage": "20mg"}"#).unwrap();
        prescription.apply(update);

        assert_eq!(prescription.doctor_id, 77);
        assert_eq!(prescription.dosage, "20mg");
        assert_eq!(prescription.frequency, "twice daily");
    }
}
