use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_not_blank;

/// Patient record, optionally owned by a caregiver
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Patient {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ruth Miller")]
    pub name: String,
    #[schema(example = 81)]
    pub age: i32,
    pub gender: String,
    pub phone: String,
    pub address: String,
    #[schema(example = "Early-stage Alzheimer's")]
    pub diagnosis: String,
    pub caregiver_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePatientRequest {
    #[validate(custom(function = "validate_not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i32,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub diagnosis: String,
    /// Replaced by the caller's id when the caller is a caregiver
    pub caregiver_id: Option<i32>,
}

/// Partial body for PUT; every supplied field overwrites the stored one
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub diagnosis: Option<String>,
    pub caregiver_id: Option<i32>,
}

/// Row values for an insert, after ownership stamping
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub diagnosis: String,
    pub caregiver_id: Option<i32>,
}

impl Patient {
    pub fn apply(&mut self, update: UpdatePatientRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(diagnosis) = update.diagnosis {
            self.diagnosis = diagnosis;
        }
        if let Some(caregiver_id) = update.caregiver_id {
            self.caregiver_id = Some(caregiver_id);
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientList {
    pub patients: Vec<Patient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        let now = Utc::now();
        Patient {
            id: 1,
            name: "Ruth".into(),
            age: 81,
            gender: "female".into(),
            phone: "555-0100".into(),
            address: "12 Elm St".into(),
            diagnosis: "MCI".into(),
            caregiver_id: Some(3),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_overwrites_only_supplied_fields() {
        let mut record = patient();
        record.apply(UpdatePatientRequest {
            diagnosis: Some("Moderate dementia".into()),
            ..Default::default()
        });

        assert_eq!(record.diagnosis, "Moderate dementia");
        assert_eq!(record.name, "Ruth");
        assert_eq!(record.caregiver_id, Some(3));
    }

    #[test]
    fn test_apply_reassigns_caregiver() {
        // Unlike create, update has no ownership stamping
        let mut record = patient();
        record.apply(UpdatePatientRequest {
            caregiver_id: Some(99),
            ..Default::default()
        });
        assert_eq!(record.caregiver_id, Some(99));
    }

    #[test]
    fn test_create_request_requires_name() {
        let request: CreatePatientRequest = serde_json::from_str(r#"{"name": " "}"#).unwrap();
        assert!(request.validate().is_err());

        let request: CreatePatientRequest =
            serde_json::from_str(r#"{"name": "Ruth", "age": 81}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.caregiver_id, None);
    }
}
