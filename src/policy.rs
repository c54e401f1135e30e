// Role-scoped access policy
// Narrows collection listings by role and stamps ownership fields on create

use crate::appointments::models::{AppointmentStatus, CreateAppointmentRequest, NewAppointment};
use crate::auth::{AuthenticatedUser, Role};
use crate::error::ApiError;
use crate::jobs::models::{CreateJobRequest, JobStatus, NewJob};
use crate::patients::models::{CreatePatientRequest, NewPatient};
use crate::prescriptions::models::{CreatePrescriptionRequest, NewPrescription};

/// Equality filter on an ownership column, bound as a query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerFilter {
    pub column: &'static str,
    pub id: i32,
}

impl OwnerFilter {
    pub fn new(column: &'static str, id: i32) -> Self {
        Self { column, id }
    }

    /// Filter from an optional query parameter; absent means every row
    pub fn explicit(column: &'static str, id: Option<i32>) -> Option<Self> {
        id.map(|id| Self::new(column, id))
    }

    /// SQL fragment appended after `WHERE deleted_at IS NULL`
    pub fn sql(&self, placeholder: usize) -> String {
        format!(" AND {} = ${}", self.column, placeholder)
    }
}

/// Which appointments a caller may list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentScope {
    All,
    Patient(i32),
    Doctor(i32),
}

impl AppointmentScope {
    pub fn for_user(user: &AuthenticatedUser) -> Self {
        match user.role {
            Role::Patient => AppointmentScope::Patient(user.user_id),
            Role::Doctor => AppointmentScope::Doctor(user.user_id),
            Role::Caregiver | Role::Other(_) => AppointmentScope::All,
        }
    }

    pub fn filter(&self) -> Option<OwnerFilter> {
        match *self {
            AppointmentScope::All => None,
            AppointmentScope::Patient(id) => Some(OwnerFilter::new("a.patient_id", id)),
            AppointmentScope::Doctor(id) => Some(OwnerFilter::new("a.doctor_id", id)),
        }
    }
}

/// Which patient records a caller may list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientScope {
    All,
    Caregiver(i32),
}

impl PatientScope {
    pub fn for_user(user: &AuthenticatedUser) -> Self {
        match user.role {
            Role::Caregiver => PatientScope::Caregiver(user.user_id),
            Role::Doctor | Role::Patient | Role::Other(_) => PatientScope::All,
        }
    }

    pub fn filter(&self) -> Option<OwnerFilter> {
        match *self {
            PatientScope::All => None,
            PatientScope::Caregiver(id) => Some(OwnerFilter::new("caregiver_id", id)),
        }
    }
}

/// Only patients book appointments
///
/// Checked before the body is read, so other roles get 403 whatever they send.
pub fn require_patient(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if user.role != Role::Patient {
        return Err(ApiError::Forbidden(
            "Only patients can book appointments".to_string(),
        ));
    }
    Ok(())
}

/// Patients always book for themselves
pub fn stamp_appointment(
    user: &AuthenticatedUser,
    request: CreateAppointmentRequest,
) -> Result<NewAppointment, ApiError> {
    require_patient(user)?;

    if request.patient_id.is_some_and(|id| id != user.user_id) {
        tracing::debug!(
            "Ignoring client patient_id {:?} for user_id={}",
            request.patient_id,
            user.user_id
        );
    }

    Ok(NewAppointment {
        patient_id: user.user_id,
        doctor_id: request.doctor_id,
        date: request.date,
        time: request.time,
        appointment_type: request.appointment_type,
        status: AppointmentStatus::Pending,
        notes: request.notes,
    })
}

/// Caregivers own the patients they create; other roles keep the body value
pub fn stamp_patient(user: &AuthenticatedUser, request: CreatePatientRequest) -> NewPatient {
    let caregiver_id = match user.role {
        Role::Caregiver => Some(user.user_id),
        _ => request.caregiver_id,
    };

    NewPatient {
        name: request.name,
        age: request.age,
        gender: request.gender,
        phone: request.phone,
        address: request.address,
        diagnosis: request.diagnosis,
        caregiver_id,
    }
}

/// The prescribing doctor is always the caller
pub fn stamp_prescription(
    user: &AuthenticatedUser,
    request: CreatePrescriptionRequest,
) -> NewPrescription {
    NewPrescription {
        patient_id: request.patient_id,
        doctor_id: user.user_id,
        medication: request.medication,
        dosage: request.dosage,
        frequency: request.frequency,
        duration: request.duration,
        instructions: request.instructions,
    }
}

/// Jobs are posted by the caller and open as active
pub fn stamp_job(user: &AuthenticatedUser, request: CreateJobRequest) -> NewJob {
    NewJob {
        title: request.title,
        company: request.company,
        location: request.location,
        job_type: request.job_type,
        description: request.description,
        requirements: request.requirements,
        salary: request.salary,
        posted_by: user.user_id,
        status: JobStatus::Active,
    }
}
