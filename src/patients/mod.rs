// Patient records, optionally owned by a caregiver

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{CreatePatientRequest, NewPatient, Patient, PatientList, UpdatePatientRequest};
pub use repository::PatientRepository;
