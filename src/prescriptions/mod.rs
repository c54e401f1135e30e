pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{
    CreatePrescriptionRequest, NewPrescription, Prescription, PrescriptionQuery,
    UpdatePrescriptionRequest,
};
pub use repository::PrescriptionRepository;
