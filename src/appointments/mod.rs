// Appointments between patients and doctors

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{
    Appointment, AppointmentList, AppointmentStatus, AppointmentWithNames,
    CreateAppointmentRequest, NewAppointment, UpdateAppointmentRequest,
};
pub use repository::AppointmentRepository;
