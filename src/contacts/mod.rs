// Public contact form and its staff-side inbox

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Contact, ContactQuery, ContactStatus, CreateContactRequest, UpdateContactStatusRequest};
pub use repository::ContactRepository;
