pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{
    CreateJobRequest, Job, JobCreated, JobList, JobQuery, JobStatus, NewJob, UpdateJobRequest,
};
pub use repository::JobRepository;
