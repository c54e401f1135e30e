use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::validation::validate_not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
}

/// Care job posting
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Job {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Night caregiver")]
    pub title: String,
    pub company: String,
    pub location: String,
    /// full-time, part-time, contract
    #[serde(rename = "type")]
    #[schema(example = "part-time")]
    pub job_type: String,
    pub description: String,
    pub requirements: String,
    pub salary: String,
    pub posted_by: i32,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateJobRequest {
    #[validate(custom(function = "validate_not_blank", message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, rename = "type")]
    pub job_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub salary: String,
}

/// Partial body for PUT; `posted_by` and `status` are overwritable like any other field
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub salary: Option<String>,
    pub posted_by: Option<i32>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub description: String,
    pub requirements: String,
    pub salary: String,
    pub posted_by: i32,
    pub status: JobStatus,
}

/// Listing defaults to active postings
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobQuery {
    pub status: Option<JobStatus>,
}

impl Job {
    pub fn apply(&mut self, update: UpdateJobRequest) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(company) = update.company {
            self.company = company;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(job_type) = update.job_type {
            self.job_type = job_type;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(requirements) = update.requirements {
            self.requirements = requirements;
        }
        if let Some(salary) = update.salary {
            self.salary = salary;
        }
        if let Some(posted_by) = update.posted_by {
            self.posted_by = posted_by;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobList {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobCreated {
    pub job: Job,
    pub message: String,
}
