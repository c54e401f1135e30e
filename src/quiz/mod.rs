// Cognitive quiz results

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{QuizResult, QuizResultQuery, SaveQuizResultRequest};
pub use repository::QuizResultRepository;
