pub mod appointments;
pub mod auth;
pub mod config;
pub mod contacts;
pub mod db;
pub mod doctors;
pub mod error;
pub mod jobs;
pub mod models;
pub mod patients;
pub mod policy;
pub mod prescriptions;
pub mod quiz;
pub mod recommend;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use appointments::AppointmentRepository;
use auth::{AuthService, TokenService, UserRepository};
use config::Config;
use contacts::ContactRepository;
use jobs::JobRepository;
use models::HealthResponse;
use patients::PatientRepository;
use prescriptions::PrescriptionRepository;
use quiz::QuizResultRepository;
use recommend::RecommendationClient;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::change_password_handler,
        patients::handlers::list_patients,
        patients::handlers::get_patient,
        patients::handlers::create_patient,
        patients::handlers::update_patient,
        patients::handlers::delete_patient,
        appointments::handlers::list_appointments,
        appointments::handlers::get_appointment,
        appointments::handlers::create_appointment,
        appointments::handlers::update_appointment,
        appointments::handlers::delete_appointment,
        prescriptions::handlers::list_prescriptions,
        prescriptions::handlers::get_prescription,
        prescriptions::handlers::create_prescription,
        prescriptions::handlers::update_prescription,
        prescriptions::handlers::delete_prescription,
        quiz::handlers::list_quiz_results,
        quiz::handlers::save_quiz_result,
        jobs::handlers::list_jobs,
        jobs::handlers::get_job,
        jobs::handlers::create_job,
        jobs::handlers::update_job,
        jobs::handlers::delete_job,
        contacts::handlers::submit_contact,
        contacts::handlers::list_contacts,
        contacts::handlers::update_contact_status,
        doctors::list_doctors,
        recommend::recommend_doctor,
    ),
    components(schemas(
        models::MessageResponse,
        models::HealthResponse,
        auth::UserResponse,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::ChangePasswordRequest,
        auth::AuthResponse,
        patients::Patient,
        patients::CreatePatientRequest,
        patients::UpdatePatientRequest,
        patients::PatientList,
        appointments::Appointment,
        appointments::AppointmentStatus,
        appointments::AppointmentWithNames,
        appointments::CreateAppointmentRequest,
        appointments::UpdateAppointmentRequest,
        appointments::AppointmentList,
        prescriptions::Prescription,
        prescriptions::CreatePrescriptionRequest,
        prescriptions::UpdatePrescriptionRequest,
        quiz::QuizResult,
        quiz::SaveQuizResultRequest,
        jobs::Job,
        jobs::JobStatus,
        jobs::CreateJobRequest,
        jobs::UpdateJobRequest,
        jobs::JobList,
        jobs::JobCreated,
        contacts::Contact,
        contacts::ContactStatus,
        contacts::CreateContactRequest,
        contacts::UpdateContactStatusRequest,
        doctors::DoctorList,
        recommend::RecommendRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and password changes"),
        (name = "patients", description = "Patient records"),
        (name = "appointments", description = "Patient and doctor appointments"),
        (name = "prescriptions", description = "Prescriptions"),
        (name = "quiz", description = "Cognitive quiz results"),
        (name = "jobs", description = "Care job board"),
        (name = "contacts", description = "Contact form messages"),
        (name = "doctors", description = "Doctor directory"),
        (name = "recommendations", description = "Doctor recommendation proxy"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "DementiCare API",
        version = "1.0.0",
        description = "Care coordination backend for dementia patients, caregivers and doctors"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub users: UserRepository,
    pub patients: PatientRepository,
    pub appointments: AppointmentRepository,
    pub prescriptions: PrescriptionRepository,
    pub quiz_results: QuizResultRepository,
    pub jobs: JobRepository,
    pub contacts: ContactRepository,
    pub recommender: Arc<RecommendationClient>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret));
        let users = UserRepository::new(pool.clone());

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), tokens.clone())),
            tokens,
            users,
            patients: PatientRepository::new(pool.clone()),
            appointments: AppointmentRepository::new(pool.clone()),
            prescriptions: PrescriptionRepository::new(pool.clone()),
            quiz_results: QuizResultRepository::new(pool.clone()),
            jobs: JobRepository::new(pool.clone()),
            contacts: ContactRepository::new(pool),
            recommender: Arc::new(RecommendationClient::new(config.ml_service_url.clone())),
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Liveness probe; does not touch the database
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Creates and configures the application router
///
/// Every `/api/*` route sits behind the bearer-token gate. `/auth/*`,
/// `/health`, `/contact` and the Swagger UI are public, except
/// `/auth/change-password` which authenticates through its extractor.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route(
            "/patients",
            get(patients::handlers::list_patients).post(patients::handlers::create_patient),
        )
        .route(
            "/patients/:id",
            get(patients::handlers::get_patient)
                .put(patients::handlers::update_patient)
                .delete(patients::handlers::delete_patient),
        )
        .route(
            "/appointments",
            get(appointments::handlers::list_appointments)
                .post(appointments::handlers::create_appointment),
        )
        .route(
            "/appointments/:id",
            get(appointments::handlers::get_appointment)
                .put(appointments::handlers::update_appointment)
                .delete(appointments::handlers::delete_appointment),
        )
        .route(
            "/prescriptions",
            get(prescriptions::handlers::list_prescriptions)
                .post(prescriptions::handlers::create_prescription),
        )
        .route(
            "/prescriptions/:id",
            get(prescriptions::handlers::get_prescription)
                .put(prescriptions::handlers::update_prescription)
                .delete(prescriptions::handlers::delete_prescription),
        )
        .route(
            "/quiz/results",
            get(quiz::handlers::list_quiz_results).post(quiz::handlers::save_quiz_result),
        )
        .route(
            "/jobs",
            get(jobs::handlers::list_jobs).post(jobs::handlers::create_job),
        )
        .route(
            "/jobs/:id",
            get(jobs::handlers::get_job)
                .put(jobs::handlers::update_job)
                .delete(jobs::handlers::delete_job),
        )
        .route("/contacts", get(contacts::handlers::list_contacts))
        .route("/contacts/:id", put(contacts::handlers::update_contact_status))
        .route("/doctors", get(doctors::list_doctors))
        .route("/recommend-doctor", post(recommend::recommend_doctor))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth::require_auth,
        ));

    let auth_routes = Router::new()
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/user/login", post(auth::login_handler))
        .route("/change-password", post(auth::change_password_handler));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .route("/contact", post(contacts::handlers::submit_contact))
        .nest("/auth", auth_routes)
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
