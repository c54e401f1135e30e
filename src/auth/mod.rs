// Authentication module
// Token issuance, the bearer-token gate, and the credential store

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use handlers::{change_password_handler, login_handler, register_handler};
pub use middleware::{authenticate, require_auth, AuthenticatedUser};
pub use models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, Role, User, UserResponse,
};
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::{Claims, TokenService};
