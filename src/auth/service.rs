// Authentication service - business logic layer

use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, User},
    password::PasswordService,
    repository::{NewUser, UserRepository},
    token::TokenService,
};

/// Authentication service coordinating registration, login and password changes
pub struct AuthService {
    user_repo: UserRepository,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Register a new user and sign them in
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let password_hash = PasswordService::hash_password(&request.password)?;

        let user = self
            .user_repo
            .create_user(NewUser {
                email: &request.email,
                password_hash: &password_hash,
                user_type: request.user_type.trim(),
                name: &request.name,
                phone: &request.phone,
            })
            .await?;

        tracing::info!("Registered user id={} type={}", user.id, user.user_type);
        self.respond(user, "Registration successful")
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = match self.user_repo.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            tracing::debug!("Login failed: password mismatch for user id={}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!("User id={} logged in", user.id);
        self.respond(user, "Login successful")
    }

    /// Replace a user's password after checking the current one
    ///
    /// Tokens issued before the change stay valid until they expire.
    pub async fn change_password(
        &self,
        user_id: i32,
        request: ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !PasswordService::verify_password(&request.old_password, &user.password_hash)? {
            return Err(AuthError::InvalidOldPassword);
        }

        let password_hash = PasswordService::hash_password(&request.new_password)?;
        self.user_repo.update_password(user.id, &password_hash).await?;

        tracing::info!("Password changed for user id={}", user.id);
        Ok(())
    }

    fn respond(&self, user: User, message: &str) -> Result<AuthResponse, AuthError> {
        let token = self.token_service.issue(user.id, &user.email, &user.role())?;
        Ok(AuthResponse {
            token,
            user: user.into(),
            message: message.to_string(),
        })
    }
}
