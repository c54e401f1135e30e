// Credential store backed by the users table

use crate::auth::{error::AuthError, models::User};
use sqlx::PgPool;

const USER_COLUMNS: &str =
    "id, email, password_hash, user_type, name, phone, created_at, updated_at";

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

/// Fields for a new user row
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub user_type: &'a str,
    pub name: &'a str,
    pub phone: &'a str,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create_user(&self, user: NewUser<'_>) -> Result<User, AuthError> {
        let query = format!(
            "INSERT INTO users (email, password_hash, user_type, name, phone) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(user.email)
            .bind(user.password_hash)
            .bind(user.user_type)
            .bind(user.name)
            .bind(user.phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AuthError::EmailAlreadyExists;
                    }
                }
                AuthError::DatabaseError(e)
            })
    }

    /// Find a live user by exact email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let query = format!(
            "SELECT {} FROM users WHERE email = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find a live user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let query = format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), AuthError> {
        sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = NOW() \
             WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All live users of one user type, oldest first
    pub async fn list_by_user_type(&self, user_type: &str) -> Result<Vec<User>, AuthError> {
        let query = format!(
            "SELECT {} FROM users WHERE user_type = $1 AND deleted_at IS NULL ORDER BY id",
            USER_COLUMNS
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(user_type)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
