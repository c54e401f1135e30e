// JWT token generation and validation service

use crate::auth::{error::AuthError, models::Role};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Access tokens live for 7 days
pub const ACCESS_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims structure
///
/// Every field is required; a token missing one, or carrying one of the
/// wrong type, fails to decode and is rejected as invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub email: String,
    pub user_type: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Token service for JWT operations
///
/// Built once at startup from the configured secret and shared read-only.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: ACCESS_TOKEN_TTL_SECS,
        }
    }

    /// Sign an access token for a verified identity
    pub fn issue(&self, user_id: i32, email: &str, role: &Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            user_type: role.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Verify signature, algorithm and expiry, then decode the claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {:?}", e.kind());
                AuthError::InvalidToken
            })
    }
}
