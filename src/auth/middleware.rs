// Authorization gate for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{error::AuthError, models::Role, token::{Claims, TokenService}};

const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to a request once its bearer token has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.user_type,
        }
    }
}

/// Run the gate checks against a set of request headers
///
/// Order matters: a missing header, a wrong scheme and a bad token each
/// produce their own error, and nothing past the first failure is evaluated.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, AuthError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    if raw.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let value = raw
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidAuthorizationFormat)?;

    let claims = tokens.validate(token)?;
    Ok(claims.into())
}

/// Route layer that rejects unauthenticated requests before any handler runs
///
/// On success the verified identity is stored in the request extensions,
/// where the `AuthenticatedUser` extractor picks it up.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let user = authenticate(request.headers(), &tokens).map_err(|e| {
        warn!("Rejected request to {}: {}", endpoint, e);
        e
    })?;

    debug!(
        "Authenticated user_id={} role={} endpoint={}",
        user.user_id, user.role, endpoint
    );
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        // Routes outside the gated router verify the header themselves
        let tokens = Arc::<TokenService>::from_ref(state);
        authenticate(&parts.headers, &tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use proptest::prelude::*;
    use serde_json::json;
    use tower::ServiceExt;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(SECRET))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    async fn whoami(user: AuthenticatedUser) -> String {
        format!("{}:{}", user.user_id, user.role)
    }

    fn gated_app() -> Router {
        let tokens = tokens();
        Router::new()
            .route("/api/whoami", get(whoami))
            .route_layer(from_fn_with_state(tokens.clone(), require_auth))
            .with_state(tokens)
    }

    async fn call(app: Router, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = HttpRequest::builder().uri("/api/whoami");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[test]
    fn test_valid_token_is_accepted() {
        let token = tokens().issue(42, "test@example.com", &Role::Doctor).unwrap();
        let user = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens()).unwrap();

        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.role, Role::Doctor);
    }

    #[test]
    fn test_missing_or_empty_header() {
        assert!(matches!(
            authenticate(&HeaderMap::new(), &tokens()),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            authenticate(&headers_with(""), &tokens()),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_invalid_bearer_format() {
        let token = tokens().issue(1, "a@x.com", &Role::Patient).unwrap();
        for value in [
            "InvalidFormat token".to_string(),
            "token_without_bearer".to_string(),
            "Basic dXNlcjpwYXNz".to_string(),
            format!("bearer {}", token),
            format!("Bearer{}", token),
            token.clone(),
        ] {
            assert!(
                matches!(
                    authenticate(&headers_with(&value), &tokens()),
                    Err(AuthError::InvalidAuthorizationFormat)
                ),
                "expected format error for {:?}",
                value
            );
        }
    }

    #[test]
    fn test_bad_tokens_share_one_error() {
        let now = Utc::now().timestamp();
        let expired = encode(
            &Header::default(),
            &json!({
                "user_id": 1,
                "email": "test@example.com",
                "user_type": "patient",
                "iat": now - 1000,
                "exp": now - 500,
            }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let foreign = TokenService::new("another_secret")
            .issue(1, "a@x.com", &Role::Doctor)
            .unwrap();

        for value in [
            "Bearer ".to_string(),
            "Bearer invalid_token".to_string(),
            "Bearer not.a.valid.jwt".to_string(),
            format!("Bearer {}", expired),
            format!("Bearer {}", foreign),
            // double space leaves a leading space on the token
            format!("Bearer  {}", foreign),
        ] {
            assert!(matches!(
                authenticate(&headers_with(&value), &tokens()),
                Err(AuthError::InvalidToken)
            ));
        }
    }

    #[tokio::test]
    async fn test_extractor_prefers_gate_extension() {
        let mut parts = parts_with_auth(None);
        let user = AuthenticatedUser {
            user_id: 9,
            email: "c@x.com".to_string(),
            role: Role::Caregiver,
        };
        parts.extensions.insert(user.clone());

        let extracted = AuthenticatedUser::from_request_parts(&mut parts, &tokens())
            .await
            .unwrap();
        assert_eq!(extracted, user);
    }

    #[tokio::test]
    async fn test_extractor_verifies_header_without_gate() {
        let token = tokens().issue(5, "p@x.com", &Role::Patient).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let user = AuthenticatedUser::from_request_parts(&mut parts, &tokens())
            .await
            .unwrap();
        assert_eq!(user.user_id, 5);

        let mut parts = parts_with_auth(None);
        let result = AuthenticatedUser::from_request_parts(&mut parts, &tokens()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_gate_rejects_before_handler() {
        let (status, body) = call(gated_app(), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authorization header required");

        let (status, body) = call(gated_app(), Some("Token abc")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid authorization format");

        let (status, body) = call(gated_app(), Some("Bearer abc.def.ghi")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_gate_passes_identity_to_handler() {
        let token = tokens().issue(77, "d@x.com", &Role::Doctor).unwrap();
        let app = gated_app();
        let request = HttpRequest::builder()
            .uri("/api/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"77:doctor");
    }

    proptest! {
        #[test]
        fn prop_random_bearer_values_rejected(garbage in "[a-zA-Z0-9._-]{1,80}") {
            let result = authenticate(&headers_with(&format!("Bearer {}", garbage)), &tokens());
            prop_assert!(matches!(result, Err(AuthError::InvalidToken)));
        }

        #[test]
        fn prop_valid_tokens_accepted(
            user_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)",
        ) {
            let token = tokens().issue(user_id, &email, &Role::Caregiver)?;
            let user = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens())?;
            prop_assert_eq!(user.user_id, user_id);
            prop_assert_eq!(user.email, email);
            prop_assert_eq!(user.role, Role::Caregiver);
        }
    }
}
