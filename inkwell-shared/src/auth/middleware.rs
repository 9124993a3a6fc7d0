/// Request authentication
///
/// Turns the `Authorization: Bearer <token>` header into an [`AuthContext`].
/// The API's middleware layers call [`authenticate_request`] and insert the
/// resulting context into request extensions; handlers then receive it
/// explicitly through `Extension<AuthContext>`.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use inkwell_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("user {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{jwt::JwtError, token::verify_access_token};

/// Identity of the caller for the lifetime of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user
    pub user_id: i64,

    /// Token the request was authenticated with, used by logout
    pub token_id: Uuid,
}

impl AuthContext {
    pub fn new(user_id: i64, token_id: Uuid) -> Self {
        Self { user_id, token_id }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not a bearer token
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Signature, issuer or expiry check failed
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token was revoked, has expired in the store, or was never issued
    #[error("Token has been revoked")]
    Revoked,

    /// Token store lookup failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Extracts the raw token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("header is not valid ASCII".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or_else(|| AuthError::InvalidFormat("expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("empty bearer token".to_string()));
    }

    Ok(token)
}

/// Authenticates a request from its headers
pub async fn authenticate_request(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    verify_access_token(pool, secret, token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer   ")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_auth_context_new() {
        let token_id = Uuid::new_v4();
        let context = AuthContext::new(5, token_id);

        assert_eq!(context.user_id, 5);
        assert_eq!(context.token_id, token_id);
    }
}
