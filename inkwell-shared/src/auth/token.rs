/// Access token lifecycle: issue, verify, revoke
///
/// Issuing writes an `access_tokens` row first and then signs a JWT whose
/// `jti` is that row's id. Verifying checks the signature and then the row.
/// Revoking flips the row, which invalidates the JWT immediately even though
/// its `exp` is still in the future.

use chrono::Duration;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    jwt::{create_token, validate_token, Claims, JwtError},
    middleware::{AuthContext, AuthError},
};
use crate::models::access_token::{AccessToken, CreateAccessToken, DEFAULT_TOKEN_NAME};

/// Error type for issuing tokens
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Records and signs a new access token for `user_id`
pub async fn issue_access_token(
    pool: &PgPool,
    user_id: i64,
    secret: &str,
    ttl: Duration,
) -> Result<String, TokenError> {
    let claims = Claims::new(user_id, Uuid::new_v4(), ttl);
    let token = create_token(&claims, secret)?;

    AccessToken::create(
        pool,
        CreateAccessToken {
            id: claims.jti,
            user_id,
            name: DEFAULT_TOKEN_NAME.to_string(),
            expires_at: claims.expires_at(),
        },
    )
    .await?;

    info!(user_id, token_id = %claims.jti, "Issued access token");
    Ok(token)
}

/// Validates a raw bearer token against its signature and the token store
pub async fn verify_access_token(
    pool: &PgPool,
    secret: &str,
    token: &str,
) -> Result<AuthContext, AuthError> {
    let claims = validate_token(token, secret)?;

    let record = AccessToken::find_by_id(pool, claims.jti)
        .await?
        .filter(|record| record.user_id == claims.sub && record.is_usable())
        .ok_or_else(|| {
            debug!(token_id = %claims.jti, "Rejected revoked or unknown token");
            AuthError::Revoked
        })?;

    Ok(AuthContext::new(record.user_id, record.id))
}

/// Revokes the token behind an authenticated request
///
/// Returns false when it was already revoked.
pub async fn revoke_access_token(pool: &PgPool, context: &AuthContext) -> Result<bool, sqlx::Error> {
    let revoked = AccessToken::revoke(pool, context.token_id).await?;

    info!(user_id = context.user_id, token_id = %context.token_id, revoked, "Revoked access token");
    Ok(revoked)
}
