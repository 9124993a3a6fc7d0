/// Credential primitives
///
/// - [`password`]: Argon2id hashing and verification
/// - [`jwt`]: HS256 token signing and validation
/// - [`token`]: issuing, verifying and revoking stored access tokens
/// - [`middleware`]: bearer header parsing and the request-scoped [`middleware::AuthContext`]
///
/// # Example
///
/// ```no_run
/// use inkwell_shared::auth::{password, token};
/// use chrono::Duration;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let hash = password::hash_password("password123")?;
/// assert!(password::verify_password("password123", &hash)?);
///
/// let bearer = token::issue_access_token(&pool, user_id, "secret", Duration::hours(24)).await?;
/// let context = token::verify_access_token(&pool, "secret", &bearer).await?;
/// token::revoke_access_token(&pool, &context).await?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod token;
