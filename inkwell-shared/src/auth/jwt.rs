/// Signed access tokens
///
/// Access tokens are HS256 JWTs. Each carries a `jti` that names a row in the
/// `access_tokens` table, which is what makes a token revocable: a valid
/// signature is necessary but not sufficient (see [`super::middleware`]).
///
/// # Claims
///
/// - `sub`: user id
/// - `jti`: access token id
/// - `iss`: always `"inkwell"`
/// - `iat`, `nbf`, `exp`: Unix timestamps
///
/// # Example
///
/// ```
/// use inkwell_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, Uuid::new_v4(), Duration::hours(1));
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
///
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(validated.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer written into and required from every token
pub const ISSUER: &str = "inkwell";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Token id, primary key of the `access_tokens` row
    pub jti: Uuid,

    /// Issuer - always "inkwell"
    pub iss: String,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Creates claims valid from now for `ttl`
    pub fn new(user_id: i64, token_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            jti: token_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Expiration as a timestamp, for persisting alongside the token row
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Verifies signature, issuer, `exp` and `nbf`, returning the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss"]);
    validation.validate_nbf = true;
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_new() {
        let token_id = Uuid::new_v4();
        let claims = Claims::new(7, token_id, Duration::hours(24));

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.jti, token_id);
        assert_eq!(claims.iss, "inkwell");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.nbf, claims.iat);
        assert!(!claims.is_expired());
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
    }

    #[test]
    fn test_create_and_validate() {
        let claims = Claims::new(1, Uuid::new_v4(), Duration::hours(1));
        let token = create_token(&claims, SECRET).expect("Token creation should succeed");

        // header.payload.signature
        assert_eq!(token.split('.').count(), 3);

        let validated = validate_token(&token, SECRET).expect("Validation should succeed");
        assert_eq!(validated, claims);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(1, Uuid::new_v4(), Duration::hours(1));
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "another-secret-that-is-also-32-bytes!");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::new(1, Uuid::new_v4(), Duration::seconds(-10));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new(1, Uuid::new_v4(), Duration::hours(1));
        claims.iss = "someone-else".to_string();

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::InvalidIssuer)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_token("not.a.token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
