/// Issued bearer tokens
///
/// Every JWT handed out at registration or login has a row here keyed by its
/// `jti`. Logging out flips `revoked`; a token whose row is revoked, expired
/// or missing no longer authenticates, whatever its signature says.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE access_tokens (
///     id UUID PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     revoked BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Name recorded for tokens issued by register and login
pub const DEFAULT_TOKEN_NAME: &str = "authToken";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessToken {
    /// Same value as the JWT `jti` claim
    pub id: Uuid,

    pub user_id: i64,

    pub name: String,

    pub revoked: bool,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAccessToken {
    pub id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Not revoked and not expired
    pub fn is_usable(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    pub async fn create(pool: &PgPool, data: CreateAccessToken) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO access_tokens (id, user_id, name, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, revoked, created_at, expires_at
            "#,
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.expires_at)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AccessToken>(
            r#"
            SELECT id, user_id, name, revoked, created_at, expires_at
            FROM access_tokens
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Marks a token revoked
    ///
    /// Returns false when the token does not exist or was already revoked.
    pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE access_tokens
            SET revoked = TRUE
            WHERE id = $1 AND revoked = FALSE
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes rows that can no longer authenticate anything
    pub async fn prune(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE revoked OR expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
