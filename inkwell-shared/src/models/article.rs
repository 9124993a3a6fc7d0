/// Article model and database operations
///
/// Articles belong to the user who wrote them. Every mutating query here
/// filters on both `id` and `user_id`, so a caller can only ever touch rows
/// it owns; a row owned by someone else is indistinguishable from a missing
/// one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE articles (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     status BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// An article
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    pub title: String,

    pub description: String,

    /// Published flag; only published articles are publicly listed
    pub status: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating an article
#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub user_id: i64,
    pub title: String,
    pub description: String,

    /// Defaults to published when absent
    pub status: Option<bool>,
}

/// Input for overwriting an article
#[derive(Debug, Clone)]
pub struct UpdateArticle {
    pub title: String,
    pub description: String,

    /// Left unchanged when absent
    pub status: Option<bool>,
}

impl Article {
    /// Published articles from every author, newest first
    pub async fn list_published(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, user_id, title, description, status, created_at, updated_at
            FROM articles
            WHERE status = TRUE
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Every article owned by `user_id`, published or not, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, user_id, title, description, status, created_at, updated_at
            FROM articles
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(pool: &PgPool, data: CreateArticle) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (user_id, title, description, status)
            VALUES ($1, $2, $3, COALESCE($4, TRUE))
            RETURNING id, user_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .fetch_one(pool)
        .await
    }

    /// Finds an article only if `user_id` owns it
    pub async fn find_owned(
        pool: &PgPool,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, user_id, title, description, status, created_at, updated_at
            FROM articles
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Overwrites an owned article and bumps `updated_at`
    ///
    /// Returns `None` when no article with this id belongs to `user_id`.
    pub async fn update_owned(
        pool: &PgPool,
        id: i64,
        user_id: i64,
        data: UpdateArticle,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET title = $3,
                description = $4,
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .fetch_optional(pool)
        .await
    }

    /// Deletes an owned article; false when nothing matched
    pub async fn delete_owned(pool: &PgPool, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
