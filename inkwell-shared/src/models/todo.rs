/// Todo model and database operations
///
/// Todos have no owner. Any caller may list, create, update or delete any row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,

    pub title: String,

    pub description: Option<String>,

    /// Completion flag
    pub status: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
}

/// Replacement values; a `None` description clears it
#[derive(Debug, Clone)]
pub struct UpdateTodo {
    pub title: String,
    pub description: Option<String>,
}

impl Todo {
    /// All todos, most recently created first
    ///
    /// `id` breaks ties so rows created within the same clock tick still come
    /// back newest first.
    pub async fn list_latest(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, status, created_at, updated_at
            FROM todos
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn create(pool: &PgPool, data: CreateTodo) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    /// Overwrites a todo by id; `None` when the id does not exist
    pub async fn update(pool: &PgPool, id: i64, data: UpdateTodo) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a todo by id; false when nothing matched
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
