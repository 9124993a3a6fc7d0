/// Integration tests for the embedded migrations
///
/// Require PostgreSQL via `DATABASE_URL`; each test returns early without it.

use inkwell_shared::db::{
    migrations::{migration_status, run_migrations},
    pool::{create_pool, DatabaseConfig},
};
use sqlx::PgPool;

async fn migrated_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = create_pool(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 0,
        ..Default::default()
    })
    .await
    .expect("pool connects");

    run_migrations(&pool).await.expect("migrations apply");
    Some(pool)
}

async fn column_names(pool: &PgPool, table: &str) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT column_name::TEXT FROM information_schema.columns
         WHERE table_schema = current_schema() AND table_name = $1",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(pool) = migrated_pool().await else { return };

    run_migrations(&pool).await.expect("second run is a no-op");

    let status = migration_status(&pool).await.unwrap();
    assert!(status.is_up_to_date(), "{:?}", status);
    assert!(status.latest_version.is_some());
}

#[tokio::test]
async fn test_schema_tables_exist() {
    let Some(pool) = migrated_pool().await else { return };

    let users = column_names(&pool, "users").await;
    for column in ["id", "name", "email", "password_hash", "role_id"] {
        assert!(users.iter().any(|c| c == column), "users.{} missing", column);
    }

    let tokens = column_names(&pool, "access_tokens").await;
    assert!(tokens.iter().any(|c| c == "revoked"));

    let articles = column_names(&pool, "articles").await;
    assert!(articles.iter().any(|c| c == "user_id"));

    let todos = column_names(&pool, "todos").await;
    assert!(todos.iter().any(|c| c == "description"));
}

#[tokio::test]
async fn test_email_is_unique() {
    let Some(pool) = migrated_pool().await else { return };
    let email = format!("unique-{}@example.com", uuid::Uuid::new_v4());

    let insert = "INSERT INTO users (name, email, password_hash) VALUES ('A', $1, 'x')";
    sqlx::query(insert).bind(&email).execute(&pool).await.unwrap();

    let err = sqlx::query(insert).bind(&email).execute(&pool).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert!(db_err.is_unique_violation());
    assert_eq!(db_err.constraint(), Some("users_email_key"));
}
