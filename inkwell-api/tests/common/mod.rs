//! Common test utilities for integration tests
//!
//! Tests that need PostgreSQL build a [`TestContext`]; it is `None` when
//! `DATABASE_URL` is unset, and the calling test returns early.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use inkwell_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, JwtConfig},
};
use inkwell_shared::db::{migrations::run_migrations, pool::create_pool};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "password123";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
}

/// A registered account and the token issued at registration
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl TestContext {
    /// Connects to `DATABASE_URL` and applies migrations
    pub async fn new() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping database test");
            return None;
        };

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
                min_connections: 0,
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-at-least-32-bytes".to_string(),
                ttl_hours: 1,
                prune_interval_minutes: 60,
            },
        };

        let db = create_pool(&config.pool_config())
            .await
            .expect("connect to test database");
        run_migrations(&db).await.expect("run migrations");

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Some(Self { db, app, config })
    }

    /// Sends a request and returns status plus parsed JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str, auth: Option<&TestUser>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(user) = auth {
            builder = builder.header(header::AUTHORIZATION, user.auth_header());
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: Value, auth: Option<&TestUser>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = auth {
            builder = builder.header(header::AUTHORIZATION, user.auth_header());
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Registers a fresh account with a unique email
    pub async fn register_user(&self) -> TestUser {
        let email = unique_email();
        let (status, body) = self
            .post(
                "/register",
                json!({
                    "name": "Test User",
                    "email": email,
                    "password": PASSWORD,
                    "password_confirmation": PASSWORD
                }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_i64().unwrap(),
            email,
            token: body["accessToken"].as_str().unwrap().to_string(),
        }
    }

    /// Logs in and returns a second token for the same account
    pub async fn login(&self, user: &TestUser) -> TestUser {
        let (status, body) = self
            .post("/login", json!({ "email": user.email, "password": PASSWORD }), None)
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        TestUser {
            id: user.id,
            email: user.email.clone(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates an article and returns its id
    pub async fn create_article(&self, user: &TestUser, title: &str, status: bool) -> i64 {
        let (code, body) = self
            .post(
                "/article/store",
                json!({ "title": title, "description": "Body text", "status": status }),
                Some(user),
            )
            .await;
        assert_eq!(code, StatusCode::OK, "store failed: {}", body);

        let (_, list) = self.get("/article/list", Some(user)).await;
        list["datas"]
            .as_array()
            .unwrap()
            .iter()
            .find(|a| a["title"] == title)
            .and_then(|a| a["id"].as_i64())
            .expect("created article is listed")
    }
}

pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

pub fn unique_title(prefix: &str) -> String {
    format!("{} {}", prefix, Uuid::new_v4())
}
