/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use inkwell_api::{app::{build_router, AppState}, config::Config};
/// use inkwell_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.pool_config()).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        auth::{optional_auth, require_auth},
        security::SecurityHeadersLayer,
    },
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Lifetime of newly issued access tokens
    pub fn token_ttl(&self) -> chrono::Duration {
        self.config.token_ttl()
    }
}

/// Builds the complete router
///
/// ```text
/// GET  /health                 public
/// POST /register               public
/// POST /login                  public
/// GET  /all-article            public
/// GET  /profile                bearer
/// GET  /user                   bearer
/// POST /logout                 bearer
/// GET  /article/list           bearer
/// POST /article/store          bearer
/// POST /article/edit           bearer (id in body)
/// POST /article/edit/:id       bearer
/// GET  /article/delete/:id     bearer
/// GET  /todo                   public
/// POST /todo/store             public
/// POST /todo/edit              optional bearer
/// GET  /todo/delete/:id        public
/// ```
///
/// Auth layers are attached with `route_layer`, so unknown paths still get a
/// plain 404 rather than a 401.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/all-article", get(routes::articles::all_articles))
        .route("/todo", get(routes::todos::list_todos))
        .route("/todo/store", post(routes::todos::store_todo))
        .route("/todo/delete/:id", get(routes::todos::delete_todo));

    let authenticated_routes = Router::new()
        .route("/profile", get(routes::auth::profile))
        .route("/user", get(routes::auth::current_user))
        .route("/logout", post(routes::auth::logout))
        .route("/article/list", get(routes::articles::my_articles))
        .route("/article/store", post(routes::articles::store_article))
        .route("/article/edit", post(routes::articles::update_article_from_body))
        .route("/article/edit/:id", post(routes::articles::update_article))
        .route("/article/delete/:id", get(routes::articles::delete_article))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let optionally_authenticated_routes = Router::new()
        .route("/todo/edit", post(routes::todos::update_todo))
        .route_layer(from_fn_with_state(state.clone(), optional_auth));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(optionally_authenticated_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use inkwell_shared::db::pool::create_lazy_pool;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Router over a pool that never connects; only requests rejected before
    /// any query runs are meaningful here.
    fn test_app() -> Router {
        let config = test_config();
        let pool = create_lazy_pool(&config.pool_config()).expect("lazy pool");
        build_router(AppState::new(pool, config))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response: Response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_register_requires_every_field() {
        let (status, body) = send(post_json("/register", json!({}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], false);
        for field in ["name", "email", "password"] {
            assert!(body["errors"][field].is_array(), "missing error for {}", field);
        }
    }

    #[tokio::test]
    async fn test_register_rejects_short_or_unconfirmed_password() {
        let (status, body) = send(post_json(
            "/register",
            json!({
                "name": "Jane",
                "email": "jane@example.com",
                "password": "short",
                "password_confirmation": "different"
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let messages = body["errors"]["password"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(body["errors"].get("email").is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let (status, body) = send(post_json(
            "/register",
            json!({
                "name": "Jane",
                "email": "not-an-email",
                "password": "password123",
                "password_confirmation": "password123"
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["email"].is_array());
    }

    #[tokio::test]
    async fn test_blank_name_counts_as_missing() {
        let (status, body) = send(post_json(
            "/register",
            json!({
                "name": "   ",
                "email": "jane@example.com",
                "password": "password123",
                "password_confirmation": "password123"
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["name"][0], "The name field is required.");
    }

    #[tokio::test]
    async fn test_login_validates_before_lookup() {
        let (status, body) = send(post_json("/login", json!({ "email": "nope" }))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["email"].is_array());
        assert!(body["errors"]["password"].is_array());
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer_token() {
        let requests = vec![
            get("/profile"),
            get("/user"),
            post_json("/logout", json!({})),
            get("/article/list"),
            post_json("/article/store", json!({ "title": "t", "description": "d" })),
            post_json("/article/edit/1", json!({ "title": "t", "description": "d" })),
            get("/article/delete/1"),
        ];

        for request in requests {
            let uri = request.uri().to_string();
            let (status, body) = send(request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} should need auth", uri);
            assert_eq!(body["status"], false);
        }
    }

    #[tokio::test]
    async fn test_forged_token_rejected() {
        let request = Request::builder()
            .uri("/profile")
            .header(header::AUTHORIZATION, "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_rejected() {
        let request = Request::builder()
            .uri("/article/list")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_todo_store_requires_title() {
        let (status, body) = send(post_json("/todo/store", json!({ "description": "no title" }))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["title"][0], "The title field is required.");
    }

    #[tokio::test]
    async fn test_anonymous_todo_edit_reports_success() {
        let bodies = [json!({}), json!({ "title": "x" }), json!({ "id": 1 })];

        for body in bodies {
            let (status, response) = send(post_json("/todo/edit", body.clone())).await;
            assert_eq!(status, StatusCode::OK, "body {}", body);
            assert_eq!(response["status"], true);
            assert_eq!(response["message"], "Todo updated successfully!");
        }
    }

    #[tokio::test]
    async fn test_anonymous_todo_edit_ignores_unreadable_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/todo/edit")
            .body(Body::from("not json"))
            .unwrap();

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], true);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, _) = send(get("/article/unknown")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_responses_carry_security_headers() {
        let response = test_app()
            .oneshot(post_json("/todo/store", json!({})))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
    }
}
