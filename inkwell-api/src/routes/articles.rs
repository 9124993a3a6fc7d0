/// Article endpoints
///
/// # Endpoints
///
/// - `GET /all-article` - Published articles from every author, newest first
/// - `GET /article/list` - The caller's own articles, any status
/// - `POST /article/store` - Create an article owned by the caller
/// - `POST /article/edit/:id` - Replace title, description and status
/// - `POST /article/edit` - Same, with `id` in the body
/// - `GET /article/delete/:id` - Delete one of the caller's articles
///
/// Articles owned by someone else are reported exactly like missing ones.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{required, trimmed, JsonBody, ValidatedJson},
    response::{CreatedResponse, ListResponse, MessageResponse},
    routes::parse_id,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use inkwell_shared::{
    auth::middleware::AuthContext,
    models::article::{Article, CreateArticle, UpdateArticle},
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

const NOT_FOUND: &str = "Article not found.";

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct StoreArticleRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The title field is required."),
        length(max = 255, message = "The title may not be greater than 255 characters.")
    )]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "The description field is required."))]
    pub description: Option<String>,

    /// Published flag, defaults to published
    #[serde(default)]
    pub status: Option<bool>,
}

/// Edit request
///
/// `id` is only read by `POST /article/edit`; the path id wins otherwise.
/// Rules are checked after ownership is confirmed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The title field is required."),
        length(max = 255, message = "The title may not be greater than 255 characters.")
    )]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(required(message = "The description field is required."))]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<bool>,
}

pub async fn all_articles(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Article>>> {
    let articles = Article::list_published(&state.db).await?;
    Ok(Json(ListResponse::new(articles)))
}

pub async fn my_articles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListResponse<Article>>> {
    let articles = Article::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(ListResponse::new(articles)))
}

/// Create an article
///
/// # Endpoint
///
/// ```text
/// POST /article/store
/// Authorization: Bearer eyJ...
///
/// { "title": "Hello", "description": "First post", "status": true }
/// ```
///
/// # Response
///
/// ```json
/// { "status": 201, "message": "Article created successfully!" }
/// ```
pub async fn store_article(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<StoreArticleRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let article = Article::create(
        &state.db,
        CreateArticle {
            user_id: auth.user_id,
            title: required(req.title, "title")?,
            description: required(req.description, "description")?,
            status: req.status,
        },
    )
    .await?;

    info!(article_id = article.id, user_id = auth.user_id, "Article created");
    Ok(Json(CreatedResponse::new("Article created successfully!")))
}

/// Edit an article by path id
///
/// # Endpoint
///
/// ```text
/// POST /article/edit/:id
/// Authorization: Bearer eyJ...
///
/// { "title": "Hello again", "description": "Edited", "status": false }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no article with this id belongs to the caller, checked
///   before the body is validated
/// - `422 Unprocessable Entity`: the caller owns the article but the body is invalid
pub async fn update_article(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(raw_id): Path<String>,
    JsonBody(req): JsonBody<UpdateArticleRequest>,
) -> ApiResult<Json<MessageResponse>> {
    apply_update(&state, &auth, parse_id(&raw_id), req).await
}

/// Edit an article named by the `id` body field
pub async fn update_article_from_body(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    JsonBody(req): JsonBody<UpdateArticleRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let id = req.id;
    apply_update(&state, &auth, id, req).await
}

async fn apply_update(
    state: &AppState,
    auth: &AuthContext,
    id: Option<i64>,
    req: UpdateArticleRequest,
) -> ApiResult<Json<MessageResponse>> {
    let id = id.ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Article::find_owned(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    req.validate()?;

    let changes = UpdateArticle {
        title: required(req.title, "title")?,
        description: required(req.description, "description")?,
        status: req.status,
    };

    // Deleted between the lookup and the write
    Article::update_owned(&state.db, id, auth.user_id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    info!(article_id = id, user_id = auth.user_id, "Article updated");
    Ok(Json(MessageResponse::ok("Article updated successfully!")))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&raw_id).ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    if !Article::delete_owned(&state.db, id, auth.user_id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(article_id = id, user_id = auth.user_id, "Article deleted");
    Ok(Json(MessageResponse::ok("Article deleted successfully!")))
}
