/// Todo endpoints
///
/// Todos form one shared list with no owner.
///
/// # Endpoints
///
/// - `GET /todo` - Every todo, newest first
/// - `POST /todo/store` - Create a todo
/// - `POST /todo/edit` - Update a todo (applied only for authenticated callers)
/// - `GET /todo/delete/:id` - Delete a todo

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{required, trimmed, ValidatedJson},
    response::{CodedListResponse, CreatedResponse, MessageResponse},
    routes::parse_id,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension, Json,
};
use inkwell_shared::{
    auth::middleware::AuthContext,
    models::todo::{CreateTodo, Todo, UpdateTodo},
};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

const MAX_TITLE_CHARS: usize = 255;

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct StoreTodoRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The title field is required."),
        length(max = 255, message = "The title may not be greater than 255 characters.")
    )]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub description: Option<String>,
}

/// Edit request
///
/// Never rejected: a body that does not name a todo and a title simply
/// writes nothing.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "trimmed")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub description: Option<String>,
}

pub async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<CodedListResponse<Todo>>> {
    let todos = Todo::list_latest(&state.db).await?;
    Ok(Json(CodedListResponse::new(todos)))
}

pub async fn store_todo(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<StoreTodoRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let todo = Todo::create(
        &state.db,
        CreateTodo {
            title: required(req.title, "title")?,
            description: req.description,
        },
    )
    .await?;

    info!(todo_id = todo.id, "Todo created");
    Ok(Json(CreatedResponse::new("Todo created successfully!")))
}

/// Update a todo
///
/// # Endpoint
///
/// ```text
/// POST /todo/edit
/// Authorization: Bearer eyJ...   (optional)
///
/// { "id": 3, "title": "Buy milk", "description": "Semi-skimmed" }
/// ```
///
/// Always answers with the success envelope. Anonymous callers are ignored
/// without reading the body. For authenticated callers the change is written
/// only when the body parses, names an `id` that exists and carries a title
/// that fits the column.
pub async fn update_todo(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let done = Json(MessageResponse::ok("Todo updated successfully!"));

    let Some(Extension(auth)) = auth else {
        debug!("Todo edit skipped: anonymous caller");
        return Ok(done);
    };

    let req = match serde_json::from_slice::<UpdateTodoRequest>(&body) {
        Ok(req) => req,
        Err(e) => {
            debug!(error = %e, user_id = auth.user_id, "Todo edit skipped: unreadable body");
            return Ok(done);
        }
    };

    let (Some(id), Some(title)) = (req.id, req.title) else {
        debug!(user_id = auth.user_id, "Todo edit skipped: id or title missing");
        return Ok(done);
    };

    // Column is VARCHAR(255)
    if title.chars().count() > MAX_TITLE_CHARS {
        debug!(todo_id = id, "Todo edit skipped: title too long");
        return Ok(done);
    }

    let changes = UpdateTodo {
        title,
        description: req.description,
    };

    match Todo::update(&state.db, id, changes).await? {
        Some(_) => info!(todo_id = id, user_id = auth.user_id, "Todo updated"),
        None => debug!(todo_id = id, "Todo edit skipped: unknown id"),
    }

    Ok(done)
}

/// Delete a todo
///
/// An unknown id is not an error: the response is 200 with `status: false`.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = match parse_id(&raw_id) {
        Some(id) => Todo::delete(&state.db, id).await?,
        None => false,
    };

    if !deleted {
        return Ok(Json(MessageResponse::not_done("Todo not found.")));
    }

    info!(todo_id = %raw_id, "Todo deleted");
    Ok(Json(MessageResponse::ok("Todo deleted successfully!")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_request_description_optional() {
        let req: StoreTodoRequest = serde_json::from_str(r#"{"title":"Milk"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.description, None);
    }

    #[test]
    fn test_blank_description_dropped() {
        let req: StoreTodoRequest =
            serde_json::from_str(r#"{"title":"Milk","description":"  "}"#).unwrap();
        assert_eq!(req.description, None);
    }

    #[test]
    fn test_update_request_accepts_partial_body() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"title":" Milk "}"#).unwrap();

        assert_eq!(req.id, None);
        assert_eq!(req.title.as_deref(), Some("Milk"));
    }
}
