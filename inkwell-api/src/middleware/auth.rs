/// Bearer token authentication layers
///
/// Both layers resolve the `Authorization` header into an
/// [`AuthContext`] and insert it into request extensions. Handlers receive
/// it explicitly: `Extension<AuthContext>` behind [`require_auth`],
/// `Option<Extension<AuthContext>>` behind [`optional_auth`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use inkwell_shared::auth::middleware::{authenticate_request, AuthContext, AuthError};
use tracing::debug;

use crate::{app::AppState, error::ApiError};

/// Rejects the request with 401 unless it carries a live bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = authenticate_request(&state.db, state.jwt_secret(), req.headers())
        .await
        .map_err(|e| {
            debug!(error = %e, path = %req.uri().path(), "Authentication failed");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert::<AuthContext>(context);
    Ok(next.run(req).await)
}

/// Attaches an [`AuthContext`] when a live bearer token is present
///
/// Missing or unusable tokens leave the request anonymous. Only a failing
/// token store lookup stops the request.
pub async fn optional_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match authenticate_request(&state.db, state.jwt_secret(), req.headers()).await {
        Ok(context) => {
            req.extensions_mut().insert::<AuthContext>(context);
        }
        Err(AuthError::MissingCredentials) => {}
        Err(AuthError::DatabaseError(e)) => {
            return ApiError::from(AuthError::DatabaseError(e)).into_response();
        }
        Err(e) => {
            debug!(error = %e, "Ignoring unusable bearer token");
        }
    }

    next.run(req).await
}
