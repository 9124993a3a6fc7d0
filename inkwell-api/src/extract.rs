/// Request extractors
///
/// [`ValidatedJson`] deserializes a JSON body and runs its `validator` rules
/// before the handler body executes, so handlers only ever see requests that
/// passed their endpoint's schema. [`JsonBody`] only deserializes; handlers
/// that must resolve the target row first call `validate()` themselves.
///
/// # Example
///
/// ```
/// use inkwell_api::extract::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Rename {
///     #[validate(length(min = 1, message = "The name field is required."))]
///     name: String,
/// }
///
/// async fn rename(ValidatedJson(req): ValidatedJson<Rename>) -> String {
///     req.name
/// }
/// ```

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::Validate;

use crate::error::{ApiError, ApiResult};

/// JSON body that has passed validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// JSON body with the same rejection format as [`ValidatedJson`], not yet validated
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject_body)?;

        Ok(Self(value))
    }
}

/// Unreadable bodies are reported as a validation failure on `body`
fn reject_body(rejection: JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => other.body_text(),
    };

    tracing::debug!(%message, "Rejected request body");
    ApiError::validation("body", message)
}

/// Serde helper for text fields: trims, and treats blank input as absent
///
/// Use with `#[serde(default, deserialize_with = "trimmed")]` so that a
/// whitespace-only value trips the same `required` rule as a missing one.
pub fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Serde helper for secrets: an empty string counts as absent, nothing is trimmed
pub fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Takes a field that a `required` rule has already checked
pub fn required<T>(value: Option<T>, field: &str) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::validation(field, format!("The {} field is required.", field)))
}
