/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; every `ApiError` renders as a JSON body
/// with a boolean `status` of `false`, a machine-readable `error` code and a
/// human-readable `message`. Validation failures add an `errors` map of
/// field name to messages.
///
/// # Example
///
/// ```
/// use inkwell_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(found: bool) -> ApiResult<Json<Value>> {
///     if !found {
///         return Err(ApiError::NotFound("Article not found.".to_string()));
///     }
///     Ok(Json(json!({ "status": true })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inkwell_shared::auth::{jwt::JwtError, middleware::AuthError, password::PasswordError, token::TokenError};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message used for every 422 response
pub const VALIDATION_MESSAGE: &str = "The given data was invalid.";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Missing, malformed, revoked or expired bearer token (401)
    Unauthorized(String),

    /// Login with an unknown email or wrong password (401)
    InvalidCredentials,

    /// Resource absent or not owned by the caller (404)
    NotFound(String),

    /// Unprocessable entity (422)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub status: bool,

    /// Error code (e.g. "not_found", "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Field name to failure messages, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    /// Single-field validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

fn group_by_field(details: Vec<ValidationErrorDetail>) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for detail in details {
        grouped.entry(detail.field).or_default().push(detail.message);
    }
    grouped
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_code, message, errors) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::InvalidCredentials => ("invalid_credentials", "Invalid credentials".to_string(), None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::ValidationError(details) => (
                "validation_error",
                VALIDATION_MESSAGE.to_string(),
                Some(group_by_field(details)),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                ("internal_error", "An internal error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            status: false,
            error: error_code.to_string(),
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // A concurrent registration can slip past the uniqueness pre-check
                if db_err.is_unique_violation()
                    && db_err.constraint().is_some_and(|c| c.contains("email"))
                {
                    return ApiError::validation("email", "The email has already been taken.");
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Key under which `validator` stores struct-level (schema) errors
const SCHEMA_ERRORS_KEY: &str = "__all__";

/// Convert validator derive errors to API errors
///
/// Struct-level rules name the field they report on in their error code.
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(key, errors)| {
                let key: String = key.to_string();
                errors.iter().map(move |error| {
                    let field = if key == SCHEMA_ERRORS_KEY {
                        error.code.to_string()
                    } else {
                        key.clone()
                    };
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid.", field));

                    ValidationErrorDetail { field, message }
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

/// Convert auth errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized("Unauthenticated.".to_string()),
            AuthError::InvalidFormat(msg) => ApiError::Unauthorized(msg),
            AuthError::InvalidToken(jwt_err) => jwt_err.into(),
            AuthError::Revoked => ApiError::Unauthorized("Token has been revoked".to_string()),
            AuthError::DatabaseError(db_err) => {
                ApiError::InternalError(format!("Token lookup failed: {}", db_err))
            }
        }
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::ValidationError(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert token issuance errors to API errors
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::InternalError(format!("Token issuance failed: {}", err))
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}
