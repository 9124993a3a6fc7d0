/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Create an account and receive a token
/// - `POST /login` - Exchange credentials for a token
/// - `GET /profile` - Current user in an envelope
/// - `GET /user` - Current user, bare
/// - `POST /logout` - Revoke the token used for this request

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{non_empty, required, trimmed, ValidatedJson},
    response::MessageResponse,
};
use axum::{extract::State, Extension, Json};
use inkwell_shared::{
    auth::{middleware::AuthContext, password, token},
    models::user::{CreateUser, Role, User},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::{Validate, ValidationError};

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "confirmation_matches", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name may not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email may not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    #[validate(
        required(message = "The password field is required."),
        length(min = 8, message = "The password must be at least 8 characters.")
    )]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    pub password_confirmation: Option<String>,
}

/// `password` must equal `password_confirmation`
///
/// The error code names the field the failure is reported on.
fn confirmation_matches(req: &RegisterRequest) -> Result<(), ValidationError> {
    match &req.password {
        Some(password) if req.password_confirmation.as_ref() != Some(password) => {
            let mut error = ValidationError::new("password");
            error.message = Some("The password confirmation does not match.".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: bool,
    pub message: String,
    pub user: User,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "non_empty")]
    #[validate(required(message = "The password field is required."))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: bool,
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub status: bool,
    pub message: String,
    pub data: User,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "password": "password123",
///   "password_confirmation": "password123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": true,
///   "message": "User registration successful",
///   "user": { "id": 1, "name": "Jane Doe", "email": "jane@example.com", ... },
///   "accessToken": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed or email already taken
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let name = required(req.name, "name")?;
    let email = required(req.email, "email")?;
    let plain_password = required(req.password, "password")?;

    if User::email_exists(&state.db, &email).await? {
        return Err(ApiError::validation("email", "The email has already been taken."));
    }

    let password_hash = password::hash_password(&plain_password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name,
            email,
            password_hash,
            role: Role::User,
        },
    )
    .await?;

    let access_token =
        token::issue_access_token(&state.db, user.id, state.jwt_secret(), state.token_ttl()).await?;

    info!(user_id = user.id, "User registered");

    Ok(Json(RegisterResponse {
        status: true,
        message: "User registration successful".to_string(),
        user,
        access_token,
    }))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// { "email": "jane@example.com", "password": "password123" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (indistinguishable)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = required(req.email, "email")?;
    let plain_password = required(req.password, "password")?;

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&plain_password, &user.password_hash)? {
        warn!(user_id = user.id, "Login rejected: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token =
        token::issue_access_token(&state.db, user.id, state.jwt_secret(), state.token_ttl()).await?;

    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        status: true,
        message: "User logged in successfully".to_string(),
        user,
        token,
    }))
}

async fn load_user(state: &AppState, auth: &AuthContext) -> ApiResult<User> {
    User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("You don't have access".to_string()))
}

/// `GET /profile`
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = load_user(&state, &auth).await?;

    Ok(Json(ProfileResponse {
        status: true,
        message: "User data".to_string(),
        data: user,
    }))
}

/// `GET /user`
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    Ok(Json(load_user(&state, &auth).await?))
}

/// Revokes the presented token; other tokens of the same user stay live
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MessageResponse>> {
    if !token::revoke_access_token(&state.db, &auth).await? {
        // Lost a race with a concurrent logout on the same token
        return Err(ApiError::Unauthorized("Token has been revoked".to_string()));
    }

    info!(user_id = auth.user_id, token_id = %auth.token_id, "User logged out");
    Ok(Json(MessageResponse::ok("User logged out successfully")))
}
