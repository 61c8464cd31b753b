//! Account API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/auth/signup` - Create an account
//! - `POST /api/v1/auth/login` - Authenticate and receive a token
//! - `POST /api/v1/auth/change-password` - Change the caller's password

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use crate::api::response::{ApiResponse, AppError};
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

use super::commands::{
    ChangePasswordCommand, ChangePasswordError, LoginCommand, LoginError, SignupCommand,
    SignupError,
};

/// Creates the accounts router
pub fn accounts_routes() -> Router<FeatureState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/change-password", post(change_password))
}

#[tracing::instrument(skip(state, command), fields(email = %command.email))]
async fn signup(
    State(state): State<FeatureState>,
    Json(command): Json<SignupCommand>,
) -> Result<Response, AppError> {
    let response = super::commands::signup::handle(state.db, state.auth, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, command), fields(email = %command.email))]
async fn login(
    State(state): State<FeatureState>,
    Json(command): Json<LoginCommand>,
) -> Result<Response, AppError> {
    let response = super::commands::login::handle(state.db, state.auth, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, command), fields(user_id = %user.id))]
async fn change_password(
    State(state): State<FeatureState>,
    user: AuthUser,
    Json(command): Json<ChangePasswordCommand>,
) -> Result<Response, AppError> {
    super::commands::change_password::handle(state.db, user.id, command).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "changed": true }))),
    )
        .into_response())
}

impl From<SignupError> for AppError {
    fn from(err: SignupError) -> Self {
        match err {
            SignupError::NameValidation(_)
            | SignupError::EmailRequired
            | SignupError::EmailInvalid
            | SignupError::PasswordTooShort
            | SignupError::UnknownRole(_) => AppError::Validation(err.to_string()),
            SignupError::DuplicateEmail => AppError::Conflict(err.to_string()),
            SignupError::Token(e) => AppError::Internal(e.to_string()),
            SignupError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            LoginError::Token(e) => AppError::Internal(e.to_string()),
            LoginError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ChangePasswordError> for AppError {
    fn from(err: ChangePasswordError) -> Self {
        match err {
            ChangePasswordError::WrongCurrentPassword => AppError::Unauthorized(err.to_string()),
            ChangePasswordError::PasswordTooShort => AppError::Validation(err.to_string()),
            ChangePasswordError::NotFound => AppError::NotFound(err.to_string()),
            ChangePasswordError::Database(e) => AppError::Database(e),
        }
    }
}
