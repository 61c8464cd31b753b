//! Profile API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/profile` - Own account view
//! - `PUT /api/v1/profile` - Patch the profile bag
//! - `POST /api/v1/profile/photo` - Upload a photo (multipart)
//! - `DELETE /api/v1/profile/photo` - Remove the photo
//! - `GET /api/v1/profile/students/:id` - Teacher view of an enrolled
//!   student's profile
//! - `GET /api/v1/profile/dashboard` - Student dashboard counts

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError};
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

use super::commands::{PhotoError, UpdateProfileCommand, UpdateProfileError};
use super::queries::{DashboardError, GetProfileError, StudentProfileError};

/// Creates the profiles router
pub fn profiles_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/", put(update_profile))
        .route("/photo", post(upload_photo))
        .route("/photo", delete(remove_photo))
        .route("/students/:id", get(student_profile))
        .route("/dashboard", get(dashboard))
}

#[tracing::instrument(skip(state), fields(user_id = %user.id))]
async fn get_profile(
    State(state): State<FeatureState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let account = super::queries::get::handle(state.db, user.id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(account))).into_response())
}

#[tracing::instrument(skip(state, command), fields(user_id = %user.id))]
async fn update_profile(
    State(state): State<FeatureState>,
    user: AuthUser,
    Json(command): Json<UpdateProfileCommand>,
) -> Result<Response, AppError> {
    let profile = super::commands::update::handle(state.db, user.id, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(profile))).into_response())
}

#[tracing::instrument(skip(state, multipart), fields(user_id = %user.id))]
async fn upload_photo(
    State(state): State<FeatureState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (name, data) = read_upload(multipart, "photo").await?;
    let web_path =
        super::commands::photo::upload(state.db, state.storage, user.id, &name, &data).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "photo": web_path }))),
    )
        .into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user.id))]
async fn remove_photo(
    State(state): State<FeatureState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    super::commands::photo::remove(state.db, state.storage, user.id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "photo": null }))),
    )
        .into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, student_id = %student_id))]
async fn student_profile(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let account = super::queries::student::handle(state.db, user.id, student_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(account))).into_response())
}

#[tracing::instrument(skip(state), fields(student_id = %user.id))]
async fn dashboard(
    State(state): State<FeatureState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    user.require_student()?;
    let summary = super::queries::dashboard::handle(state.db, user.id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(summary))).into_response())
}

/// Pull the first file out of a multipart body, preferring the named field.
///
/// Returns the original filename and the raw bytes.
pub(crate) async fn read_upload(
    mut multipart: Multipart,
    preferred_field: &str,
) -> Result<(String, Vec<u8>), AppError> {
    let mut fallback: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let is_preferred = field.name() == Some(preferred_field);
        let Some(file_name) = field.file_name().map(String::from) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?
            .to_vec();

        if is_preferred {
            return Ok((file_name, data));
        }
        if fallback.is_none() {
            fallback = Some((file_name, data));
        }
    }

    fallback.ok_or_else(|| AppError::BadRequest("No file in request".to_string()))
}

impl From<GetProfileError> for AppError {
    fn from(err: GetProfileError) -> Self {
        match err {
            GetProfileError::NotFound => AppError::NotFound(err.to_string()),
            GetProfileError::CorruptRole => AppError::Internal(err.to_string()),
            GetProfileError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateProfileError> for AppError {
    fn from(err: UpdateProfileError) -> Self {
        match err {
            UpdateProfileError::EmptyPatch => AppError::Validation(err.to_string()),
            UpdateProfileError::NotFound => AppError::NotFound(err.to_string()),
            UpdateProfileError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        match err {
            PhotoError::MissingFile => AppError::BadRequest(err.to_string()),
            PhotoError::NotFound => AppError::NotFound(err.to_string()),
            PhotoError::Storage(msg) => AppError::BadRequest(msg),
            PhotoError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<StudentProfileError> for AppError {
    fn from(err: StudentProfileError) -> Self {
        match err {
            StudentProfileError::NotEnrolled => AppError::Forbidden(err.to_string()),
            StudentProfileError::NotFound => AppError::NotFound(err.to_string()),
            StudentProfileError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Database(e) => AppError::Database(e),
        }
    }
}
