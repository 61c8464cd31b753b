//! Class API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/classes` - Create a class
//! - `GET /api/v1/classes` - List visible classes
//! - `PUT /api/v1/classes/:id` - Rename an owned class
//! - `DELETE /api/v1/classes/:id` - Delete an owned class
//! - `GET /api/v1/classes/:id/students` - Union roster (teacher)
//! - `POST /api/v1/classes/:id/students/:student_id` - Enroll
//! - `DELETE /api/v1/classes/:id/students/:student_id` - Unenroll
//! - `GET /api/v1/classes/:id/subjects` - Subjects with files
//! - `POST /api/v1/classes/:id/subjects` - Add a subject
//! - `POST /api/v1/classes/subjects/:subject_id/files/:kind` - Attach a file
//! - `DELETE /api/v1/classes/files/:file_id` - Remove a file

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
use crate::features::profiles::routes::read_upload;
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

use super::commands::{
    AddSubjectCommand, AddSubjectError, CreateClassCommand, CreateClassError, DeleteClassError,
    EnrollmentError, RenameClassCommand, RenameClassError, SubjectFileError,
};
use super::queries::{ListClassesError, ListSubjectsError, RosterError};

/// Creates the classes router
pub fn classes_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_class))
        .route("/", get(list_classes))
        .route("/:id", put(rename_class))
        .route("/:id", delete(delete_class))
        .route("/:id/students", get(class_roster))
        .route("/:id/students/:student_id", post(enroll_student))
        .route("/:id/students/:student_id", delete(unenroll_student))
        .route("/:id/subjects", get(list_subjects))
        .route("/:id/subjects", post(add_subject))
        .route("/subjects/:subject_id/files/:kind", post(attach_file))
        .route("/files/:file_id", delete(remove_file))
}

#[tracing::instrument(skip(state, command), fields(teacher_id = %user.id, name = %command.name))]
async fn create_class(
    State(state): State<FeatureState>,
    user: AuthUser,
    Json(command): Json<CreateClassCommand>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let response = super::commands::create::handle(state.db, user.id, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user.id))]
async fn list_classes(
    State(state): State<FeatureState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let classes = super::queries::list::handle(state.db, user.id, user.role).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(classes))).into_response())
}

#[tracing::instrument(skip(state, command), fields(teacher_id = %user.id, class_id = %class_id))]
async fn rename_class(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
    Json(command): Json<RenameClassCommand>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let response = super::commands::rename::handle(state.db, user.id, class_id, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, class_id = %class_id))]
async fn delete_class(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    super::commands::delete::handle(state.db, user.id, class_id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "deleted": true }))),
    )
        .into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, class_id = %class_id))]
async fn class_roster(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let roster = super::queries::roster::handle(state.db, user.id, class_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(roster))).into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, class_id = %class_id, student_id = %student_id))]
async fn enroll_student(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path((class_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    super::commands::enrollment::enroll(state.db, user.id, class_id, student_id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "enrolled": true }))),
    )
        .into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, class_id = %class_id, student_id = %student_id))]
async fn unenroll_student(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path((class_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    super::commands::enrollment::unenroll(state.db, user.id, class_id, student_id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "enrolled": false }))),
    )
        .into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user.id, class_id = %class_id))]
async fn list_subjects(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let subjects = super::queries::subjects::handle(state.db, user.id, class_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(subjects))).into_response())
}

#[tracing::instrument(skip(state, command), fields(teacher_id = %user.id, class_id = %class_id))]
async fn add_subject(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
    Json(command): Json<AddSubjectCommand>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let response = super::commands::subjects::handle(state.db, user.id, class_id, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, multipart), fields(teacher_id = %user.id, subject_id = %subject_id, kind = %kind))]
async fn attach_file(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path((subject_id, kind)): Path<(Uuid, String)>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let (name, data) = read_upload(multipart, "file").await?;
    let response = super::commands::subject_files::attach(
        state.db,
        state.storage,
        user.id,
        subject_id,
        &kind,
        &name,
        &data,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, file_id = %file_id))]
async fn remove_file(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(file_id): Path<Uuid>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    super::commands::subject_files::remove(state.db, state.storage, user.id, file_id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "deleted": true }))),
    )
        .into_response())
}

impl From<CreateClassError> for AppError {
    fn from(err: CreateClassError) -> Self {
        match err {
            CreateClassError::NameValidation(_) => AppError::Validation(err.to_string()),
            CreateClassError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            CreateClassError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<RenameClassError> for AppError {
    fn from(err: RenameClassError) -> Self {
        match err {
            RenameClassError::NameValidation(_) => AppError::Validation(err.to_string()),
            RenameClassError::NotFound => AppError::not_found_or_not_owned("Class"),
            RenameClassError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            RenameClassError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteClassError> for AppError {
    fn from(err: DeleteClassError) -> Self {
        match err {
            DeleteClassError::NotFound => AppError::not_found_or_not_owned("Class"),
            DeleteClassError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<EnrollmentError> for AppError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::ClassNotFound => AppError::not_found_or_not_owned("Class"),
            EnrollmentError::StudentNotFound => AppError::NotFound(err.to_string()),
            EnrollmentError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AddSubjectError> for AppError {
    fn from(err: AddSubjectError) -> Self {
        match err {
            AddSubjectError::NameValidation(_) => AppError::Validation(err.to_string()),
            AddSubjectError::ClassNotFound => AppError::not_found_or_not_owned("Class"),
            AddSubjectError::Duplicate(_) => AppError::Conflict(err.to_string()),
            AddSubjectError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<SubjectFileError> for AppError {
    fn from(err: SubjectFileError) -> Self {
        match err {
            SubjectFileError::UnknownKind(_) => AppError::Validation(err.to_string()),
            SubjectFileError::SubjectNotFound => AppError::not_found_or_not_owned("Subject"),
            SubjectFileError::FileNotFound => AppError::not_found_or_not_owned("File"),
            SubjectFileError::Storage(msg) => AppError::BadRequest(msg),
            SubjectFileError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListClassesError> for AppError {
    fn from(err: ListClassesError) -> Self {
        match err {
            ListClassesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::ClassNotFound => AppError::not_found_or_not_owned("Class"),
            RosterError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListSubjectsError> for AppError {
    fn from(err: ListSubjectsError) -> Self {
        match err {
            ListSubjectsError::ClassNotFound => AppError::not_found_or_not_owned("Class"),
            ListSubjectsError::Database(e) => AppError::Database(e),
        }
    }
}
