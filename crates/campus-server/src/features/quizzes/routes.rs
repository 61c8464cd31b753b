//! Quiz API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/quizzes` - Create (teacher)
//! - `GET /api/v1/quizzes` - List own quizzes with filters (teacher)
//! - `GET /api/v1/quizzes/available` - Published quizzes for the student
//! - `GET /api/v1/quizzes/my-attempts` - The student's attempt history
//! - `PUT /api/v1/quizzes/:id/status` - Lifecycle transition (teacher)
//! - `DELETE /api/v1/quizzes/:id` - Delete; attempts retained (teacher)
//! - `GET /api/v1/quizzes/:id/take` - Open for taking, key stripped (student)
//! - `POST /api/v1/quizzes/:id/submit` - Submit and grade (student)
//! - `GET /api/v1/quizzes/:id/results` - Attempts with names (teacher)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError, ErrorResponse};
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

use super::commands::{
    ChangeStatusCommand, ChangeStatusError, CreateQuizCommand, CreateQuizError, DeleteQuizError,
    SubmitQuizCommand, SubmitQuizError,
};
use super::queries::{
    ListStudentQuizzesError, ListTeacherQuizzesError, MyAttemptsError, QuizResultsError,
    TakeQuizError, TeacherQuizFilters,
};

/// Creates the quizzes router
pub fn quizzes_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_quiz))
        .route("/", get(list_quizzes))
        .route("/available", get(available_quizzes))
        .route("/my-attempts", get(my_attempts))
        .route("/:id/status", put(change_status))
        .route("/:id", delete(delete_quiz))
        .route("/:id/take", get(take_quiz))
        .route("/:id/submit", post(submit_quiz))
        .route("/:id/results", get(quiz_results))
}

#[tracing::instrument(skip(state, command), fields(teacher_id = %user.id, title = %command.title))]
async fn create_quiz(
    State(state): State<FeatureState>,
    user: AuthUser,
    Json(command): Json<CreateQuizCommand>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let response = super::commands::create::handle(state.db, user.id, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, filters), fields(teacher_id = %user.id))]
async fn list_quizzes(
    State(state): State<FeatureState>,
    user: AuthUser,
    Query(filters): Query<TeacherQuizFilters>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let quizzes = super::queries::list_for_teacher::handle(state.db, user.id, filters).await?;
    let meta = json!({ "count": quizzes.len() });
    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(quizzes, meta))).into_response())
}

#[tracing::instrument(skip(state), fields(student_id = %user.id))]
async fn available_quizzes(
    State(state): State<FeatureState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    user.require_student()?;
    let quizzes = super::queries::list_for_student::handle(state.db, user.id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(quizzes))).into_response())
}

#[tracing::instrument(skip(state), fields(student_id = %user.id))]
async fn my_attempts(
    State(state): State<FeatureState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    user.require_student()?;
    let attempts = super::queries::my_attempts::handle(state.db, user.id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(attempts))).into_response())
}

#[tracing::instrument(skip(state, command), fields(teacher_id = %user.id, quiz_id = %quiz_id))]
async fn change_status(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(quiz_id): Path<Uuid>,
    Json(command): Json<ChangeStatusCommand>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let response =
        super::commands::change_status::handle(state.db, user.id, quiz_id, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, quiz_id = %quiz_id))]
async fn delete_quiz(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(quiz_id): Path<Uuid>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    super::commands::delete::handle(state.db, user.id, quiz_id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "deleted": true }))),
    )
        .into_response())
}

#[tracing::instrument(skip(state), fields(student_id = %user.id, quiz_id = %quiz_id))]
async fn take_quiz(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(quiz_id): Path<Uuid>,
) -> Result<Response, AppError> {
    user.require_student()?;
    match super::queries::take::handle(state.db, user.id, quiz_id).await {
        Ok(quiz) => Ok((StatusCode::OK, Json(ApiResponse::success(quiz))).into_response()),
        // Carry the attempt id so the client can show the existing result
        Err(TakeQuizError::AlreadyAttempted { attempt_id }) => Ok((
            StatusCode::CONFLICT,
            Json(ErrorResponse::with_details(
                "CONFLICT",
                "You have already attempted this quiz",
                json!({ "attempt_id": attempt_id }),
            )),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(skip(state, command), fields(student_id = %user.id, quiz_id = %quiz_id))]
async fn submit_quiz(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(quiz_id): Path<Uuid>,
    Json(command): Json<SubmitQuizCommand>,
) -> Result<Response, AppError> {
    user.require_student()?;
    let response = super::commands::submit::handle(state.db, user.id, quiz_id, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, quiz_id = %quiz_id))]
async fn quiz_results(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(quiz_id): Path<Uuid>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let results = super::queries::results::handle(state.db, user.id, quiz_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(results))).into_response())
}

impl From<CreateQuizError> for AppError {
    fn from(err: CreateQuizError) -> Self {
        match err {
            CreateQuizError::Invalid { .. } => AppError::Validation(err.to_string()),
            CreateQuizError::ClassNotFound => AppError::not_found_or_not_owned("Class"),
            CreateQuizError::SubjectNotFound => AppError::not_found_or_not_owned("Subject"),
            CreateQuizError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ChangeStatusError> for AppError {
    fn from(err: ChangeStatusError) -> Self {
        match err {
            ChangeStatusError::UnknownStatus(_) => AppError::Validation(err.to_string()),
            ChangeStatusError::NotFound => AppError::not_found_or_not_owned("Quiz"),
            ChangeStatusError::IllegalTransition => AppError::Conflict(err.to_string()),
            ChangeStatusError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteQuizError> for AppError {
    fn from(err: DeleteQuizError) -> Self {
        match err {
            DeleteQuizError::NotFound => AppError::not_found_or_not_owned("Quiz"),
            DeleteQuizError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<SubmitQuizError> for AppError {
    fn from(err: SubmitQuizError) -> Self {
        match err {
            SubmitQuizError::NotFound => AppError::NotFound(err.to_string()),
            SubmitQuizError::NotPublished | SubmitQuizError::EmptyQuiz => {
                AppError::Conflict(err.to_string())
            }
            SubmitQuizError::AlreadySubmitted => AppError::Conflict(err.to_string()),
            SubmitQuizError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<TakeQuizError> for AppError {
    fn from(err: TakeQuizError) -> Self {
        match err {
            TakeQuizError::NotFound => AppError::NotFound(err.to_string()),
            TakeQuizError::NotOpen | TakeQuizError::PastDue => AppError::Conflict(err.to_string()),
            TakeQuizError::AlreadyAttempted { .. } => AppError::Conflict(err.to_string()),
            TakeQuizError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListTeacherQuizzesError> for AppError {
    fn from(err: ListTeacherQuizzesError) -> Self {
        match err {
            ListTeacherQuizzesError::UnknownStatus(_) => AppError::Validation(err.to_string()),
            ListTeacherQuizzesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListStudentQuizzesError> for AppError {
    fn from(err: ListStudentQuizzesError) -> Self {
        match err {
            ListStudentQuizzesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<QuizResultsError> for AppError {
    fn from(err: QuizResultsError) -> Self {
        match err {
            QuizResultsError::NotFound => AppError::not_found_or_not_owned("Quiz"),
            QuizResultsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<MyAttemptsError> for AppError {
    fn from(err: MyAttemptsError) -> Self {
        match err {
            MyAttemptsError::Database(e) => AppError::Database(e),
        }
    }
}
