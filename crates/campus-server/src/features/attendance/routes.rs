//! Attendance API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/attendance/:class_id/sheet?date=YYYY-MM-DD` - Sheet to mark
//! - `POST /api/v1/attendance/:class_id` - Save a day's sheet (upsert)
//! - `GET /api/v1/attendance/:class_id/report?date=YYYY-MM-DD` - Day report
//! - `GET /api/v1/attendance/my-records` - The student's own history

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::response::{ApiResponse, AppError};
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

use super::commands::{SaveAttendanceCommand, SaveAttendanceError};
use super::queries::{AttendanceSheetError, ClassReportError, MyRecordsError};

/// Creates the attendance router
pub fn attendance_routes() -> Router<FeatureState> {
    Router::new()
        .route("/my-records", get(my_records))
        .route("/:class_id", post(save_attendance))
        .route("/:class_id/sheet", get(attendance_sheet))
        .route("/:class_id/report", get(class_report))
}

#[derive(Debug, Deserialize)]
struct DateParam {
    date: String,
}

#[tracing::instrument(skip(state, command), fields(teacher_id = %user.id, class_id = %class_id))]
async fn save_attendance(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
    Json(command): Json<SaveAttendanceCommand>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let response = super::commands::save::handle(state.db, user.id, class_id, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, class_id = %class_id, date = %params.date))]
async fn attendance_sheet(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
    Query(params): Query<DateParam>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let sheet =
        super::queries::sheet::handle(state.db, user.id, class_id, &params.date).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(sheet))).into_response())
}

#[tracing::instrument(skip(state), fields(teacher_id = %user.id, class_id = %class_id, date = %params.date))]
async fn class_report(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
    Query(params): Query<DateParam>,
) -> Result<Response, AppError> {
    user.require_teacher()?;
    let report =
        super::queries::report::handle(state.db, user.id, class_id, &params.date).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(report))).into_response())
}

#[tracing::instrument(skip(state), fields(student_id = %user.id))]
async fn my_records(
    State(state): State<FeatureState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    user.require_student()?;
    let records = super::queries::my_records::handle(state.db, user.id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(records))).into_response())
}

impl From<SaveAttendanceError> for AppError {
    fn from(err: SaveAttendanceError) -> Self {
        match err {
            SaveAttendanceError::Date(_) => AppError::Validation(err.to_string()),
            SaveAttendanceError::ClassNotFound => AppError::not_found_or_not_owned("Class"),
            SaveAttendanceError::NothingValid => AppError::Validation(err.to_string()),
            SaveAttendanceError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AttendanceSheetError> for AppError {
    fn from(err: AttendanceSheetError) -> Self {
        match err {
            AttendanceSheetError::Date(_) => AppError::Validation(err.to_string()),
            AttendanceSheetError::ClassNotFound => AppError::not_found_or_not_owned("Class"),
            AttendanceSheetError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ClassReportError> for AppError {
    fn from(err: ClassReportError) -> Self {
        match err {
            ClassReportError::Date(_) => AppError::Validation(err.to_string()),
            ClassReportError::ClassNotFound => AppError::not_found_or_not_owned("Class"),
            ClassReportError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<MyRecordsError> for AppError {
    fn from(err: MyRecordsError) -> Self {
        match err {
            MyRecordsError::Database(e) => AppError::Database(e),
        }
    }
}
