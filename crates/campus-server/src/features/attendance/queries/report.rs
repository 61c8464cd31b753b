//! Class attendance report query (teacher)

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{parse_day, DateValidationError};
use crate::models::display_name_from_json;

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub student_id: Uuid,
    pub student_name: String,
    pub status: String,
    pub remark: Option<String>,
    pub day: NaiveDate,
}

/// Errors that can occur when building a report
#[derive(Debug, thiserror::Error)]
pub enum ClassReportError {
    #[error("{0}")]
    Date(#[from] DateValidationError),

    #[error("Class not found")]
    ClassNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    student_id: Uuid,
    username: String,
    profile: Json<serde_json::Value>,
    status: String,
    remark: Option<String>,
    day: NaiveDate,
}

/// Handler: records for one class and day, with display names
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, class_id = %class_id, date = %date))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
    date: &str,
) -> Result<Vec<ReportEntry>, ClassReportError> {
    let day = parse_day(date)?;

    let owned: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM classes WHERE id = $1 AND teacher_id = $2)",
    )
    .bind(class_id)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await?;
    if !owned {
        return Err(ClassReportError::ClassNotFound);
    }

    let rows = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT a.student_id, u.username, u.profile, a.status, a.remark, a.day
        FROM attendance_records a
        JOIN users u ON u.id = a.student_id
        WHERE a.class_id = $1 AND a.day = $2
        ORDER BY u.username
        "#,
    )
    .bind(class_id)
    .bind(day)
    .fetch_all(&pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| ReportEntry {
            student_id: r.student_id,
            student_name: display_name_from_json(&r.profile.0, &r.username),
            status: r.status,
            remark: r.remark,
            day: r.day,
        })
        .collect())
}
