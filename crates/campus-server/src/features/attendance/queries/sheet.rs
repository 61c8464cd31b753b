//! Attendance sheet query (teacher)
//!
//! The sheet to mark from: the class's explicit-enrollment roster plus a
//! status map for the requested day. A student without a row that day is
//! simply absent from the map; the client renders them unmarked.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::features::shared::validation::{parse_day, DateValidationError};
use crate::models::display_name_from_json;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSheet {
    pub class_id: Uuid,
    pub date: String,
    pub roster: Vec<SheetStudent>,
    /// student id -> marked status; unmarked students are absent here
    pub statuses: HashMap<Uuid, MarkedStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetStudent {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkedStatus {
    pub status: String,
    pub remark: Option<String>,
}

/// Errors that can occur when fetching a sheet
#[derive(Debug, thiserror::Error)]
pub enum AttendanceSheetError {
    #[error("{0}")]
    Date(#[from] DateValidationError),

    #[error("Class not found")]
    ClassNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct RosterRow {
    id: Uuid,
    username: String,
    profile: Json<serde_json::Value>,
}

#[derive(Debug, sqlx::FromRow)]
struct StatusRow {
    student_id: Uuid,
    status: String,
    remark: Option<String>,
}

/// Handler: roster plus status map for one day
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, class_id = %class_id, date = %date))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
    date: &str,
) -> Result<AttendanceSheet, AttendanceSheetError> {
    let day = parse_day(date)?;

    let owned: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM classes WHERE id = $1 AND teacher_id = $2)",
    )
    .bind(class_id)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await?;
    if !owned {
        return Err(AttendanceSheetError::ClassNotFound);
    }

    let roster_rows = sqlx::query_as::<_, RosterRow>(
        r#"
        SELECT u.id, u.username, u.profile
        FROM enrollments e
        JOIN users u ON u.id = e.student_id
        WHERE e.class_id = $1
        "#,
    )
    .bind(class_id)
    .fetch_all(&pool)
    .await?;

    let status_rows = sqlx::query_as::<_, StatusRow>(
        r#"
        SELECT student_id, status, remark
        FROM attendance_records
        WHERE class_id = $1 AND day = $2
        "#,
    )
    .bind(class_id)
    .bind(day)
    .fetch_all(&pool)
    .await?;

    let mut roster: Vec<SheetStudent> = roster_rows
        .into_iter()
        .map(|r| SheetStudent {
            id: r.id,
            display_name: display_name_from_json(&r.profile.0, &r.username),
            username: r.username,
        })
        .collect();
    roster.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    let statuses = status_rows
        .into_iter()
        .map(|r| {
            (
                r.student_id,
                MarkedStatus {
                    status: r.status,
                    remark: r.remark,
                },
            )
        })
        .collect();

    Ok(AttendanceSheet {
        class_id,
        date: day.format("%Y-%m-%d").to_string(),
        roster,
        statuses,
    })
}
