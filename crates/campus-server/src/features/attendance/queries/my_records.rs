//! My attendance query (student)

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MyAttendanceRecord {
    pub day: NaiveDate,
    pub class_id: Uuid,
    pub class_name: String,
    pub status: String,
    pub remark: Option<String>,
}

/// Errors that can occur when listing own records
#[derive(Debug, thiserror::Error)]
pub enum MyRecordsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler: the student's own attendance, newest day first
#[tracing::instrument(skip(pool), fields(student_id = %student_id))]
pub async fn handle(
    pool: PgPool,
    student_id: Uuid,
) -> Result<Vec<MyAttendanceRecord>, MyRecordsError> {
    let rows = sqlx::query_as::<_, MyAttendanceRecord>(
        r#"
        SELECT a.day, a.class_id, c.name AS class_name, a.status, a.remark
        FROM attendance_records a
        JOIN classes c ON c.id = a.class_id
        WHERE a.student_id = $1
        ORDER BY a.day DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await?;

    Ok(rows)
}
