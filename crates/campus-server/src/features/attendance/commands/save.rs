//! Save attendance command
//!
//! Bulk upsert for one class and one day. Entries that do not survive
//! scrutiny (unknown status, student not explicitly enrolled) are skipped,
//! not fatal: a sheet with one bad row still lands the good rows. Only a
//! sheet with nothing valid at all is an error.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::features::shared::validation::{parse_day, AttendanceStatus, DateValidationError};

/// One entry in a submitted attendance sheet
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: Uuid,
    pub status: String,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Command to save a class's attendance for one day
#[derive(Debug, Clone, Deserialize)]
pub struct SaveAttendanceCommand {
    pub date: String,
    pub entries: Vec<AttendanceEntry>,
}

/// Response reporting how much of the sheet was applied
#[derive(Debug, Clone, Serialize)]
pub struct SaveAttendanceResponse {
    pub saved: usize,
    pub skipped: usize,
}

/// Errors that can occur when saving attendance
#[derive(Debug, thiserror::Error)]
pub enum SaveAttendanceError {
    #[error("{0}")]
    Date(#[from] DateValidationError),

    #[error("Class not found")]
    ClassNotFound,

    #[error("No valid attendance entries in request")]
    NothingValid,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for saving an attendance sheet
#[tracing::instrument(skip(pool, command), fields(teacher_id = %teacher_id, class_id = %class_id, date = %command.date, entries = command.entries.len()))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
    command: SaveAttendanceCommand,
) -> Result<SaveAttendanceResponse, SaveAttendanceError> {
    let day = parse_day(&command.date)?;

    let owned: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM classes WHERE id = $1 AND teacher_id = $2)",
    )
    .bind(class_id)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await?;
    if !owned {
        return Err(SaveAttendanceError::ClassNotFound);
    }

    // Marking uses explicit enrollment only; a name-matched student who
    // never got enrolled cannot accumulate attendance rows.
    let roster: HashSet<Uuid> =
        sqlx::query_scalar::<_, Uuid>("SELECT student_id FROM enrollments WHERE class_id = $1")
            .bind(class_id)
            .fetch_all(&pool)
            .await?
            .into_iter()
            .collect();

    let mut saved = 0usize;
    let mut skipped = 0usize;

    for entry in &command.entries {
        let Some(status) = AttendanceStatus::parse(&entry.status) else {
            tracing::debug!(student_id = %entry.student_id, status = %entry.status, "Skipping unknown status");
            skipped += 1;
            continue;
        };
        if !roster.contains(&entry.student_id) {
            tracing::debug!(student_id = %entry.student_id, "Skipping non-enrolled student");
            skipped += 1;
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO attendance_records (day, class_id, student_id, status, marked_by, remark)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (day, class_id, student_id)
            DO UPDATE SET status = EXCLUDED.status,
                          marked_by = EXCLUDED.marked_by,
                          remark = EXCLUDED.remark,
                          updated_at = now()
            "#,
        )
        .bind(day)
        .bind(class_id)
        .bind(entry.student_id)
        .bind(status.as_str())
        .bind(teacher_id)
        .bind(&entry.remark)
        .execute(&pool)
        .await?;
        saved += 1;
    }

    if saved == 0 {
        return Err(SaveAttendanceError::NothingValid);
    }

    tracing::info!(saved, skipped, "Attendance saved");
    Ok(SaveAttendanceResponse { saved, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::accounts::types::hash_password;
    use crate::models::{Role, UserProfile};
    use sqlx::types::Json;

    async fn seed_user(pool: &PgPool, email: &str, role: Role) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, role, profile)
            VALUES ($1, $1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(hash_password("secret1"))
        .bind(role.as_str())
        .bind(Json(UserProfile::empty_for(role)))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_class(pool: &PgPool, teacher: Uuid) -> Uuid {
        sqlx::query_scalar("INSERT INTO classes (name, teacher_id) VALUES ('7A', $1) RETURNING id")
            .bind(teacher)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn enroll(pool: &PgPool, class_id: Uuid, student: Uuid) {
        sqlx::query("INSERT INTO enrollments (class_id, student_id) VALUES ($1, $2)")
            .bind(class_id)
            .bind(student)
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_upsert_is_last_write_wins(pool: PgPool) {
        let teacher = seed_user(&pool, "t@example.com", Role::Teacher).await;
        let student = seed_user(&pool, "s@example.com", Role::Student).await;
        let class_id = seed_class(&pool, teacher).await;
        enroll(&pool, class_id, student).await;

        let mark = |status: &str| SaveAttendanceCommand {
            date: "2024-01-10".to_string(),
            entries: vec![AttendanceEntry {
                student_id: student,
                status: status.to_string(),
                remark: None,
            }],
        };
        handle(pool.clone(), teacher, class_id, mark("present"))
            .await
            .unwrap();
        handle(pool.clone(), teacher, class_id, mark("late"))
            .await
            .unwrap();

        let (count, status): (i64, String) = {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance_records")
                .fetch_one(&pool)
                .await
                .unwrap();
            let status: String =
                sqlx::query_scalar("SELECT status FROM attendance_records LIMIT 1")
                    .fetch_one(&pool)
                    .await
                    .unwrap();
            (count, status)
        };
        assert_eq!(count, 1);
        assert_eq!(status, "late");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_invalid_entries_are_skipped_not_fatal(pool: PgPool) {
        let teacher = seed_user(&pool, "t@example.com", Role::Teacher).await;
        let enrolled = seed_user(&pool, "s@example.com", Role::Student).await;
        let stranger = seed_user(&pool, "x@example.com", Role::Student).await;
        let class_id = seed_class(&pool, teacher).await;
        enroll(&pool, class_id, enrolled).await;

        let command = SaveAttendanceCommand {
            date: "2024-01-10".to_string(),
            entries: vec![
                AttendanceEntry {
                    student_id: enrolled,
                    status: "present".to_string(),
                    remark: None,
                },
                AttendanceEntry {
                    student_id: stranger, // not enrolled
                    status: "present".to_string(),
                    remark: None,
                },
                AttendanceEntry {
                    student_id: enrolled,
                    status: "vanished".to_string(), // unknown status
                    remark: None,
                },
            ],
        };
        let response = handle(pool, teacher, class_id, command).await.unwrap();
        assert_eq!(response.saved, 1);
        assert_eq!(response.skipped, 2);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_all_invalid_is_an_error(pool: PgPool) {
        let teacher = seed_user(&pool, "t@example.com", Role::Teacher).await;
        let stranger = seed_user(&pool, "x@example.com", Role::Student).await;
        let class_id = seed_class(&pool, teacher).await;

        let command = SaveAttendanceCommand {
            date: "2024-01-10".to_string(),
            entries: vec![AttendanceEntry {
                student_id: stranger,
                status: "present".to_string(),
                remark: None,
            }],
        };
        let err = handle(pool, teacher, class_id, command).await.unwrap_err();
        assert!(matches!(err, SaveAttendanceError::NothingValid));
    }
}
