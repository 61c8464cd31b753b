//! Teacher view of an enrolled student's profile
//!
//! A teacher may read a student's profile only when the student is
//! explicitly enrolled in one of the teacher's classes. Name-matched
//! membership is a discovery signal, not an access grant.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::accounts::types::AccountInfo;
use crate::models::{Role, UserProfile};

/// Errors that can occur when a teacher reads a student profile
#[derive(Debug, thiserror::Error)]
pub enum StudentProfileError {
    #[error("Student is not enrolled in any of your classes")]
    NotEnrolled,

    #[error("Student not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct StudentRow {
    id: Uuid,
    username: String,
    email: String,
    profile: Json<UserProfile>,
}

/// Handler: fetch a student's profile for a teacher who has them enrolled
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, student_id = %student_id))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    student_id: Uuid,
) -> Result<AccountInfo, StudentProfileError> {
    let enrolled: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM enrollments e
            JOIN classes c ON c.id = e.class_id
            WHERE e.student_id = $1 AND c.teacher_id = $2
        )
        "#,
    )
    .bind(student_id)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await?;

    if !enrolled {
        return Err(StudentProfileError::NotEnrolled);
    }

    let row = sqlx::query_as::<_, StudentRow>(
        "SELECT id, username, email, profile FROM users WHERE id = $1 AND role = 'student'",
    )
    .bind(student_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(StudentProfileError::NotFound)?;

    Ok(AccountInfo {
        id: row.id,
        username: row.username,
        email: row.email,
        role: Role::Student,
        profile: row.profile.0,
    })
}
