//! Enrollment commands
//!
//! A single enrollment row realizes class membership from both sides.
//! Enrolling twice is a no-op, and unenrolling a non-member succeeds,
//! so both operations are safe to retry.

use sqlx::PgPool;
use uuid::Uuid;

/// Errors that can occur for enrollment changes
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("Class not found")]
    ClassNotFound,

    #[error("Student not found")]
    StudentNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

async fn owned_class_exists(
    pool: &PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM classes WHERE id = $1 AND teacher_id = $2)")
        .bind(class_id)
        .bind(teacher_id)
        .fetch_one(pool)
        .await
}

/// Handler: enroll a student into an owned class
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, class_id = %class_id, student_id = %student_id))]
pub async fn enroll(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
    student_id: Uuid,
) -> Result<(), EnrollmentError> {
    if !owned_class_exists(&pool, teacher_id, class_id).await? {
        return Err(EnrollmentError::ClassNotFound);
    }

    let is_student: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1 AND role = 'student')",
    )
    .bind(student_id)
    .fetch_one(&pool)
    .await?;
    if !is_student {
        return Err(EnrollmentError::StudentNotFound);
    }

    sqlx::query(
        r#"
        INSERT INTO enrollments (class_id, student_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(class_id)
    .bind(student_id)
    .execute(&pool)
    .await?;

    tracing::info!("Student enrolled");
    Ok(())
}

/// Handler: remove a student from an owned class. Removing a non-member
/// is a success, matching enroll's idempotence.
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, class_id = %class_id, student_id = %student_id))]
pub async fn unenroll(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
    student_id: Uuid,
) -> Result<(), EnrollmentError> {
    if !owned_class_exists(&pool, teacher_id, class_id).await? {
        return Err(EnrollmentError::ClassNotFound);
    }

    sqlx::query("DELETE FROM enrollments WHERE class_id = $1 AND student_id = $2")
        .bind(class_id)
        .bind(student_id)
        .execute(&pool)
        .await?;

    tracing::info!("Student unenrolled");
    Ok(())
}
