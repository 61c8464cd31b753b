//! Delete quiz command
//!
//! Attempts are deliberately retained: a student's grade history outlives
//! the quiz that produced it, which is why `quiz_attempts.quiz_id` carries
//! no foreign key.

use sqlx::PgPool;
use uuid::Uuid;

/// Errors that can occur when deleting a quiz
#[derive(Debug, thiserror::Error)]
pub enum DeleteQuizError {
    #[error("Quiz not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for deleting an owned quiz
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, quiz_id = %quiz_id))]
pub async fn handle(pool: PgPool, teacher_id: Uuid, quiz_id: Uuid) -> Result<(), DeleteQuizError> {
    let affected = sqlx::query("DELETE FROM quizzes WHERE id = $1 AND teacher_id = $2")
        .bind(quiz_id)
        .bind(teacher_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(DeleteQuizError::NotFound);
    }

    tracing::info!("Quiz deleted; attempts retained");
    Ok(())
}
