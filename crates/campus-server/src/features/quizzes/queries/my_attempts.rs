//! My quiz attempts query (student)
//!
//! Attempts survive quiz deletion, so the quiz title is a LEFT JOIN and
//! may be absent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MyAttempt {
    pub attempt_id: Uuid,
    pub quiz_id: Uuid,
    /// None when the quiz was deleted after the attempt
    pub quiz_title: Option<String>,
    pub subject_name: Option<String>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i32,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
    pub time_taken_seconds: Option<i32>,
}

/// Errors that can occur when listing own attempts
#[derive(Debug, thiserror::Error)]
pub enum MyAttemptsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler: the student's own attempts, newest first
#[tracing::instrument(skip(pool), fields(student_id = %student_id))]
pub async fn handle(pool: PgPool, student_id: Uuid) -> Result<Vec<MyAttempt>, MyAttemptsError> {
    let rows = sqlx::query_as::<_, MyAttempt>(
        r#"
        SELECT a.id AS attempt_id, a.quiz_id, q.title AS quiz_title,
               q.subject_name, a.score, a.total_questions, a.percentage,
               a.started_at, a.submitted_at, a.time_taken_seconds
        FROM quiz_attempts a
        LEFT JOIN quizzes q ON q.id = a.quiz_id
        WHERE a.student_id = $1
        ORDER BY a.submitted_at DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await?;

    Ok(rows)
}
