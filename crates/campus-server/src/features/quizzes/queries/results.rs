//! Quiz results query (teacher)
//!
//! Owner-scoped: quiz metadata plus all attempts joined with student
//! display names, newest submission first.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::display_name_from_json;

#[derive(Debug, Clone, Serialize)]
pub struct QuizResults {
    pub quiz_id: Uuid,
    pub title: String,
    pub subject_name: String,
    pub status: String,
    pub question_count: usize,
    pub attempts: Vec<AttemptResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptResult {
    pub attempt_id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i32,
    pub submitted_at: DateTime<Utc>,
    pub time_taken_seconds: Option<i32>,
}

/// Errors that can occur when fetching results
#[derive(Debug, thiserror::Error)]
pub enum QuizResultsError {
    #[error("Quiz not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct QuizHead {
    title: String,
    subject_name: String,
    status: String,
    questions: Json<serde_json::Value>,
}

#[derive(Debug, sqlx::FromRow)]
struct AttemptRow {
    attempt_id: Uuid,
    student_id: Uuid,
    username: String,
    profile: Json<serde_json::Value>,
    score: i32,
    total_questions: i32,
    percentage: i32,
    submitted_at: DateTime<Utc>,
    time_taken_seconds: Option<i32>,
}

/// Handler: results for an owned quiz
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, quiz_id = %quiz_id))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    quiz_id: Uuid,
) -> Result<QuizResults, QuizResultsError> {
    let head = sqlx::query_as::<_, QuizHead>(
        r#"
        SELECT title, subject_name, status, questions
        FROM quizzes
        WHERE id = $1 AND teacher_id = $2
        "#,
    )
    .bind(quiz_id)
    .bind(teacher_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(QuizResultsError::NotFound)?;

    let attempts = sqlx::query_as::<_, AttemptRow>(
        r#"
        SELECT a.id AS attempt_id, a.student_id, u.username, u.profile,
               a.score, a.total_questions, a.percentage,
               a.submitted_at, a.time_taken_seconds
        FROM quiz_attempts a
        JOIN users u ON u.id = a.student_id
        WHERE a.quiz_id = $1
        ORDER BY a.submitted_at DESC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    Ok(QuizResults {
        quiz_id,
        title: head.title,
        subject_name: head.subject_name,
        status: head.status,
        question_count: head
            .questions
            .0
            .as_array()
            .map(|a| a.len())
            .unwrap_or_default(),
        attempts: attempts
            .into_iter()
            .map(|a| AttemptResult {
                attempt_id: a.attempt_id,
                student_id: a.student_id,
                student_name: display_name_from_json(&a.profile.0, &a.username),
                score: a.score,
                total_questions: a.total_questions,
                percentage: a.percentage,
                submitted_at: a.submitted_at,
                time_taken_seconds: a.time_taken_seconds,
            })
            .collect(),
    })
}
