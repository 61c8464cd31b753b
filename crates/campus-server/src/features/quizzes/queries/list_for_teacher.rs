//! List own quizzes query (teacher)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::quizzes::types::Question;

/// Optional filters for the teacher's quiz list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherQuizFilters {
    pub class_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherQuizSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub status: String,
    pub question_count: usize,
    pub attempt_count: i64,
    pub time_limit_minutes: Option<i32>,
    pub publish_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when listing a teacher's quizzes
#[derive(Debug, thiserror::Error)]
pub enum ListTeacherQuizzesError {
    #[error("Unknown status filter '{0}'")]
    UnknownStatus(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct QuizRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    class_id: Uuid,
    subject_id: Uuid,
    subject_name: String,
    status: String,
    questions: Json<Vec<Question>>,
    attempt_count: i64,
    time_limit_minutes: Option<i32>,
    publish_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Handler: list the caller's quizzes, newest first
#[tracing::instrument(skip(pool, filters), fields(teacher_id = %teacher_id))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    filters: TeacherQuizFilters,
) -> Result<Vec<TeacherQuizSummary>, ListTeacherQuizzesError> {
    let status = filters
        .status
        .as_deref()
        .map(|s| {
            crate::features::quizzes::types::QuizStatus::parse(s)
                .ok_or_else(|| ListTeacherQuizzesError::UnknownStatus(s.to_string()))
        })
        .transpose()?;

    let rows = sqlx::query_as::<_, QuizRow>(
        r#"
        SELECT q.id, q.title, q.description, q.class_id, q.subject_id, q.subject_name,
               q.status, q.questions,
               (SELECT COUNT(*) FROM quiz_attempts a WHERE a.quiz_id = q.id) AS attempt_count,
               q.time_limit_minutes, q.publish_date, q.due_date, q.created_at
        FROM quizzes q
        WHERE q.teacher_id = $1
          AND ($2::uuid IS NULL OR q.class_id = $2)
          AND ($3::uuid IS NULL OR q.subject_id = $3)
          AND ($4::text IS NULL OR q.status = $4)
        ORDER BY q.created_at DESC
        "#,
    )
    .bind(teacher_id)
    .bind(filters.class_id)
    .bind(filters.subject_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(&pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| TeacherQuizSummary {
            id: r.id,
            title: r.title,
            description: r.description,
            class_id: r.class_id,
            subject_id: r.subject_id,
            subject_name: r.subject_name,
            status: r.status,
            question_count: r.questions.0.len(),
            attempt_count: r.attempt_count,
            time_limit_minutes: r.time_limit_minutes,
            publish_date: r.publish_date,
            due_date: r.due_date,
            created_at: r.created_at,
        })
        .collect())
}
