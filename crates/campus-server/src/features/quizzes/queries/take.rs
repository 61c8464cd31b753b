//! Take quiz query
//!
//! Hands the student a strippable view of a quiz that is actually open:
//! Published, past its publish date, and not past its due date. An
//! existing attempt is a conflict that carries the attempt id so clients
//! can jump straight to the result.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::quizzes::types::{Question, QuestionForStudent, QuizStatus};

#[derive(Debug, Clone, Serialize)]
pub struct QuizForTaking {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subject_name: String,
    pub time_limit_minutes: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub questions: Vec<QuestionForStudent>,
}

/// Errors that can occur when opening a quiz to take
#[derive(Debug, thiserror::Error)]
pub enum TakeQuizError {
    #[error("Quiz not found")]
    NotFound,

    #[error("Quiz is not open for submissions")]
    NotOpen,

    #[error("Quiz is past its due date")]
    PastDue,

    #[error("You have already attempted this quiz")]
    AlreadyAttempted { attempt_id: Uuid },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct QuizRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    subject_name: String,
    status: String,
    questions: Json<Vec<Question>>,
    time_limit_minutes: Option<i32>,
    publish_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
}

/// Handler: fetch a quiz for taking, with the answer key stripped
#[tracing::instrument(skip(pool), fields(student_id = %student_id, quiz_id = %quiz_id))]
pub async fn handle(
    pool: PgPool,
    student_id: Uuid,
    quiz_id: Uuid,
) -> Result<QuizForTaking, TakeQuizError> {
    let existing: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM quiz_attempts WHERE quiz_id = $1 AND student_id = $2",
    )
    .bind(quiz_id)
    .bind(student_id)
    .fetch_optional(&pool)
    .await?;
    if let Some(attempt_id) = existing {
        return Err(TakeQuizError::AlreadyAttempted { attempt_id });
    }

    let quiz = sqlx::query_as::<_, QuizRow>(
        r#"
        SELECT id, title, description, subject_name, status, questions,
               time_limit_minutes, publish_date, due_date
        FROM quizzes
        WHERE id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(TakeQuizError::NotFound)?;

    let now = Utc::now();
    let published = QuizStatus::parse(&quiz.status) == Some(QuizStatus::Published);
    let live = quiz.publish_date.map_or(true, |d| d <= now);
    if !published || !live {
        return Err(TakeQuizError::NotOpen);
    }
    if quiz.due_date.is_some_and(|d| d < now) {
        return Err(TakeQuizError::PastDue);
    }

    Ok(QuizForTaking {
        id: quiz.id,
        title: quiz.title,
        description: quiz.description,
        subject_name: quiz.subject_name,
        time_limit_minutes: quiz.time_limit_minutes,
        due_date: quiz.due_date,
        questions: quiz
            .questions
            .0
            .into_iter()
            .map(QuestionForStudent::from)
            .collect(),
    })
}
