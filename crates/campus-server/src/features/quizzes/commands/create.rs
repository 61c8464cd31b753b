//! Create quiz command
//!
//! Validation is wholesale: every violation across the title, the
//! questions, and per-question fields is collected and reported in one
//! response, so a teacher fixes the full list in one round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::quizzes::types::{Question, QuizStatus};

/// Question payload at creation; ids are assigned server-side
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionInput {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

/// Command to create a quiz
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuizCommand {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub questions: Vec<QuestionInput>,
    #[serde(default)]
    pub time_limit_minutes: Option<i32>,
    /// Requested initial status; anything other than Draft or Published
    /// (including Closed) is coerced to Draft.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub status: String,
    pub question_count: usize,
    pub time_limit_minutes: Option<i32>,
    pub publish_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating a quiz
#[derive(Debug, thiserror::Error)]
pub enum CreateQuizError {
    /// All collected violations, joined for the response body
    #[error("{}", violations.join("; "))]
    Invalid { violations: Vec<String> },

    #[error("Class not found")]
    ClassNotFound,

    #[error("Subject not found in this class")]
    SubjectNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateQuizCommand {
    /// Resolve the effective initial status.
    pub fn effective_status(&self) -> QuizStatus {
        match self.status.as_deref().and_then(QuizStatus::parse) {
            Some(QuizStatus::Published) => QuizStatus::Published,
            _ => QuizStatus::Draft,
        }
    }

    /// Collect every validation violation instead of stopping at the first.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.title.trim().is_empty() {
            violations.push("Title is required".to_string());
        }
        if self.questions.is_empty() {
            violations.push("At least one question is required".to_string());
        }
        if let Some(limit) = self.time_limit_minutes {
            if limit <= 0 {
                violations.push("Time limit must be positive".to_string());
            }
        }

        for (i, q) in self.questions.iter().enumerate() {
            let n = i + 1;
            if q.text.trim().is_empty() {
                violations.push(format!("Question {n}: text is required"));
            }
            if q.options.len() < 2 {
                violations.push(format!("Question {n}: at least two options are required"));
            }
            if q.options.iter().any(|o| o.trim().is_empty()) {
                violations.push(format!("Question {n}: options cannot be blank"));
            }
            if q.correct_answer_index >= q.options.len() {
                violations.push(format!(
                    "Question {n}: correct answer index {} is out of range",
                    q.correct_answer_index
                ));
            }
        }

        violations
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InsertedQuiz {
    id: Uuid,
    publish_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Handler function for creating a quiz
#[tracing::instrument(skip(pool, command), fields(teacher_id = %teacher_id, title = %command.title))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    command: CreateQuizCommand,
) -> Result<QuizResponse, CreateQuizError> {
    let violations = command.violations();
    if !violations.is_empty() {
        return Err(CreateQuizError::Invalid { violations });
    }

    let owned: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM classes WHERE id = $1 AND teacher_id = $2)",
    )
    .bind(command.class_id)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await?;
    if !owned {
        return Err(CreateQuizError::ClassNotFound);
    }

    let subject_name: Option<String> =
        sqlx::query_scalar("SELECT name FROM subjects WHERE id = $1 AND class_id = $2")
            .bind(command.subject_id)
            .bind(command.class_id)
            .fetch_optional(&pool)
            .await?;
    let subject_name = subject_name.ok_or(CreateQuizError::SubjectNotFound)?;

    let status = command.effective_status();
    let publish_date = (status == QuizStatus::Published).then(Utc::now);

    let questions: Vec<Question> = command
        .questions
        .iter()
        .map(|q| Question {
            id: Uuid::new_v4(),
            text: q.text.trim().to_string(),
            options: q.options.iter().map(|o| o.trim().to_string()).collect(),
            correct_answer_index: q.correct_answer_index,
        })
        .collect();

    let title = command.title.trim().to_string();
    let row = sqlx::query_as::<_, InsertedQuiz>(
        r#"
        INSERT INTO quizzes
            (title, description, class_id, subject_id, subject_name, teacher_id,
             questions, time_limit_minutes, status, publish_date, due_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, publish_date, created_at
        "#,
    )
    .bind(&title)
    .bind(&command.description)
    .bind(command.class_id)
    .bind(command.subject_id)
    .bind(&subject_name)
    .bind(teacher_id)
    .bind(Json(&questions))
    .bind(command.time_limit_minutes)
    .bind(status.as_str())
    .bind(publish_date)
    .bind(command.due_date)
    .fetch_one(&pool)
    .await?;

    tracing::info!(quiz_id = %row.id, status = status.as_str(), "Quiz created");

    Ok(QuizResponse {
        id: row.id,
        title,
        description: command.description,
        class_id: command.class_id,
        subject_id: command.subject_id,
        subject_name,
        status: status.as_str().to_string(),
        question_count: questions.len(),
        time_limit_minutes: command.time_limit_minutes,
        publish_date: row.publish_date,
        due_date: command.due_date,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> CreateQuizCommand {
        CreateQuizCommand {
            title: "Fractions".to_string(),
            description: None,
            class_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            questions: vec![QuestionInput {
                text: "1/2 + 1/2?".to_string(),
                options: vec!["1".to_string(), "2".to_string()],
                correct_answer_index: 0,
            }],
            time_limit_minutes: Some(10),
            status: None,
            due_date: None,
        }
    }

    #[test]
    fn test_violations_are_collected_wholesale() {
        let mut cmd = base_command();
        cmd.title = "  ".to_string();
        cmd.questions = vec![QuestionInput {
            text: "".to_string(),
            options: vec!["only one".to_string()],
            correct_answer_index: 5,
        }];
        let violations = cmd.violations();
        assert_eq!(violations.len(), 4, "{violations:?}");
    }

    #[test]
    fn test_status_coercion() {
        let mut cmd = base_command();
        assert_eq!(cmd.effective_status(), QuizStatus::Draft);
        cmd.status = Some("Published".to_string());
        assert_eq!(cmd.effective_status(), QuizStatus::Published);
        cmd.status = Some("Closed".to_string());
        assert_eq!(cmd.effective_status(), QuizStatus::Draft);
        cmd.status = Some("garbage".to_string());
        assert_eq!(cmd.effective_status(), QuizStatus::Draft);
    }

    #[test]
    fn test_valid_command_has_no_violations() {
        assert!(base_command().violations().is_empty());
    }
}
