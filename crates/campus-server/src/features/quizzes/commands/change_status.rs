//! Change quiz status command
//!
//! The one illegal move is Closed → Published; everything else, including
//! same-state updates, goes through. Entering Published keeps the first
//! publish date via COALESCE, so re-publishing after a draft detour does
//! not rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::quizzes::types::QuizStatus;

/// Command to move a quiz to a new lifecycle status
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusCommand {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChangeStatusResponse {
    pub id: Uuid,
    pub status: String,
    pub publish_date: Option<DateTime<Utc>>,
}

/// Errors that can occur when changing quiz status
#[derive(Debug, thiserror::Error)]
pub enum ChangeStatusError {
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),

    #[error("Quiz not found")]
    NotFound,

    #[error("A closed quiz cannot be published; move it to Draft first")]
    IllegalTransition,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for status changes
#[tracing::instrument(skip(pool, command), fields(teacher_id = %teacher_id, quiz_id = %quiz_id, target = %command.status))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    quiz_id: Uuid,
    command: ChangeStatusCommand,
) -> Result<ChangeStatusResponse, ChangeStatusError> {
    let target = QuizStatus::parse(&command.status)
        .ok_or_else(|| ChangeStatusError::UnknownStatus(command.status.clone()))?;

    let current: Option<String> =
        sqlx::query_scalar("SELECT status FROM quizzes WHERE id = $1 AND teacher_id = $2")
            .bind(quiz_id)
            .bind(teacher_id)
            .fetch_optional(&pool)
            .await?;
    let current = current
        .as_deref()
        .and_then(QuizStatus::parse)
        .ok_or(ChangeStatusError::NotFound)?;

    if !current.can_transition_to(target) {
        return Err(ChangeStatusError::IllegalTransition);
    }

    let row = sqlx::query_as::<_, ChangeStatusResponse>(
        r#"
        UPDATE quizzes
        SET status = $1,
            publish_date = CASE
                WHEN $1 = 'Published' THEN COALESCE(publish_date, now())
                ELSE publish_date
            END,
            updated_at = now()
        WHERE id = $2 AND teacher_id = $3
        RETURNING id, status, publish_date
        "#,
    )
    .bind(target.as_str())
    .bind(quiz_id)
    .bind(teacher_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(ChangeStatusError::NotFound)?;

    tracing::info!(from = current.as_str(), to = target.as_str(), "Quiz status changed");
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::accounts::types::hash_password;
    use sqlx::types::Json;

    async fn seed_quiz(pool: &PgPool, status: &str) -> (Uuid, Uuid) {
        let teacher: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, role, profile)
            VALUES ('t', 't@example.com', $1, 'teacher', $2)
            RETURNING id
            "#,
        )
        .bind(hash_password("secret1"))
        .bind(Json(crate::models::UserProfile::empty_for(
            crate::models::Role::Teacher,
        )))
        .fetch_one(pool)
        .await
        .unwrap();
        let class_id: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, teacher_id) VALUES ('7A', $1) RETURNING id",
        )
        .bind(teacher)
        .fetch_one(pool)
        .await
        .unwrap();
        let subject_id: Uuid = sqlx::query_scalar(
            "INSERT INTO subjects (class_id, name) VALUES ($1, 'Maths') RETURNING id",
        )
        .bind(class_id)
        .fetch_one(pool)
        .await
        .unwrap();
        let quiz_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO quizzes
                (title, class_id, subject_id, subject_name, teacher_id, questions, status)
            VALUES ('Quiz', $1, $2, 'Maths', $3, '[]'::jsonb, $4)
            RETURNING id
            "#,
        )
        .bind(class_id)
        .bind(subject_id)
        .bind(teacher)
        .bind(status)
        .fetch_one(pool)
        .await
        .unwrap();
        (teacher, quiz_id)
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_publish_is_idempotent_about_publish_date(pool: PgPool) {
        let (teacher, quiz_id) = seed_quiz(&pool, "Draft").await;
        let cmd = ChangeStatusCommand {
            status: "Published".to_string(),
        };
        let first = handle(pool.clone(), teacher, quiz_id, cmd.clone())
            .await
            .unwrap();
        let first_date = first.publish_date.unwrap();

        // Draft detour, then publish again: the original date survives
        handle(
            pool.clone(),
            teacher,
            quiz_id,
            ChangeStatusCommand {
                status: "Draft".to_string(),
            },
        )
        .await
        .unwrap();
        let second = handle(pool, teacher, quiz_id, cmd).await.unwrap();
        assert_eq!(second.publish_date.unwrap(), first_date);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_closed_to_published_is_rejected(pool: PgPool) {
        let (teacher, quiz_id) = seed_quiz(&pool, "Closed").await;
        let err = handle(
            pool,
            teacher,
            quiz_id,
            ChangeStatusCommand {
                status: "Published".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ChangeStatusError::IllegalTransition));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_closed_to_draft_is_allowed(pool: PgPool) {
        let (teacher, quiz_id) = seed_quiz(&pool, "Closed").await;
        let response = handle(
            pool,
            teacher,
            quiz_id,
            ChangeStatusCommand {
                status: "Draft".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(response.status, "Draft");
    }
}
