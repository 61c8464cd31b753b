//! Add subject command

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{validate_name, NameValidationError};

/// Command to add a subject to an owned class
#[derive(Debug, Clone, Deserialize)]
pub struct AddSubjectCommand {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubjectResponse {
    pub id: Uuid,
    pub class_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when adding a subject
#[derive(Debug, thiserror::Error)]
pub enum AddSubjectError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Class not found")]
    ClassNotFound,

    #[error("Subject '{0}' already exists in this class")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for adding a subject
///
/// Per-class subject names dedup case-insensitively. The check is
/// check-then-act rather than a constraint; a lost race leaves a duplicate
/// row, which the soft-uniqueness contract tolerates.
#[tracing::instrument(skip(pool, command), fields(teacher_id = %teacher_id, class_id = %class_id, name = %command.name))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
    command: AddSubjectCommand,
) -> Result<SubjectResponse, AddSubjectError> {
    let name = validate_name(&command.name, "Subject name", 100)?;

    let owned: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM classes WHERE id = $1 AND teacher_id = $2)",
    )
    .bind(class_id)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await?;
    if !owned {
        return Err(AddSubjectError::ClassNotFound);
    }

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM subjects WHERE class_id = $1 AND lower(name) = lower($2))",
    )
    .bind(class_id)
    .bind(&name)
    .fetch_one(&pool)
    .await?;
    if exists {
        return Err(AddSubjectError::Duplicate(name));
    }

    let row = sqlx::query_as::<_, SubjectResponse>(
        r#"
        INSERT INTO subjects (class_id, name)
        VALUES ($1, $2)
        RETURNING id, class_id, name, created_at
        "#,
    )
    .bind(class_id)
    .bind(&name)
    .fetch_one(&pool)
    .await?;

    tracing::info!(subject_id = %row.id, "Subject added");
    Ok(row)
}
