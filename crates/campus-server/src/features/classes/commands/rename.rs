//! Rename class command

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{validate_name, NameValidationError};

use super::create::ClassResponse;

/// Command to rename an owned class
#[derive(Debug, Clone, Deserialize)]
pub struct RenameClassCommand {
    pub name: String,
}

/// Errors that can occur when renaming a class
#[derive(Debug, thiserror::Error)]
pub enum RenameClassError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Class not found")]
    NotFound,

    #[error("You already have a class named '{0}'")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for renaming a class. The WHERE clause carries the
/// ownership check, so a foreign class renders as not-found.
#[tracing::instrument(skip(pool, command), fields(teacher_id = %teacher_id, class_id = %class_id))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
    command: RenameClassCommand,
) -> Result<ClassResponse, RenameClassError> {
    let name = validate_name(&command.name, "Class name", 100)?;

    let row = sqlx::query_as::<_, ClassResponse>(
        r#"
        UPDATE classes
        SET name = $1, updated_at = now()
        WHERE id = $2 AND teacher_id = $3
        RETURNING id, name, teacher_id, created_at
        "#,
    )
    .bind(&name)
    .bind(class_id)
    .bind(teacher_id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        if crate::features::shared::is_unique_violation(&e) {
            RenameClassError::DuplicateName(name.clone())
        } else {
            RenameClassError::Database(e)
        }
    })?
    .ok_or(RenameClassError::NotFound)?;

    tracing::info!(class_id = %row.id, "Class renamed");
    Ok(row)
}
