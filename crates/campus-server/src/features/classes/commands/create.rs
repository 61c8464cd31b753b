//! Create class command
//!
//! Per-teacher class names are unique; the database constraint is the
//! arbiter so concurrent creates cannot race past a pre-check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{validate_name, NameValidationError};

/// Command to create a class
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassCommand {
    pub name: String,
}

/// Response from creating a class
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ClassResponse {
    pub id: Uuid,
    pub name: String,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating a class
#[derive(Debug, thiserror::Error)]
pub enum CreateClassError {
    #[error("{0}")]
    NameValidation(#[from] NameValidationError),

    #[error("You already have a class named '{0}'")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for creating a class
#[tracing::instrument(skip(pool, command), fields(teacher_id = %teacher_id, name = %command.name))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    command: CreateClassCommand,
) -> Result<ClassResponse, CreateClassError> {
    let name = validate_name(&command.name, "Class name", 100)?;

    let row = sqlx::query_as::<_, ClassResponse>(
        r#"
        INSERT INTO classes (name, teacher_id)
        VALUES ($1, $2)
        RETURNING id, name, teacher_id, created_at
        "#,
    )
    .bind(&name)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if crate::features::shared::is_unique_violation(&e) {
            CreateClassError::DuplicateName(name.clone())
        } else {
            CreateClassError::Database(e)
        }
    })?;

    tracing::info!(class_id = %row.id, "Class created");
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::accounts::types::hash_password;
    use sqlx::types::Json;

    async fn seed_teacher(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
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
        .unwrap()
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_class(pool: PgPool) {
        let teacher = seed_teacher(&pool).await;
        let created = handle(
            pool,
            teacher,
            CreateClassCommand {
                name: "  7A ".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.name, "7A");
        assert_eq!(created.teacher_id, teacher);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_duplicate_name_for_same_teacher_conflicts(pool: PgPool) {
        let teacher = seed_teacher(&pool).await;
        let cmd = CreateClassCommand {
            name: "7A".to_string(),
        };
        handle(pool.clone(), teacher, cmd.clone()).await.unwrap();
        let err = handle(pool, teacher, cmd).await.unwrap_err();
        assert!(matches!(err, CreateClassError::DuplicateName(_)));
    }
}
