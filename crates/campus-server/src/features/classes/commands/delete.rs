//! Delete class command
//!
//! Deletion fans out as ordered, individually idempotent steps: first the
//! enrollment rows, then the class row itself (subjects and their files
//! cascade with the class). A crash between steps leaves a class with an
//! empty roster, which re-running the delete cleans up.

use sqlx::PgPool;
use uuid::Uuid;

/// Errors that can occur when deleting a class
#[derive(Debug, thiserror::Error)]
pub enum DeleteClassError {
    #[error("Class not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for deleting an owned class
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, class_id = %class_id))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
) -> Result<(), DeleteClassError> {
    let owned: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM classes WHERE id = $1 AND teacher_id = $2)",
    )
    .bind(class_id)
    .bind(teacher_id)
    .fetch_one(&pool)
    .await?;
    if !owned {
        return Err(DeleteClassError::NotFound);
    }

    let removed = sqlx::query("DELETE FROM enrollments WHERE class_id = $1")
        .bind(class_id)
        .execute(&pool)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM classes WHERE id = $1 AND teacher_id = $2")
        .bind(class_id)
        .bind(teacher_id)
        .execute(&pool)
        .await?;

    tracing::info!(unenrolled = removed, "Class deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::accounts::types::hash_password;
    use sqlx::types::Json;

    async fn seed_user(pool: &PgPool, email: &str, role: crate::models::Role) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, role, profile)
            VALUES ($1, $1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(hash_password("secret1"))
        .bind(role.as_str())
        .bind(Json(crate::models::UserProfile::empty_for(role)))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_removes_enrollments(pool: PgPool) {
        let teacher = seed_user(&pool, "t@example.com", crate::models::Role::Teacher).await;
        let student = seed_user(&pool, "s@example.com", crate::models::Role::Student).await;
        let class_id: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, teacher_id) VALUES ('7A', $1) RETURNING id",
        )
        .bind(teacher)
        .fetch_one(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO enrollments (class_id, student_id) VALUES ($1, $2)")
            .bind(class_id)
            .bind(student)
            .execute(&pool)
            .await
            .unwrap();

        handle(pool.clone(), teacher, class_id).await.unwrap();

        let enrollments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enrollments, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_foreign_class_is_not_found(pool: PgPool) {
        let owner = seed_user(&pool, "a@example.com", crate::models::Role::Teacher).await;
        let other = seed_user(&pool, "b@example.com", crate::models::Role::Teacher).await;
        let class_id: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, teacher_id) VALUES ('7A', $1) RETURNING id",
        )
        .bind(owner)
        .fetch_one(&pool)
        .await
        .unwrap();

        let err = handle(pool, other, class_id).await.unwrap_err();
        assert!(matches!(err, DeleteClassError::NotFound));
    }
}
