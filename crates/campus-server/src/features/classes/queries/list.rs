//! List classes query
//!
//! Teachers see the classes they own. Students see the union of classes
//! they are explicitly enrolled in and classes whose name matches their
//! effective class name, deduplicated by id, so a student who signed up
//! with "7A" discovers every teacher's "7A" without action on either side.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Role;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ClassSummary {
    pub id: Uuid,
    pub name: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub enrolled_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when listing classes
#[derive(Debug, thiserror::Error)]
pub enum ListClassesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

const SUMMARY_COLUMNS: &str = r#"
    c.id, c.name, c.teacher_id,
    COALESCE(
        NULLIF(BTRIM(t.profile->>'full_name'), ''),
        t.username
    ) AS teacher_name,
    (SELECT COUNT(*) FROM enrollments e2 WHERE e2.class_id = c.id) AS enrolled_count,
    c.created_at
"#;

/// Handler: list the classes visible to the caller
#[tracing::instrument(skip(pool), fields(user_id = %user_id, role = %role))]
pub async fn handle(
    pool: PgPool,
    user_id: Uuid,
    role: Role,
) -> Result<Vec<ClassSummary>, ListClassesError> {
    let rows = match role {
        Role::Teacher | Role::Admin => {
            sqlx::query_as::<_, ClassSummary>(&format!(
                r#"
                SELECT {SUMMARY_COLUMNS}
                FROM classes c
                JOIN users t ON t.id = c.teacher_id
                WHERE c.teacher_id = $1
                ORDER BY c.created_at DESC
                "#
            ))
            .bind(user_id)
            .fetch_all(&pool)
            .await?
        }
        Role::Student => {
            sqlx::query_as::<_, ClassSummary>(&format!(
                r#"
                SELECT {SUMMARY_COLUMNS}
                FROM classes c
                JOIN users t ON t.id = c.teacher_id
                WHERE EXISTS (
                    SELECT 1 FROM enrollments e
                    WHERE e.class_id = c.id AND e.student_id = $1
                )
                OR c.name = (
                    SELECT COALESCE(
                        NULLIF(BTRIM(u.profile->>'requested_class_name'), ''),
                        u.profile->>'current_grade'
                    )
                    FROM users u
                    WHERE u.id = $1 AND u.role = 'student'
                )
                ORDER BY c.created_at DESC
                "#
            ))
            .bind(user_id)
            .fetch_all(&pool)
            .await?
        }
    };

    Ok(rows)
}
