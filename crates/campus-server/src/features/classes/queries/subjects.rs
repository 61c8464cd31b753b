//! List subjects query
//!
//! Subjects for a class with their attached files grouped in.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct SubjectWithFiles {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub files: Vec<FileInfo>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FileInfo {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub kind: String,
    pub original_name: String,
    pub path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Errors that can occur when listing subjects
#[derive(Debug, thiserror::Error)]
pub enum ListSubjectsError {
    #[error("Class not found")]
    ClassNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct SubjectRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

/// Handler: subjects and files for a class
///
/// Readable by the owning teacher and by any member of the class, so
/// enrolled students can reach materials. Non-members get not-found.
#[tracing::instrument(skip(pool), fields(user_id = %user_id, class_id = %class_id))]
pub async fn handle(
    pool: PgPool,
    user_id: Uuid,
    class_id: Uuid,
) -> Result<Vec<SubjectWithFiles>, ListSubjectsError> {
    let visible: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM classes c
            WHERE c.id = $1
              AND (
                c.teacher_id = $2
                OR EXISTS (
                    SELECT 1 FROM enrollments e
                    WHERE e.class_id = c.id AND e.student_id = $2
                )
                OR c.name = (
                    SELECT COALESCE(
                        NULLIF(BTRIM(u.profile->>'requested_class_name'), ''),
                        u.profile->>'current_grade'
                    )
                    FROM users u
                    WHERE u.id = $2 AND u.role = 'student'
                )
              )
        )
        "#,
    )
    .bind(class_id)
    .bind(user_id)
    .fetch_one(&pool)
    .await?;
    if !visible {
        return Err(ListSubjectsError::ClassNotFound);
    }

    let subjects = sqlx::query_as::<_, SubjectRow>(
        "SELECT id, name, created_at FROM subjects WHERE class_id = $1 ORDER BY created_at",
    )
    .bind(class_id)
    .fetch_all(&pool)
    .await?;

    let files = sqlx::query_as::<_, FileInfo>(
        r#"
        SELECT f.id, f.subject_id, f.kind, f.original_name, f.path, f.uploaded_at
        FROM subject_files f
        JOIN subjects s ON s.id = f.subject_id
        WHERE s.class_id = $1
        ORDER BY f.uploaded_at
        "#,
    )
    .bind(class_id)
    .fetch_all(&pool)
    .await?;

    let mut result: Vec<SubjectWithFiles> = subjects
        .into_iter()
        .map(|s| SubjectWithFiles {
            id: s.id,
            name: s.name,
            created_at: s.created_at,
            files: Vec::new(),
        })
        .collect();
    for file in files {
        if let Some(subject) = result.iter_mut().find(|s| s.id == file.subject_id) {
            subject.files.push(file);
        }
    }

    Ok(result)
}
