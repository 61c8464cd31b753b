//! Subject file commands
//!
//! Attach stores the blob first, then records it; removal deletes the
//! record first, then best-effort unlinks the file. In both directions the
//! record is the commit point and a leaked file is mere garbage.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::storage::Storage;

/// Kind of subject file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Material,
    Syllabus,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Material => "material",
            FileKind::Syllabus => "syllabus",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "material" => Some(FileKind::Material),
            "syllabus" => Some(FileKind::Syllabus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubjectFileResponse {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub kind: String,
    pub original_name: String,
    pub path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Errors that can occur for subject file operations
#[derive(Debug, thiserror::Error)]
pub enum SubjectFileError {
    #[error("Unknown file kind '{0}'; expected material or syllabus")]
    UnknownKind(String),

    #[error("Subject not found")]
    SubjectNotFound,

    #[error("File not found")]
    FileNotFound,

    #[error("{0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// True when the subject belongs to a class owned by the teacher.
async fn subject_owned(
    pool: &PgPool,
    teacher_id: Uuid,
    subject_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM subjects s
            JOIN classes c ON c.id = s.class_id
            WHERE s.id = $1 AND c.teacher_id = $2
        )
        "#,
    )
    .bind(subject_id)
    .bind(teacher_id)
    .fetch_one(pool)
    .await
}

/// Handler: store an uploaded file and attach it to a subject
#[tracing::instrument(skip(pool, storage, data), fields(teacher_id = %teacher_id, subject_id = %subject_id, size = data.len()))]
pub async fn attach(
    pool: PgPool,
    storage: Storage,
    teacher_id: Uuid,
    subject_id: Uuid,
    kind: &str,
    original_name: &str,
    data: &[u8],
) -> Result<SubjectFileResponse, SubjectFileError> {
    let kind = FileKind::parse(kind).ok_or_else(|| SubjectFileError::UnknownKind(kind.into()))?;

    if !subject_owned(&pool, teacher_id, subject_id).await? {
        return Err(SubjectFileError::SubjectNotFound);
    }

    let stored = storage
        .save(teacher_id, original_name, data)
        .await
        .map_err(|e| SubjectFileError::Storage(e.to_string()))?;

    let row = sqlx::query_as::<_, SubjectFileResponse>(
        r#"
        INSERT INTO subject_files (subject_id, kind, original_name, path)
        VALUES ($1, $2, $3, $4)
        RETURNING id, subject_id, kind, original_name, path, uploaded_at
        "#,
    )
    .bind(subject_id)
    .bind(kind.as_str())
    .bind(original_name)
    .bind(&stored.web_path)
    .fetch_one(&pool)
    .await?;

    tracing::info!(file_id = %row.id, path = %row.path, "Subject file attached");
    Ok(row)
}

/// Handler: remove a subject file record, then best-effort unlink the blob
#[tracing::instrument(skip(pool, storage), fields(teacher_id = %teacher_id, file_id = %file_id))]
pub async fn remove(
    pool: PgPool,
    storage: Storage,
    teacher_id: Uuid,
    file_id: Uuid,
) -> Result<(), SubjectFileError> {
    let path: Option<String> = sqlx::query_scalar(
        r#"
        DELETE FROM subject_files f
        USING subjects s, classes c
        WHERE f.id = $1
          AND s.id = f.subject_id
          AND c.id = s.class_id
          AND c.teacher_id = $2
        RETURNING f.path
        "#,
    )
    .bind(file_id)
    .bind(teacher_id)
    .fetch_optional(&pool)
    .await?;

    let path = path.ok_or(SubjectFileError::FileNotFound)?;
    storage.delete(&path).await;

    tracing::info!("Subject file removed");
    Ok(())
}
