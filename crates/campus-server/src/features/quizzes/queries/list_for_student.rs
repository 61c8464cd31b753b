//! List available quizzes query (student)
//!
//! Discovery is by class name: the student's effective class name selects
//! every class with that name, and all Published quizzes across those
//! classes are visible. Two teachers both running "7A" both reach the
//! student. Answer keys are stripped before anything leaves the handler.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::quizzes::types::Question;

#[derive(Debug, Clone, Serialize)]
pub struct StudentQuizSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub class_id: Uuid,
    pub subject_name: String,
    pub question_count: usize,
    pub time_limit_minutes: Option<i32>,
    pub publish_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    /// Set when the student already has an attempt on this quiz
    pub attempt_id: Option<Uuid>,
}

/// Errors that can occur when listing quizzes for a student
#[derive(Debug, thiserror::Error)]
pub enum ListStudentQuizzesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct QuizRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    class_id: Uuid,
    subject_name: String,
    questions: Json<Vec<Question>>,
    time_limit_minutes: Option<i32>,
    publish_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    attempt_id: Option<Uuid>,
}

/// Handler: all Published quizzes visible to the student
///
/// Visibility is the union of explicit enrollment and class-name match,
/// same as the class list.
#[tracing::instrument(skip(pool), fields(student_id = %student_id))]
pub async fn handle(
    pool: PgPool,
    student_id: Uuid,
) -> Result<Vec<StudentQuizSummary>, ListStudentQuizzesError> {
    let rows = sqlx::query_as::<_, QuizRow>(
        r#"
        SELECT q.id, q.title, q.description, q.class_id, q.subject_name, q.questions,
               q.time_limit_minutes, q.publish_date, q.due_date,
               a.id AS attempt_id
        FROM quizzes q
        JOIN classes c ON c.id = q.class_id
        LEFT JOIN quiz_attempts a ON a.quiz_id = q.id AND a.student_id = $1
        WHERE q.status = 'Published'
          AND (
            EXISTS (
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
          )
        ORDER BY q.publish_date DESC NULLS LAST, q.created_at DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| StudentQuizSummary {
            id: r.id,
            title: r.title,
            description: r.description,
            class_id: r.class_id,
            subject_name: r.subject_name,
            question_count: r.questions.0.len(),
            time_limit_minutes: r.time_limit_minutes,
            publish_date: r.publish_date,
            due_date: r.due_date,
            attempt_id: r.attempt_id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::accounts::types::hash_password;
    use crate::models::{Role, UserProfile};

    async fn seed_teacher(pool: &PgPool, email: &str) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, role, profile)
            VALUES ($1, $1, $2, 'teacher', $3)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(hash_password("secret1"))
        .bind(Json(UserProfile::empty_for(Role::Teacher)))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_class_with_quiz(pool: &PgPool, teacher: Uuid, name: &str, status: &str) -> Uuid {
        let class_id: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, teacher_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
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
        sqlx::query(
            r#"
            INSERT INTO quizzes
                (title, class_id, subject_id, subject_name, teacher_id, questions, status, publish_date)
            VALUES ('Quiz', $1, $2, 'Maths', $3, '[]'::jsonb, $4, now())
            "#,
        )
        .bind(class_id)
        .bind(subject_id)
        .bind(teacher)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
        class_id
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_name_match_spans_same_named_classes(pool: PgPool) {
        let t1 = seed_teacher(&pool, "t1@example.com").await;
        let t2 = seed_teacher(&pool, "t2@example.com").await;
        seed_class_with_quiz(&pool, t1, "7A", "Published").await;
        seed_class_with_quiz(&pool, t2, "7A", "Published").await;
        seed_class_with_quiz(&pool, t1, "8B", "Published").await;
        // Draft quizzes in a matching class stay hidden
        seed_class_with_quiz(&pool, t2, "7A-extra", "Draft").await;

        let mut profile = UserProfile::empty_for(Role::Student);
        if let UserProfile::Student(ref mut s) = profile {
            s.requested_class_name = Some("7A".to_string());
        }
        let student: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, role, profile)
            VALUES ('s', 's@example.com', $1, 'student', $2)
            RETURNING id
            "#,
        )
        .bind(hash_password("secret1"))
        .bind(Json(profile))
        .fetch_one(&pool)
        .await
        .unwrap();

        let quizzes = handle(pool, student).await.unwrap();
        assert_eq!(quizzes.len(), 2, "one quiz per same-named 7A class");
    }
}
