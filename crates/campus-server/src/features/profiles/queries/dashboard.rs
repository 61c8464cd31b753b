//! Student dashboard summary query
//!
//! One round trip of counts for the student landing page: visible
//! classes, published quizzes not yet attempted, finished attempts, and
//! attendance tallies by status. Class visibility is the same
//! enrollment-or-name-match union the class list uses.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DashboardSummary {
    pub class_count: i64,
    pub pending_quiz_count: i64,
    pub attempt_count: i64,
    pub days_present: i64,
    pub days_absent: i64,
    pub days_late: i64,
}

/// Errors that can occur when building the dashboard summary
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler: aggregate counts for the student's dashboard
#[tracing::instrument(skip(pool), fields(student_id = %student_id))]
pub async fn handle(pool: PgPool, student_id: Uuid) -> Result<DashboardSummary, DashboardError> {
    let summary = sqlx::query_as::<_, DashboardSummary>(
        r#"
        WITH visible_classes AS (
            SELECT c.id
            FROM classes c
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
        )
        SELECT
            (SELECT COUNT(*) FROM visible_classes) AS class_count,
            (SELECT COUNT(*) FROM quizzes q
             WHERE q.status = 'Published'
               AND q.class_id IN (SELECT id FROM visible_classes)
               AND NOT EXISTS (
                   SELECT 1 FROM quiz_attempts a
                   WHERE a.quiz_id = q.id AND a.student_id = $1
               )
            ) AS pending_quiz_count,
            (SELECT COUNT(*) FROM quiz_attempts a
             WHERE a.student_id = $1) AS attempt_count,
            (SELECT COUNT(*) FROM attendance_records r
             WHERE r.student_id = $1 AND r.status = 'present') AS days_present,
            (SELECT COUNT(*) FROM attendance_records r
             WHERE r.student_id = $1 AND r.status = 'absent') AS days_absent,
            (SELECT COUNT(*) FROM attendance_records r
             WHERE r.student_id = $1 AND r.status = 'late') AS days_late
        "#,
    )
    .bind(student_id)
    .fetch_one(&pool)
    .await?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::accounts::types::hash_password;
    use crate::models::{Role, UserProfile};
    use sqlx::types::Json;

    async fn seed_user(pool: &PgPool, email: &str, role: Role, profile: UserProfile) -> Uuid {
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
        .bind(Json(profile))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_dashboard_counts(pool: PgPool) {
        let teacher = seed_user(
            &pool,
            "t@example.com",
            Role::Teacher,
            UserProfile::empty_for(Role::Teacher),
        )
        .await;

        let mut profile = UserProfile::empty_for(Role::Student);
        if let UserProfile::Student(ref mut s) = profile {
            s.requested_class_name = Some("7A".to_string());
        }
        let student = seed_user(&pool, "s@example.com", Role::Student, profile).await;

        // One enrolled class, one name-matched class: both visible
        let enrolled: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, teacher_id) VALUES ('8B', $1) RETURNING id",
        )
        .bind(teacher)
        .fetch_one(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO enrollments (class_id, student_id) VALUES ($1, $2)")
            .bind(enrolled)
            .bind(student)
            .execute(&pool)
            .await
            .unwrap();
        let matched: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, teacher_id) VALUES ('7A', $1) RETURNING id",
        )
        .bind(teacher)
        .fetch_one(&pool)
        .await
        .unwrap();

        let subject: Uuid = sqlx::query_scalar(
            "INSERT INTO subjects (class_id, name) VALUES ($1, 'Maths') RETURNING id",
        )
        .bind(matched)
        .fetch_one(&pool)
        .await
        .unwrap();

        // Two published quizzes, one already attempted; one draft quiz stays out
        async fn seed_quiz(
            pool: &PgPool,
            class_id: Uuid,
            subject_id: Uuid,
            teacher_id: Uuid,
            status: &str,
        ) -> Uuid {
            sqlx::query_scalar(
                r#"
                INSERT INTO quizzes
                    (title, class_id, subject_id, subject_name, teacher_id,
                     questions, status, publish_date)
                VALUES ('Quiz', $1, $2, 'Maths', $3, '[]'::jsonb, $4, now())
                RETURNING id
                "#,
            )
            .bind(class_id)
            .bind(subject_id)
            .bind(teacher_id)
            .bind(status)
            .fetch_one(pool)
            .await
            .unwrap()
        }
        let attempted = seed_quiz(&pool, matched, subject, teacher, "Published").await;
        seed_quiz(&pool, matched, subject, teacher, "Published").await;
        seed_quiz(&pool, matched, subject, teacher, "Draft").await;
        sqlx::query(
            r#"
            INSERT INTO quiz_attempts
                (quiz_id, student_id, class_id, subject_id, teacher_id,
                 answers, score, total_questions, percentage)
            VALUES ($1, $2, $3, $4, $5, '[]'::jsonb, 0, 0, 0)
            "#,
        )
        .bind(attempted)
        .bind(student)
        .bind(matched)
        .bind(subject)
        .bind(teacher)
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            r#"
            INSERT INTO attendance_records (day, class_id, student_id, status, marked_by)
            VALUES ('2026-03-02', $1, $2, 'present', $3),
                   ('2026-03-03', $1, $2, 'late', $3),
                   ('2026-03-04', $1, $2, 'present', $3)
            "#,
        )
        .bind(enrolled)
        .bind(student)
        .bind(teacher)
        .execute(&pool)
        .await
        .unwrap();

        let summary = handle(pool, student).await.unwrap();
        assert_eq!(summary.class_count, 2);
        assert_eq!(summary.pending_quiz_count, 1);
        assert_eq!(summary.attempt_count, 1);
        assert_eq!(summary.days_present, 2);
        assert_eq!(summary.days_absent, 0);
        assert_eq!(summary.days_late, 1);
    }
}
