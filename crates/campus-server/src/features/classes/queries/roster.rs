//! Class roster query (teacher view)
//!
//! The roster a teacher sees is the union of two membership signals:
//! explicit enrollment rows and students whose effective class name
//! (requested class name, falling back to current grade) matches the
//! class's name. Duplicates collapse to one entry, with the explicit
//! signal taking precedence so `explicitly_enrolled` is accurate.
//!
//! Attendance marking deliberately does NOT use this union; it reads from
//! enrollment rows only.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::display_name_from_json;

#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub explicitly_enrolled: bool,
}

/// Errors that can occur when building a roster
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Class not found")]
    ClassNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct RosterRow {
    id: Uuid,
    username: String,
    profile: Json<serde_json::Value>,
    explicitly_enrolled: bool,
}

/// Handler: union roster for an owned class
#[tracing::instrument(skip(pool), fields(teacher_id = %teacher_id, class_id = %class_id))]
pub async fn handle(
    pool: PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
) -> Result<Vec<RosterEntry>, RosterError> {
    let class_name: Option<String> =
        sqlx::query_scalar("SELECT name FROM classes WHERE id = $1 AND teacher_id = $2")
            .bind(class_id)
            .bind(teacher_id)
            .fetch_optional(&pool)
            .await?;
    let class_name = class_name.ok_or(RosterError::ClassNotFound)?;

    // DISTINCT ON keeps one row per student; the enrolled branch sorts
    // first so it wins when a student appears through both signals.
    let rows = sqlx::query_as::<_, RosterRow>(
        r#"
        SELECT DISTINCT ON (u.id)
            u.id, u.username, u.profile, m.explicitly_enrolled
        FROM (
            SELECT e.student_id AS id, TRUE AS explicitly_enrolled
            FROM enrollments e
            WHERE e.class_id = $1
            UNION ALL
            SELECT u2.id, FALSE
            FROM users u2
            WHERE u2.role = 'student'
              AND COALESCE(
                    NULLIF(BTRIM(u2.profile->>'requested_class_name'), ''),
                    u2.profile->>'current_grade'
                  ) = $2
        ) m
        JOIN users u ON u.id = m.id
        ORDER BY u.id, m.explicitly_enrolled DESC
        "#,
    )
    .bind(class_id)
    .bind(&class_name)
    .fetch_all(&pool)
    .await?;

    let mut roster: Vec<RosterEntry> = rows
        .into_iter()
        .map(|r| RosterEntry {
            id: r.id,
            display_name: display_name_from_json(&r.profile.0, &r.username),
            username: r.username,
            explicitly_enrolled: r.explicitly_enrolled,
        })
        .collect();
    roster.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::accounts::types::hash_password;
    use crate::models::{Role, UserProfile};

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

    fn student_profile(requested: Option<&str>) -> UserProfile {
        let mut profile = UserProfile::empty_for(Role::Student);
        if let UserProfile::Student(ref mut s) = profile {
            s.requested_class_name = requested.map(String::from);
        }
        profile
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_roster_unions_and_dedups(pool: PgPool) {
        let teacher = seed_user(
            &pool,
            "t@example.com",
            Role::Teacher,
            UserProfile::empty_for(Role::Teacher),
        )
        .await;
        let class_id: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, teacher_id) VALUES ('7A', $1) RETURNING id",
        )
        .bind(teacher)
        .fetch_one(&pool)
        .await
        .unwrap();

        // Enrolled only
        let enrolled = seed_user(&pool, "e@example.com", Role::Student, student_profile(None)).await;
        // Name-matched only
        let matched =
            seed_user(&pool, "m@example.com", Role::Student, student_profile(Some("7A"))).await;
        // Both signals; must appear once, flagged enrolled
        let both =
            seed_user(&pool, "b@example.com", Role::Student, student_profile(Some("7A"))).await;
        for id in [enrolled, both] {
            sqlx::query("INSERT INTO enrollments (class_id, student_id) VALUES ($1, $2)")
                .bind(class_id)
                .bind(id)
                .execute(&pool)
                .await
                .unwrap();
        }

        let roster = handle(pool, teacher, class_id).await.unwrap();
        assert_eq!(roster.len(), 3);
        let entry = |id: Uuid| roster.iter().find(|e| e.id == id).unwrap();
        assert!(entry(enrolled).explicitly_enrolled);
        assert!(entry(both).explicitly_enrolled);
        assert!(!entry(matched).explicitly_enrolled);
    }
}
