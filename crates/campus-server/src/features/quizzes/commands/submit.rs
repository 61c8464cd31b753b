//! Submit quiz attempt command
//!
//! The duplicate check at the top is an early exit for the common case;
//! two racing submissions both pass it, and the second one dies on the
//! `(quiz_id, student_id)` unique index instead. Either way exactly one
//! attempt lands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::quizzes::types::{grade, AnswerInput, Question, QuizStatus};

/// Command to submit answers for a quiz
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuizCommand {
    pub answers: Vec<AnswerInput>,
    /// When the student opened the quiz; absent for clients that do not
    /// track it, in which case the attempt starts at submission time.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Client-reported fallback, used only when `start_time` is absent.
    #[serde(default)]
    pub time_taken_seconds: Option<i32>,
}

/// Response after grading: the result only, never the answer key
#[derive(Debug, Clone, Serialize)]
pub struct SubmitQuizResponse {
    pub attempt_id: Uuid,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i32,
}

/// Errors that can occur when submitting an attempt
#[derive(Debug, thiserror::Error)]
pub enum SubmitQuizError {
    #[error("Quiz not found")]
    NotFound,

    #[error("Quiz is not open for submissions")]
    NotPublished,

    #[error("Quiz has no questions")]
    EmptyQuiz,

    #[error("You have already submitted this quiz")]
    AlreadySubmitted,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct QuizForGrading {
    class_id: Uuid,
    subject_id: Uuid,
    teacher_id: Uuid,
    status: String,
    questions: Json<Vec<Question>>,
}

/// Handler function for quiz submission
#[tracing::instrument(skip(pool, command), fields(student_id = %student_id, quiz_id = %quiz_id, answers = command.answers.len()))]
pub async fn handle(
    pool: PgPool,
    student_id: Uuid,
    quiz_id: Uuid,
    command: SubmitQuizCommand,
) -> Result<SubmitQuizResponse, SubmitQuizError> {
    let existing: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM quiz_attempts WHERE quiz_id = $1 AND student_id = $2)",
    )
    .bind(quiz_id)
    .bind(student_id)
    .fetch_one(&pool)
    .await?;
    if existing {
        return Err(SubmitQuizError::AlreadySubmitted);
    }

    let quiz = sqlx::query_as::<_, QuizForGrading>(
        r#"
        SELECT class_id, subject_id, teacher_id, status, questions
        FROM quizzes
        WHERE id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(SubmitQuizError::NotFound)?;

    if QuizStatus::parse(&quiz.status) != Some(QuizStatus::Published) {
        return Err(SubmitQuizError::NotPublished);
    }
    if quiz.questions.0.is_empty() {
        return Err(SubmitQuizError::EmptyQuiz);
    }

    let outcome = grade(&quiz.questions.0, &command.answers);

    let submitted_at = Utc::now();
    let started_at = command.start_time.unwrap_or(submitted_at);
    // Server-derived when the client sent a start time; a start time in
    // the future yields zero rather than a negative duration.
    let time_taken_seconds = command
        .start_time
        .map(|start| {
            (submitted_at - start)
                .num_seconds()
                .clamp(0, i64::from(i32::MAX)) as i32
        })
        .or(command.time_taken_seconds);

    let attempt_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO quiz_attempts
            (quiz_id, student_id, class_id, subject_id, teacher_id,
             answers, score, total_questions, percentage,
             started_at, submitted_at, time_taken_seconds)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind(quiz_id)
    .bind(student_id)
    .bind(quiz.class_id)
    .bind(quiz.subject_id)
    .bind(quiz.teacher_id)
    .bind(Json(&outcome.answers))
    .bind(outcome.score)
    .bind(outcome.total_questions)
    .bind(outcome.percentage)
    .bind(started_at)
    .bind(submitted_at)
    .bind(time_taken_seconds)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if crate::features::shared::is_unique_violation(&e) {
            SubmitQuizError::AlreadySubmitted
        } else {
            SubmitQuizError::Database(e)
        }
    })?;

    tracing::info!(
        attempt_id = %attempt_id,
        score = outcome.score,
        total = outcome.total_questions,
        "Quiz attempt graded"
    );

    Ok(SubmitQuizResponse {
        attempt_id,
        score: outcome.score,
        total_questions: outcome.total_questions,
        percentage: outcome.percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::accounts::types::hash_password;
    use crate::models::{Role, UserProfile};

    async fn seed_user(pool: &PgPool, email: &str, role: Role) -> Uuid {
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
        .bind(Json(UserProfile::empty_for(role)))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_quiz(pool: &PgPool, status: &str) -> (Uuid, Vec<Question>) {
        let teacher = seed_user(pool, "t@example.com", Role::Teacher).await;
        let class_id: Uuid = sqlx::query_scalar(
            "INSERT INTO classes (name, teacher_id) VALUES ('7A', $1) RETURNING id",
        )
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
        let questions = vec![
            Question {
                id: Uuid::new_v4(),
                text: "1+1?".to_string(),
                options: vec!["1".to_string(), "2".to_string()],
                correct_answer_index: 1,
            },
            Question {
                id: Uuid::new_v4(),
                text: "2+2?".to_string(),
                options: vec!["4".to_string(), "5".to_string()],
                correct_answer_index: 0,
            },
        ];
        let quiz_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO quizzes
                (title, class_id, subject_id, subject_name, teacher_id, questions, status, publish_date)
            VALUES ('Quiz', $1, $2, 'Maths', $3, $4, $5, now())
            RETURNING id
            "#,
        )
        .bind(class_id)
        .bind(subject_id)
        .bind(teacher)
        .bind(Json(&questions))
        .bind(status)
        .fetch_one(pool)
        .await
        .unwrap();
        (quiz_id, questions)
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_submit_grades_and_stores(pool: PgPool) {
        let student = seed_user(&pool, "s@example.com", Role::Student).await;
        let (quiz_id, questions) = seed_quiz(&pool, "Published").await;

        let response = handle(
            pool,
            student,
            quiz_id,
            SubmitQuizCommand {
                answers: vec![AnswerInput {
                    question_id: questions[0].id,
                    selected_option_index: 1,
                }],
                start_time: None,
                time_taken_seconds: Some(30),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.score, 1);
        assert_eq!(response.total_questions, 2);
        assert_eq!(response.percentage, 50);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_start_time_recorded_on_attempt(pool: PgPool) {
        use crate::features::quizzes::queries::my_attempts;

        let student = seed_user(&pool, "s@example.com", Role::Student).await;
        let (quiz_id, _) = seed_quiz(&pool, "Published").await;

        // Whole seconds so the value round-trips through timestamptz exactly
        let start = DateTime::<Utc>::from_timestamp(Utc::now().timestamp() - 90, 0).unwrap();
        handle(
            pool.clone(),
            student,
            quiz_id,
            SubmitQuizCommand {
                answers: vec![],
                start_time: Some(start),
                time_taken_seconds: None,
            },
        )
        .await
        .unwrap();

        let attempts = my_attempts::handle(pool, student).await.unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].started_at, start);
        let taken = attempts[0].time_taken_seconds.unwrap();
        assert!(taken >= 90, "time taken derived from the supplied start");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_second_submission_conflicts(pool: PgPool) {
        let student = seed_user(&pool, "s@example.com", Role::Student).await;
        let (quiz_id, _) = seed_quiz(&pool, "Published").await;
        let cmd = SubmitQuizCommand {
            answers: vec![],
            start_time: None,
            time_taken_seconds: None,
        };
        handle(pool.clone(), student, quiz_id, cmd.clone())
            .await
            .unwrap();
        let err = handle(pool, student, quiz_id, cmd).await.unwrap_err();
        assert!(matches!(err, SubmitQuizError::AlreadySubmitted));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_concurrent_submissions_store_one_attempt(pool: PgPool) {
        let student = seed_user(&pool, "s@example.com", Role::Student).await;
        let (quiz_id, _) = seed_quiz(&pool, "Published").await;
        let cmd = SubmitQuizCommand {
            answers: vec![],
            start_time: None,
            time_taken_seconds: None,
        };

        let (a, b) = tokio::join!(
            handle(pool.clone(), student, quiz_id, cmd.clone()),
            handle(pool.clone(), student, quiz_id, cmd),
        );
        assert!(a.is_ok() != b.is_ok(), "exactly one submission must win");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_attempts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_draft_quiz_rejects_submissions(pool: PgPool) {
        let student = seed_user(&pool, "s@example.com", Role::Student).await;
        let (quiz_id, _) = seed_quiz(&pool, "Draft").await;
        let err = handle(
            pool,
            student,
            quiz_id,
            SubmitQuizCommand {
                answers: vec![],
                start_time: None,
                time_taken_seconds: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SubmitQuizError::NotPublished));
    }
}
