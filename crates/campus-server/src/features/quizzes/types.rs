//! Quiz domain types, lifecycle rules, and grading
//!
//! Grading is a pure function over the authoritative answer key; handlers
//! feed it data and persist its output, nothing more.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A quiz question as stored, including the answer key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

/// A question as sent to students: the key is stripped
#[derive(Debug, Clone, Serialize)]
pub struct QuestionForStudent {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
}

impl From<Question> for QuestionForStudent {
    fn from(q: Question) -> Self {
        QuestionForStudent {
            id: q.id,
            text: q.text,
            options: q.options,
        }
    }
}

/// One submitted answer, before grading
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_id: Uuid,
    pub selected_option_index: usize,
}

/// One graded answer, as persisted with the attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: Uuid,
    pub selected_option_index: usize,
    pub is_correct: bool,
}

/// Quiz lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizStatus {
    Draft,
    Published,
    Closed,
}

impl QuizStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizStatus::Draft => "Draft",
            QuizStatus::Published => "Published",
            QuizStatus::Closed => "Closed",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "Draft" => Some(QuizStatus::Draft),
            "Published" => Some(QuizStatus::Published),
            "Closed" => Some(QuizStatus::Closed),
            _ => None,
        }
    }

    /// Whether a transition from `self` to `target` is legal.
    ///
    /// A closed quiz can be pulled back to draft for rework, but never
    /// straight back to published: students must not see a quiz reopen
    /// without the teacher deliberately re-editing it. Same-state
    /// transitions are allowed so status updates are retry-safe.
    pub fn can_transition_to(&self, target: QuizStatus) -> bool {
        !matches!((self, target), (QuizStatus::Closed, QuizStatus::Published))
    }
}

/// Result of grading one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeOutcome {
    /// Graded answers that matched a real question; malformed entries are
    /// dropped, not stored.
    pub answers: Vec<Answer>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i32,
}

/// Grade a submission against the quiz's questions.
///
/// - An answer whose `question_id` matches no question is dropped.
/// - An answer whose selected index is outside the question's options is
///   dropped.
/// - Repeat answers to the same question are dropped; the first one counts.
/// - `total_questions` is always the quiz's full question count, so
///   unanswered questions cost exactly their marks.
pub fn grade(questions: &[Question], submitted: &[AnswerInput]) -> GradeOutcome {
    let mut answers: Vec<Answer> = Vec::with_capacity(submitted.len());
    let mut score = 0i32;

    for input in submitted {
        if answers.iter().any(|a| a.question_id == input.question_id) {
            continue;
        }
        let Some(question) = questions.iter().find(|q| q.id == input.question_id) else {
            continue;
        };
        if input.selected_option_index >= question.options.len() {
            continue;
        }
        let is_correct = input.selected_option_index == question.correct_answer_index;
        if is_correct {
            score += 1;
        }
        answers.push(Answer {
            question_id: input.question_id,
            selected_option_index: input.selected_option_index,
            is_correct,
        });
    }

    let total_questions = questions.len() as i32;
    let percentage = if total_questions > 0 {
        ((score as f64 / total_questions as f64) * 100.0).round() as i32
    } else {
        0
    };

    GradeOutcome {
        answers,
        score,
        total_questions,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn question(correct: usize, options: usize) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: "q".to_string(),
            options: (0..options).map(|i| format!("opt {i}")).collect(),
            correct_answer_index: correct,
        }
    }

    #[test]
    fn test_transition_matrix() {
        use QuizStatus::*;
        let legal = [
            (Draft, Published),
            (Draft, Closed),
            (Published, Closed),
            (Published, Draft),
            (Closed, Draft),
            (Draft, Draft),
            (Published, Published),
            (Closed, Closed),
        ];
        for (from, to) in legal {
            assert!(from.can_transition_to(to), "{from:?} -> {to:?}");
        }
        assert!(!Closed.can_transition_to(Published));
    }

    #[test]
    fn test_grade_scores_and_percentage() {
        let questions = vec![question(0, 3), question(1, 3), question(2, 3)];
        let submitted = vec![
            AnswerInput {
                question_id: questions[0].id,
                selected_option_index: 0,
            },
            AnswerInput {
                question_id: questions[1].id,
                selected_option_index: 0,
            },
        ];
        let outcome = grade(&questions, &submitted);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total_questions, 3);
        assert_eq!(outcome.percentage, 33);
        assert_eq!(outcome.answers.len(), 2);
    }

    #[test]
    fn test_grade_drops_malformed_answers() {
        let questions = vec![question(0, 2)];
        let submitted = vec![
            AnswerInput {
                question_id: Uuid::new_v4(), // no such question
                selected_option_index: 0,
            },
            AnswerInput {
                question_id: questions[0].id,
                selected_option_index: 9, // out of range
            },
        ];
        let outcome = grade(&questions, &submitted);
        assert_eq!(outcome.score, 0);
        assert!(outcome.answers.is_empty());
        assert_eq!(outcome.total_questions, 1);
    }

    #[test]
    fn test_grade_first_answer_wins_on_repeat() {
        let questions = vec![question(1, 2)];
        let submitted = vec![
            AnswerInput {
                question_id: questions[0].id,
                selected_option_index: 0,
            },
            AnswerInput {
                question_id: questions[0].id,
                selected_option_index: 1,
            },
        ];
        let outcome = grade(&questions, &submitted);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.answers.len(), 1);
        assert_eq!(outcome.answers[0].selected_option_index, 0);
    }

    #[test]
    fn test_grade_empty_quiz_is_zero() {
        let outcome = grade(&[], &[]);
        assert_eq!(outcome.total_questions, 0);
        assert_eq!(outcome.percentage, 0);
    }

    proptest! {
        /// Grading is deterministic and its outputs stay within bounds no
        /// matter what the submission looks like.
        #[test]
        fn prop_grade_bounds(
            n_questions in 1usize..20,
            picks in proptest::collection::vec((0usize..25, 0usize..8), 0..40),
        ) {
            let questions: Vec<Question> =
                (0..n_questions).map(|i| question(i % 4, 4)).collect();
            let submitted: Vec<AnswerInput> = picks
                .iter()
                .map(|(qi, oi)| AnswerInput {
                    question_id: questions
                        .get(qi % (n_questions + 3))
                        .map(|q| q.id)
                        .unwrap_or_else(Uuid::new_v4),
                    selected_option_index: *oi,
                })
                .collect();

            let a = grade(&questions, &submitted);
            let b = grade(&questions, &submitted);
            prop_assert_eq!(&a, &b);
            prop_assert!(a.score >= 0 && a.score <= n_questions as i32);
            prop_assert!(a.percentage >= 0 && a.percentage <= 100);
            prop_assert!(a.answers.len() <= n_questions);
            prop_assert_eq!(a.score, a.answers.iter().filter(|x| x.is_correct).count() as i32);
        }
    }
}
