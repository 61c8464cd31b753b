//! Quiz queries (read operations)

pub mod list_for_student;
pub mod list_for_teacher;
pub mod my_attempts;
pub mod results;
pub mod take;

pub use list_for_student::ListStudentQuizzesError;
pub use list_for_teacher::{ListTeacherQuizzesError, TeacherQuizFilters};
pub use my_attempts::MyAttemptsError;
pub use results::QuizResultsError;
pub use take::TakeQuizError;
