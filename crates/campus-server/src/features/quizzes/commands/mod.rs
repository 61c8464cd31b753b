//! Quiz commands (write operations)

pub mod change_status;
pub mod create;
pub mod delete;
pub mod submit;

pub use change_status::{ChangeStatusCommand, ChangeStatusError};
pub use create::{CreateQuizCommand, CreateQuizError};
pub use delete::DeleteQuizError;
pub use submit::{SubmitQuizCommand, SubmitQuizError};
