//! Class commands (write operations)

pub mod create;
pub mod delete;
pub mod enrollment;
pub mod rename;
pub mod subject_files;
pub mod subjects;

pub use create::{CreateClassCommand, CreateClassError};
pub use delete::DeleteClassError;
pub use enrollment::EnrollmentError;
pub use rename::{RenameClassCommand, RenameClassError};
pub use subject_files::SubjectFileError;
pub use subjects::{AddSubjectCommand, AddSubjectError};
