//! Profile queries (read operations)

pub mod dashboard;
pub mod get;
pub mod student;

pub use dashboard::DashboardError;
pub use get::GetProfileError;
pub use student::StudentProfileError;
