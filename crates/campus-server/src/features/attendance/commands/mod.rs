//! Attendance commands (write operations)

pub mod save;

pub use save::{SaveAttendanceCommand, SaveAttendanceError};
