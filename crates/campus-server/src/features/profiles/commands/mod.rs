//! Profile commands (write operations)

pub mod photo;
pub mod update;

pub use photo::PhotoError;
pub use update::{UpdateProfileCommand, UpdateProfileError};
