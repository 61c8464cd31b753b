//! Class queries (read operations)

pub mod list;
pub mod roster;
pub mod subjects;

pub use list::ListClassesError;
pub use roster::RosterError;
pub use subjects::ListSubjectsError;
