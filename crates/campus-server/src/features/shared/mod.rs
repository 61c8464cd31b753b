//! Utilities shared across feature slices

pub mod validation;

/// True when the database error is a unique-constraint violation, which the
/// command layer maps to a domain conflict instead of a 500.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
