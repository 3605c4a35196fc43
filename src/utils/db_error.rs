//! Helpers for classifying SQLite errors.

/// Returns true if the error is a UNIQUE constraint violation.
///
/// `urls.short_code` is the only unique column besides the rowid, so any
/// unique violation raised by an insert into `urls` is a short code collision.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
