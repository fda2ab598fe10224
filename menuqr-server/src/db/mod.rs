//! Database access layer
//!
//! Plain `sqlx` runtime queries with `$n` placeholders. Ownership checks are
//! part of the WHERE clause so a foreign id reads as "not found".

pub mod dishes;
pub mod menus;
pub mod orders;
pub mod restaurants;
pub mod sections;
pub mod statistics;

/// PostgreSQL `unique_violation`
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == "23505")
}

/// PostgreSQL `foreign_key_violation`
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == "23503")
}
