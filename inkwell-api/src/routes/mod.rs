/// API route handlers
///
/// - `health`: Liveness and database check
/// - `auth`: Registration, login, profile and logout
/// - `articles`: Published feed and per-user article management
/// - `todos`: Shared todo list

pub mod articles;
pub mod auth;
pub mod health;
pub mod todos;

/// Parses a path segment as a row id
///
/// Non-numeric segments cannot name a row, so callers treat `None` the same
/// way as an unknown id.
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}
