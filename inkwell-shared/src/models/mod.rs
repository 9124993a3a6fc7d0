/// Database models for Inkwell
///
/// Each model owns its SQL. Queries are plain `sqlx::query_as` statements
/// checked at runtime.
///
/// - `user`: accounts and role indicator
/// - `access_token`: revocable bearer token records
/// - `article`: owner-scoped articles
/// - `todo`: unscoped todos

pub mod access_token;
pub mod article;
pub mod todo;
pub mod user;
