/// Middleware for the API server
///
/// - `security`: response security headers
/// - `auth`: bearer token authentication layers

pub mod auth;
pub mod security;
