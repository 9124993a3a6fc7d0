//! # Inkwell Shared Library
//!
//! Data layer and credential primitives shared by the Inkwell API server.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and embedded migrations
//! - `models`: users, access tokens, articles and todos with their queries
//! - `auth`: password hashing, JWT access tokens, bearer authentication

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Inkwell shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
