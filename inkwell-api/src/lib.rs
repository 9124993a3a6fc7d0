//! # Inkwell API Server Library
//!
//! HTTP surface of Inkwell: account registration and bearer-token login,
//! per-user articles with a public feed, and a shared todo list.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating request extractors
//! - `maintenance`: Background token store cleanup
//! - `middleware`: Authentication and security header layers
//! - `response`: Success envelopes
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod maintenance;
pub mod middleware;
pub mod response;
pub mod routes;
