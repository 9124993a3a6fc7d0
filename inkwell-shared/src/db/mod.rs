/// Database layer for Inkwell
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded schema migrations
///
/// Models and their queries live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
