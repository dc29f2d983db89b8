/// Database layer for Taskboard
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: schema migration runner
///
/// Queries themselves live in [`crate::store::postgres`].

pub mod migrations;
pub mod pool;
