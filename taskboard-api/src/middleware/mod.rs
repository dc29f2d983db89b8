/// Middleware modules for the API server
///
/// - `security`: security response headers
///
/// Authentication lives in `taskboard_shared::auth::middleware` and is
/// wired up in [`crate::app`].

pub mod security;
