//! # Taskboard Shared Library
//!
//! Domain core of the Taskboard project tracker: models, storage, the
//! access policy and the entity services. The HTTP surface lives in
//! `taskboard-api`.
//!
//! ## Module Organization
//!
//! - `models`: users, projects, memberships and tasks
//! - `store`: the `Store` trait with PostgreSQL and in-memory backends
//! - `db`: connection pool and migrations for the PostgreSQL backend
//! - `auth`: password hashing, bearer tokens and the auth middleware
//! - `policy`: owner and member predicates
//! - `services`: business operations with validation and permission checks
//! - `seed`: optional demo data

pub mod auth;
pub mod db;
pub mod models;
pub mod policy;
pub mod seed;
pub mod services;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
