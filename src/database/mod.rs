//! Database Module
//!
//! Connection pooling and schema migration helpers.

pub mod connection;

pub use connection::{run_migrations, DatabaseConfig, DatabasePool};
