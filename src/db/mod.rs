//! Database layer
//!
//! This module provides database access for Inkpost. It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The database driver is selected based on configuration. The `DatabasePool`
//! trait abstracts over the two backends so repositories can work against
//! either without knowing which one is active.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
