//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over the relational
//! sources courtside reads from (SQLite, PostgreSQL).

pub mod factory;
pub mod traits;

pub use factory::create_database_source;
pub use traits::{ColumnInfo, DatabaseSource, TableInfo};
