//! External system integrations for courtside.
//!
//! This module provides adapters for the systems courtside reads from:
//!
//! - [`database`] - Database abstraction layer (trait-based)
//! - [`sqlite`] - SQLite implementation (the default source)
//! - [`postgresql`] - PostgreSQL implementation
//! - [`stats_api`] - stats.nba.com client with call pacing
//! - [`assets`] - verbatim logo downloads
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies from the recipes. The database
//! layer uses trait-based abstraction so the same SQL recipes run on either
//! backend.
//!
//! ```rust,no_run
//! use courtside::adapters::database::create_database_source;
//! use courtside::config::DatabaseConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = create_database_source(&DatabaseConfig::default()).await?;
//! let teams = source.query("SELECT abbreviation FROM team").await?;
//! println!("{} teams", teams.len());
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod database;
pub mod postgresql;
pub mod sqlite;
pub mod stats_api;
