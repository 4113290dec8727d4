// courtside - NBA statistics fixture exporter
// Copyright (c) 2025 Courtside Contributors
// Licensed under the MIT License

//! # courtside - NBA statistics fixture exporter
//!
//! courtside reads NBA statistics from a local database and from the public
//! stats.nba.com API and writes the JSON and CSV fixtures a static
//! visualization site loads at runtime.
//!
//! ## Overview
//!
//! A run is a list of **recipes**, each producing one or more fixtures:
//! - **Table** recipes select, filter, derive and shape rows from SQL or an
//!   API endpoint
//! - **Team schedules**, **season summaries** and **free-throw enrichment**
//!   call the API once per team and join the results
//! - **Playoff brackets** come from a hand-maintained, validated data file
//! - **Logos** are downloaded byte for byte
//!
//! Every file is written atomically and only when its content changes, so a
//! second run against the same source leaves the output untouched.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Recipes, the export coordinator and the fixture writer
//! - [`adapters`] - SQLite, PostgreSQL, stats API and asset clients
//! - [`domain`] - Identifiers, tables, fixtures, brackets, the team table
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courtside::config::load_config;
//! use courtside::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("courtside.toml")?;
//!
//!     // Every recipe, files written
//!     let coordinator = ExportCoordinator::new(&config, &[], false).await?;
//!     let summary = coordinator.execute_export().await;
//!
//!     println!(
//!         "{} records, {} files written",
//!         summary.total_records(),
//!         summary.files_written()
//!     );
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Error Handling
//!
//! Failures use [`domain::CourtsideError`]. A row or team that cannot be
//! read is skipped and reported in the run summary; a recipe whose source is
//! unreachable fails without stopping the other recipes.
//!
//! ```rust,no_run
//! use courtside::domain::CourtsideError;
//!
//! fn example() -> Result<(), CourtsideError> {
//!     let config = courtside::config::load_config("courtside.toml")?;
//!     println!("{} recipes", config.recipes.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
