//! Core business logic for courtside.
//!
//! # Modules
//!
//! - [`recipe`] - What each configured export produces
//! - [`output`] - Atomic writes and checksums
//! - [`export`] - Run orchestration and the end-of-run summary
//!
//! # Export Workflow
//!
//! 1. **Select**: pick the recipes named on the command line (or all)
//! 2. **Open sources**: database, stats API client and asset client, only
//!    when a selected recipe needs them
//! 3. **Run recipes**: each recipe builds fixtures in memory; bad rows are
//!    skipped and reported with their key
//! 4. **Write**: every fixture is validated and written atomically
//! 5. **Report**: files written/unchanged, records, skipped keys
//!
//! # Example
//!
//! ```rust,no_run
//! use courtside::config::load_config;
//! use courtside::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("courtside.toml")?;
//!
//! let coordinator = ExportCoordinator::new(&config, &[], false).await?;
//! let summary = coordinator.execute_export().await;
//!
//! println!("Written: {}", summary.files_written());
//! println!("Skipped rows: {}", summary.row_failures());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod output;
pub mod recipe;
