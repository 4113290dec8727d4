//! Export orchestration
//!
//! This module provides the core export logic for courtside:
//! - Export coordination (sources opened once, recipes run in order)
//! - Summary and reporting

pub mod coordinator;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use summary::{ExportSummary, RecipeSummary};
