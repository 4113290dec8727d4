//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::output::{WriteOutcome, WriteStatus};
use crate::domain::RowFailure;
use std::time::Duration;

/// Result of one recipe within a run
#[derive(Debug, Clone)]
pub struct RecipeSummary {
    /// Recipe name
    pub name: String,

    /// Recipe kind, as configured
    pub kind: String,

    /// One entry per fixture or asset handled by the writer
    pub outputs: Vec<WriteOutcome>,

    /// Records across all fixtures of the recipe
    pub records: usize,

    /// Rows and teams that were skipped
    pub failures: Vec<RowFailure>,

    /// Informational messages from the recipe
    pub notes: Vec<String>,

    /// Fatal error that stopped the recipe, if any
    pub error: Option<String>,

    /// The fatal error was a source that could not be reached
    pub source_error: bool,

    pub duration: Duration,
}

impl RecipeSummary {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            outputs: Vec::new(),
            records: 0,
            failures: Vec::new(),
            notes: Vec::new(),
            error: None,
            source_error: false,
            duration: Duration::from_secs(0),
        }
    }

    /// The recipe ran to completion (row-level skips allowed)
    pub fn is_successful(&self) -> bool {
        self.error.is_none()
    }

    pub fn count(&self, status: WriteStatus) -> usize {
        self.outputs.iter().filter(|o| o.status == status).count()
    }

    /// Keys of skipped rows, in the order they were met
    pub fn failed_keys(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.key.as_str()).collect()
    }
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Per-recipe results, in execution order
    pub recipes: Vec<RecipeSummary>,

    /// Whether writes were suppressed
    pub dry_run: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            recipes: Vec::new(),
            dry_run,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn add_recipe(&mut self, recipe: RecipeSummary) {
        self.recipes.push(recipe);
    }

    pub fn files_written(&self) -> usize {
        self.recipes.iter().map(|r| r.count(WriteStatus::Written)).sum()
    }

    pub fn files_unchanged(&self) -> usize {
        self.recipes.iter().map(|r| r.count(WriteStatus::Unchanged)).sum()
    }

    pub fn files_skipped(&self) -> usize {
        self.recipes.iter().map(|r| r.count(WriteStatus::Skipped)).sum()
    }

    pub fn total_records(&self) -> usize {
        self.recipes.iter().map(|r| r.records).sum()
    }

    pub fn row_failures(&self) -> usize {
        self.recipes.iter().map(|r| r.failures.len()).sum()
    }

    /// Recipes stopped by a fatal error
    pub fn failed_recipes(&self) -> Vec<&RecipeSummary> {
        self.recipes.iter().filter(|r| !r.is_successful()).collect()
    }

    /// Check if every recipe completed
    pub fn is_successful(&self) -> bool {
        self.recipes.iter().all(RecipeSummary::is_successful)
    }

    /// Process exit code for the run
    ///
    /// Skipped rows do not change the exit code. A recipe stopped by an
    /// unreachable source gives 4, any other fatal recipe error 5.
    pub fn exit_code(&self) -> i32 {
        let failed = self.failed_recipes();
        if failed.is_empty() {
            0
        } else if failed.iter().any(|r| r.source_error) {
            4
        } else {
            5
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            recipes = self.recipes.len(),
            failed_recipes = self.failed_recipes().len(),
            files_written = self.files_written(),
            files_unchanged = self.files_unchanged(),
            files_skipped = self.files_skipped(),
            records = self.total_records(),
            row_failures = self.row_failures(),
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        for recipe in &self.recipes {
            if let Some(error) = &recipe.error {
                tracing::error!(recipe = %recipe.name, error = %error, "Recipe failed");
            }
            if !recipe.failures.is_empty() {
                tracing::warn!(
                    recipe = %recipe.name,
                    count = recipe.failures.len(),
                    keys = %recipe.failed_keys().join(", "),
                    "Recipe skipped rows"
                );
            }
        }
    }
}
