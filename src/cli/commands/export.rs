//! Export command implementation
//!
//! This module implements the `export` command, which runs the configured
//! recipes and writes their fixtures.

use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::core::output::WriteStatus;
use crate::domain::CourtsideError;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Only run these recipes (comma-separated names)
    #[arg(long, value_delimiter = ',')]
    pub recipe: Vec<String>,

    /// Build and validate fixtures without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let recipes: Vec<String> = self
            .recipe
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !recipes.is_empty() {
            tracing::info!(recipes = ?recipes, "Selecting recipes from CLI");
        }

        let coordinator = match ExportCoordinator::new(&config, &recipes, self.dry_run).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize export");
                eprintln!("❌ Failed to initialize export: {e}");
                return Ok(init_exit_code(&e));
            }
        };

        if coordinator.is_dry_run() {
            tracing::info!("Dry run mode enabled - no files will be written");
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        println!(
            "🚀 Running {} recipe(s)...",
            coordinator.recipes().len()
        );
        println!();

        let summary = coordinator.execute_export().await;
        print_summary(&summary);

        Ok(summary.exit_code())
    }
}

/// Exit code for a run that could not start
fn init_exit_code(error: &CourtsideError) -> i32 {
    if matches!(error, CourtsideError::Configuration(_)) {
        2
    } else if error.is_source_error() {
        4
    } else {
        5
    }
}

/// Every skipped key of a recipe on one line
fn skipped_line(keys: &[&str]) -> String {
    format!("Skipped {}: {}", keys.len(), keys.join(", "))
}

fn print_summary(summary: &ExportSummary) {
    for recipe in &summary.recipes {
        let icon = match (&recipe.error, recipe.failures.is_empty()) {
            (Some(_), _) => "❌",
            (None, false) => "⚠️ ",
            (None, true) => "✅",
        };
        println!(
            "{icon} {} ({}): {} record(s), {} written, {} unchanged, {} skipped",
            recipe.name,
            recipe.kind,
            recipe.records,
            recipe.count(WriteStatus::Written),
            recipe.count(WriteStatus::Unchanged),
            recipe.count(WriteStatus::Skipped),
        );

        if let Some(error) = &recipe.error {
            println!("     Error: {error}");
        }

        if !recipe.failures.is_empty() {
            println!("     {}", skipped_line(&recipe.failed_keys()));
        }

        for note in &recipe.notes {
            println!("     Note: {note}");
        }
    }

    println!();
    println!("📊 Export Summary:");
    println!("  Recipes: {}", summary.recipes.len());
    println!("  Failed recipes: {}", summary.failed_recipes().len());
    println!("  Files written: {}", summary.files_written());
    println!("  Files unchanged: {}", summary.files_unchanged());
    if summary.dry_run {
        println!("  Files skipped (dry run): {}", summary.files_skipped());
    }
    println!("  Records: {}", summary.total_records());
    println!("  Skipped rows: {}", summary.row_failures());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if summary.is_successful() {
        println!("✅ Export completed successfully!");
    } else {
        println!("⚠️  Export completed with failed recipes");
    }
}
