//! Export coordinator - main orchestrator for the export process
//!
//! This module coordinates a run: it opens the sources the selected recipes
//! need (once), runs the recipes one after the other, and hands what they
//! produce to the writer.

use crate::adapters::assets::AssetClient;
use crate::adapters::database::{create_database_source, DatabaseSource};
use crate::adapters::stats_api::StatsApiClient;
use crate::config::{CourtsideConfig, RecipeConfig, RecipeKind};
use crate::core::export::summary::{ExportSummary, RecipeSummary};
use crate::core::output::FixtureWriter;
use crate::core::recipe::{run_recipe, RecipeContext, RecipeOutput};
use crate::domain::{CourtsideError, Result};
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    recipes: Vec<RecipeConfig>,
    writer: FixtureWriter,
    database: Option<Arc<dyn DatabaseSource + Send + Sync>>,
    stats_api: Option<StatsApiClient>,
    assets: Option<AssetClient>,
}

impl ExportCoordinator {
    /// Create a coordinator for the named recipes (all when `names` is empty)
    ///
    /// Only the sources the selected recipes use are opened.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown recipe names, and
    /// `SourceUnavailable` if the database cannot be opened.
    pub async fn new(config: &CourtsideConfig, names: &[String], dry_run: bool) -> Result<Self> {
        let recipes: Vec<RecipeConfig> = config
            .select_recipes(names)
            .map_err(CourtsideError::Configuration)?
            .into_iter()
            .cloned()
            .collect();

        let database = if recipes.iter().any(RecipeConfig::uses_database) {
            let db_config = config.database.as_ref().ok_or_else(|| {
                CourtsideError::Configuration(
                    "a [database] section is required by the selected recipes".to_string(),
                )
            })?;
            Some(create_database_source(db_config).await?)
        } else {
            None
        };

        let stats_api = if recipes.iter().any(RecipeConfig::uses_stats_api) {
            tracing::debug!(base_url = %config.stats_api.base_url, "Creating stats API client");
            Some(StatsApiClient::new(&config.stats_api)?)
        } else {
            None
        };

        let assets = if recipes
            .iter()
            .any(|r| matches!(r.kind, RecipeKind::Logos(_)))
        {
            Some(AssetClient::new(&config.stats_api)?)
        } else {
            None
        };

        Ok(Self {
            recipes,
            writer: FixtureWriter::new(dry_run || config.application.dry_run),
            database,
            stats_api,
            assets,
        })
    }

    pub fn recipes(&self) -> &[RecipeConfig] {
        &self.recipes
    }

    pub fn is_dry_run(&self) -> bool {
        self.writer.is_dry_run()
    }

    /// Execute the export
    ///
    /// Recipes run in configuration order. A recipe that fails is recorded
    /// in the summary and the next one still runs.
    pub async fn execute_export(&self) -> ExportSummary {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new(self.writer.is_dry_run());

        tracing::info!(
            recipes = self.recipes.len(),
            dry_run = self.writer.is_dry_run(),
            "Starting export process"
        );

        for recipe in &self.recipes {
            summary.add_recipe(self.execute_recipe(recipe).await);
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary
    }

    async fn execute_recipe(&self, recipe: &RecipeConfig) -> RecipeSummary {
        let started = Instant::now();
        let mut result = RecipeSummary::new(&recipe.name, recipe.kind.kind_name());

        let ctx = RecipeContext {
            recipe,
            database: self.database.as_deref(),
            stats_api: self.stats_api.as_ref(),
            assets: self.assets.as_ref(),
        };

        let outcome = match run_recipe(&ctx).await {
            Ok(output) => self.write_output(output, &mut result),
            Err(e) => Err(e),
        };

        result.duration = started.elapsed();
        match outcome {
            Ok(()) => crate::log_recipe_complete!(
                recipe.name,
                result.records,
                result.failures.len(),
                result.duration
            ),
            Err(e) => {
                tracing::error!(recipe = %recipe.name, error = %e, "Recipe failed");
                result.source_error = e.is_source_error();
                result.error = Some(e.to_string());
            }
        }
        result
    }

    fn write_output(&self, output: RecipeOutput, result: &mut RecipeSummary) -> Result<()> {
        result.failures = output.failures;
        result.notes = output.notes;

        for fixture in &output.fixtures {
            let outcome = self.writer.write_fixture(fixture)?;
            result.records += fixture.record_count();
            result.outputs.push(outcome);
        }

        for (path, bytes) in &output.files {
            let outcome = self.writer.write_bytes(path, bytes)?;
            tracing::debug!(
                path = %outcome.path.display(),
                status = %outcome.status,
                "Asset {}",
                outcome.status
            );
            result.outputs.push(outcome);
        }

        Ok(())
    }
}
