//! Recipes: what each configured export produces
//!
//! A recipe turns source data into fixtures. The generic [`table`] recipe
//! covers select/filter/sort/shape exports from either source; the other
//! kinds carry the shaping rules that do not fit a flat table.
//!
//! Recipes never write files themselves. They return a [`RecipeOutput`]
//! that the export coordinator hands to the writer.

pub mod brackets;
pub mod free_throws;
pub mod logos;
pub mod schedule;
pub mod season_summary;
pub mod table;

use crate::adapters::assets::AssetClient;
use crate::adapters::database::DatabaseSource;
use crate::adapters::stats_api::StatsApiClient;
use crate::config::{RecipeConfig, RecipeKind, SEASON_PLACEHOLDER};
use crate::domain::teams::Team;
use crate::domain::{CourtsideError, Fixture, Result, RowFailure, SeasonKey, Table};
use std::path::PathBuf;

/// Sources available to a recipe, opened once per run
pub struct RecipeContext<'a> {
    pub recipe: &'a RecipeConfig,
    pub database: Option<&'a (dyn DatabaseSource + Send + Sync)>,
    pub stats_api: Option<&'a StatsApiClient>,
    pub assets: Option<&'a AssetClient>,
}

impl<'a> RecipeContext<'a> {
    pub fn name(&self) -> &str {
        &self.recipe.name
    }

    pub fn season(&self) -> Option<&SeasonKey> {
        self.recipe.season.as_ref()
    }

    /// The recipe's season, for kinds that cannot run without one
    pub fn require_season(&self) -> Result<&SeasonKey> {
        self.season().ok_or_else(|| {
            CourtsideError::Configuration(format!("recipe '{}' requires a season", self.name()))
        })
    }

    pub fn database(&self) -> Result<&'a (dyn DatabaseSource + Send + Sync)> {
        self.database.ok_or_else(|| {
            CourtsideError::SourceUnavailable(format!(
                "recipe '{}' needs the database but none is open",
                self.recipe.name
            ))
        })
    }

    pub fn stats_api(&self) -> Result<&'a StatsApiClient> {
        self.stats_api.ok_or_else(|| {
            CourtsideError::SourceUnavailable(format!(
                "recipe '{}' needs the stats API but no client is open",
                self.recipe.name
            ))
        })
    }

    pub fn assets(&self) -> Result<&'a AssetClient> {
        self.assets.ok_or_else(|| {
            CourtsideError::SourceUnavailable(format!(
                "recipe '{}' needs the asset client but none is open",
                self.recipe.name
            ))
        })
    }

    /// Record a skipped row or team and log it
    pub fn row_failure(&self, key: impl Into<String>, error: &CourtsideError) -> RowFailure {
        let failure = RowFailure::new(self.name(), key, error.to_string());
        tracing::warn!(
            recipe = %failure.recipe,
            key = %failure.key,
            error = %error,
            "Skipping row"
        );
        failure
    }

    /// Take the rows a source dropped from `table` and record them
    ///
    /// Keys are prefixed with `scope` (a team abbreviation in per-team loops).
    pub fn skipped_rows(&self, table: &mut Table, scope: Option<&str>) -> Vec<RowFailure> {
        std::mem::take(&mut table.skipped)
            .into_iter()
            .map(|row| {
                let key = match scope {
                    Some(scope) => format!("{scope} {}", row.key),
                    None => row.key,
                };
                let error = CourtsideError::MalformedRow {
                    key: key.clone(),
                    reason: row.reason,
                };
                self.row_failure(key, &error)
            })
            .collect()
    }
}

/// Everything a recipe produced
#[derive(Debug, Default)]
pub struct RecipeOutput {
    pub fixtures: Vec<Fixture>,

    /// Verbatim files (logos)
    pub files: Vec<(PathBuf, Vec<u8>)>,

    pub failures: Vec<RowFailure>,

    /// Informational messages for the summary
    pub notes: Vec<String>,
}

impl RecipeOutput {
    pub fn fixture(fixture: Fixture, failures: Vec<RowFailure>) -> Self {
        Self {
            fixtures: vec![fixture],
            failures,
            ..Default::default()
        }
    }
}

/// Run one recipe against the open sources
///
/// # Errors
///
/// Source-level errors abort the recipe. Row-level problems are returned in
/// [`RecipeOutput::failures`] instead.
pub async fn run_recipe(ctx: &RecipeContext<'_>) -> Result<RecipeOutput> {
    tracing::info!(
        recipe = %ctx.name(),
        kind = ctx.recipe.kind.kind_name(),
        "Running recipe"
    );

    match &ctx.recipe.kind {
        RecipeKind::Table(spec) => table::run(ctx, spec).await,
        RecipeKind::TeamSchedules(spec) => schedule::run(ctx, spec).await,
        RecipeKind::SeasonSummary(spec) => season_summary::run(ctx, spec).await,
        RecipeKind::FreeThrows(spec) => free_throws::run(ctx, spec).await,
        RecipeKind::PlayoffBrackets(spec) => brackets::run(ctx, spec),
        RecipeKind::Logos(spec) => logos::run(ctx, spec).await,
    }
}

/// Fill `{season}`, `{team_id}` and `{abbr}` placeholders
pub fn substitute(template: &str, season: Option<&SeasonKey>, team: Option<&Team>) -> String {
    let mut value = template.to_string();
    if let Some(season) = season {
        value = value.replace(SEASON_PLACEHOLDER, season.as_str());
    }
    if let Some(team) = team {
        value = value
            .replace("{team_id}", &team.id.to_string())
            .replace("{abbr}", team.abbr);
    }
    value
}
