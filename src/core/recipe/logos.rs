//! Team logo download
//!
//! The recipe's `output` is a directory. Each team's logo is stored as
//! `<ABBR>_logo.svg`, byte for byte as served.

use super::{RecipeContext, RecipeOutput};
use crate::adapters::assets::{logo_file_name, logo_url};
use crate::config::LogosRecipe;
use crate::domain::teams::{self, TEAMS};
use crate::domain::Result;
use std::path::Path;

pub async fn run(ctx: &RecipeContext<'_>, spec: &LogosRecipe) -> Result<RecipeOutput> {
    let assets = ctx.assets()?;
    let dir = Path::new(&ctx.recipe.output);
    let mut output = RecipeOutput::default();

    for team in TEAMS.iter() {
        let url = logo_url(&spec.url_template, team);
        match assets.fetch(&url).await {
            Ok(bytes) => {
                tracing::debug!(team = team.abbr, bytes = bytes.len(), "Fetched logo");
                output.files.push((dir.join(logo_file_name(team)), bytes));
            }
            Err(e) => output.failures.push(ctx.row_failure(team.abbr, &e)),
        }
    }

    tracing::info!(
        recipe = %ctx.name(),
        downloaded = output.files.len(),
        failed = output.failures.len(),
        "Logo download finished"
    );

    for (abbr, legacy) in teams::LEGACY_LOGO_FILES {
        if dir.join(legacy).exists() {
            output.notes.push(format!(
                "{} still exists in {}; {abbr} now uses {abbr}_logo.svg",
                legacy,
                dir.display()
            ));
        }
    }

    Ok(output)
}
