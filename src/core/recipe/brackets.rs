//! Playoff bracket fixtures
//!
//! Brackets are hand-maintained in a TOML data file and validated on load.
//! Each selected season is written to its own JSON file.

use super::{RecipeContext, RecipeOutput};
use crate::config::BracketsRecipe;
use crate::domain::bracket::load_brackets;
use crate::domain::{CourtsideError, Fixture, FixtureBody, FixtureFormat, Result};

pub fn run(ctx: &RecipeContext<'_>, spec: &BracketsRecipe) -> Result<RecipeOutput> {
    let brackets = load_brackets(&spec.input)?;
    tracing::info!(
        recipe = %ctx.name(),
        input = %spec.input,
        seasons = brackets.len(),
        "Loaded playoff brackets"
    );

    for season in &spec.seasons {
        if !brackets.iter().any(|b| &b.season == season) {
            return Err(CourtsideError::Validation(format!(
                "No bracket for season {season} in {}",
                spec.input
            )));
        }
    }

    let mut output = RecipeOutput::default();
    for bracket in brackets
        .iter()
        .filter(|b| spec.seasons.is_empty() || spec.seasons.contains(&b.season))
    {
        let path = ctx.recipe.output_path(Some(&bracket.season));
        output.fixtures.push(Fixture::new(
            path,
            Some(bracket.season.clone()),
            FixtureFormat::Json,
            Vec::new(),
            FixtureBody::Document(serde_json::to_value(bracket)?),
        )?);
        output.notes.push(format!(
            "{}: champion {}, finals {}",
            bracket.season,
            bracket.champion,
            bracket.finals_line()
        ));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RecipeConfig, RecipeKind};
    use std::path::Path;

    fn recipe(input: &Path, seasons: &str) -> RecipeConfig {
        toml::from_str(&format!(
            r#"
            name = "playoff_brackets"
            kind = "playoff_brackets"
            input = "{}"
            seasons = {seasons}
            output = "data/playoff_bracket_{{season}}.json"
            "#,
            input.display()
        ))
        .unwrap()
    }

    fn run_recipe(config: &RecipeConfig) -> Result<RecipeOutput> {
        let ctx = RecipeContext {
            recipe: config,
            database: None,
            stats_api: None,
            assets: None,
        };
        let RecipeKind::PlayoffBrackets(spec) = &config.kind else {
            panic!("expected playoff_brackets");
        };
        run(&ctx, spec)
    }

    #[test]
    fn test_bundled_brackets_one_file_per_season() {
        let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/playoff_brackets.toml");
        let config = recipe(&input, "[]");

        let output = run_recipe(&config).unwrap();

        assert_eq!(output.fixtures.len(), 3);
        for fixture in &output.fixtures {
            let season = fixture.season().unwrap();
            assert_eq!(
                fixture.path(),
                Path::new(&format!("data/playoff_bracket_{season}.json"))
            );
            let FixtureBody::Document(doc) = fixture.body() else {
                panic!("expected a document");
            };
            assert_eq!(doc["season"], season.as_str());
        }
        assert_eq!(output.notes.len(), 3);
    }

    #[test]
    fn test_season_selection() {
        let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/playoff_brackets.toml");

        let output = run_recipe(&recipe(&input, r#"["2024-25"]"#)).unwrap();
        assert_eq!(output.fixtures.len(), 1);
        let FixtureBody::Document(doc) = output.fixtures[0].body() else {
            panic!("expected a document");
        };
        assert_eq!(doc["champion"], "OKC");
        assert_eq!(doc["east"]["finals"]["teams"], serde_json::json!(["NYK", "IND"]));

        let err = run_recipe(&recipe(&input, r#"["1990-91"]"#)).unwrap_err();
        assert!(matches!(err, CourtsideError::Validation(_)));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let config = recipe(Path::new("/nonexistent/brackets.toml"), "[]");
        assert!(matches!(run_recipe(&config), Err(CourtsideError::Io(_))));
    }
}
