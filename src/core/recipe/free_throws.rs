//! Free-throw enrichment of the scoring breakdown
//!
//! Reads an existing breakdown keyed by team name, joins league team totals
//! from `leaguedashteamstats` on `TEAM_NAME`, and recomputes totals and
//! percentages with free-throw points included. Teams the API does not
//! return are left as they were and reported as failed keys.

use super::{substitute, RecipeContext, RecipeOutput};
use crate::config::FreeThrowsRecipe;
use crate::domain::record::round_to;
use crate::domain::{
    CourtsideError, Fixture, FixtureBody, FixtureFormat, Record, Result, Scalar, SeasonKey, Table,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Free-throw totals of one team
#[derive(Debug, Clone, PartialEq)]
pub struct FreeThrowLine {
    pub ftm: i64,
    pub fta: i64,
    pub ft_pct: f64,
}

impl FreeThrowLine {
    /// One made free throw is one point
    pub fn points(&self) -> f64 {
        self.ftm as f64
    }

    /// Index team totals by team name
    pub fn index(table: &Table) -> (HashMap<String, Self>, Vec<(String, CourtsideError)>) {
        let mut lines = HashMap::new();
        let mut skipped = Vec::new();

        for (idx, row) in table.records().enumerate() {
            let Some(name) = row.get("TEAM_NAME").and_then(Scalar::as_str) else {
                skipped.push((
                    format!("row {}", idx + 1),
                    CourtsideError::MissingField {
                        key: format!("row {}", idx + 1),
                        field: "TEAM_NAME".to_string(),
                    },
                ));
                continue;
            };

            let line = Self::from_record(name, &row);

            match line {
                Ok(line) => {
                    lines.insert(name.to_string(), line);
                }
                Err(e) => skipped.push((name.to_string(), e)),
            }
        }

        (lines, skipped)
    }

    fn from_record(name: &str, row: &Record) -> Result<Self> {
        let number = |column: &str| {
            row.get(column).and_then(Scalar::as_f64).ok_or_else(|| {
                CourtsideError::MalformedRow {
                    key: name.to_string(),
                    reason: format!("{column} is not a number"),
                }
            })
        };

        Ok(Self {
            ftm: number("FTM")? as i64,
            fta: number("FTA")? as i64,
            ft_pct: number("FT_PCT")?,
        })
    }
}

pub async fn run(ctx: &RecipeContext<'_>, spec: &FreeThrowsRecipe) -> Result<RecipeOutput> {
    let season = ctx.require_season()?;
    let input = substitute(&spec.input, Some(season), None);

    let content = tokio::fs::read_to_string(&input).await.map_err(|e| {
        CourtsideError::SourceUnavailable(format!("Failed to read scoring breakdown {input}: {e}"))
    })?;
    let mut scoring: Map<String, Value> = serde_json::from_str(&content).map_err(|e| {
        CourtsideError::Validation(format!("Scoring breakdown {input} is not a JSON object: {e}"))
    })?;
    tracing::info!(recipe = %ctx.name(), input = %input, teams = scoring.len(), "Loaded scoring breakdown");

    let mut table = ctx
        .stats_api()?
        .fetch(
            "leaguedashteamstats",
            &[
                ("MeasureType", "Base"),
                ("PerMode", "Totals"),
                ("PlusMinus", "N"),
                ("PaceAdjust", "N"),
                ("Rank", "N"),
                ("Season", season.as_str()),
                ("SeasonType", spec.season_type.as_str()),
                ("LastNGames", "0"),
                ("Month", "0"),
                ("OpponentTeamID", "0"),
                ("Period", "0"),
                ("PORound", "0"),
                ("TeamID", "0"),
                ("LeagueID", "00"),
            ],
            0,
        )
        .await?;

    let (lines, mut skipped) = FreeThrowLine::index(&table);
    skipped.extend(enrich(&mut scoring, &lines, season));

    let mut failures = ctx.skipped_rows(&mut table, None);
    failures.extend(
        skipped
            .into_iter()
            .map(|(key, error)| ctx.row_failure(key, &error)),
    );

    let fixture = Fixture::new(
        ctx.recipe.output_path(None),
        Some(season.clone()),
        FixtureFormat::Json,
        Vec::new(),
        FixtureBody::Document(Value::Object(scoring)),
    )?;

    Ok(RecipeOutput::fixture(fixture, failures))
}

/// Add free throws to every team in `scoring` that has a line in `lines`
///
/// Returns the teams that could not be updated.
pub fn enrich(
    scoring: &mut Map<String, Value>,
    lines: &HashMap<String, FreeThrowLine>,
    season: &SeasonKey,
) -> Vec<(String, CourtsideError)> {
    let mut skipped = Vec::new();

    for (team, entry) in scoring.iter_mut() {
        let Some(line) = lines.get(team) else {
            skipped.push((
                team.clone(),
                CourtsideError::MalformedRow {
                    key: team.clone(),
                    reason: "no free throw data from the stats API".to_string(),
                },
            ));
            continue;
        };

        // A team that fails keeps its original entry
        let mut updated = entry.clone();
        match enrich_team(team, &mut updated, line, season) {
            Ok(total) => {
                *entry = updated;
                tracing::debug!(team = %team, total, "Added free throws");
            }
            Err(e) => skipped.push((team.clone(), e)),
        }
    }

    skipped
}

fn enrich_team(team: &str, entry: &mut Value, line: &FreeThrowLine, season: &SeasonKey) -> Result<f64> {
    let malformed = |reason: &str| CourtsideError::MalformedRow {
        key: team.to_string(),
        reason: reason.to_string(),
    };

    let entry = entry
        .as_object_mut()
        .ok_or_else(|| malformed("entry is not an object"))?;
    let field_goals = entry
        .get_mut("field_goal_points")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| CourtsideError::MissingField {
            key: team.to_string(),
            field: "field_goal_points".to_string(),
        })?;

    let part = |name: &str| field_goals.get(name).and_then(Value::as_f64).unwrap_or(0.0);
    let three_pt = part("three_pt");
    let paint = part("paint");
    let mid_range = part("mid_range");

    let ft_points = line.points();
    let total = three_pt + paint + mid_range + ft_points;
    if total <= 0.0 {
        return Err(malformed("total points is zero"));
    }
    field_goals.insert("total".to_string(), json!(total));

    let share = |points: f64| json!(round_to(points / total * 100.0, 1));
    let percentages = entry
        .entry("percentages")
        .or_insert_with(|| Value::Object(Map::new()));
    let percentages = percentages
        .as_object_mut()
        .ok_or_else(|| malformed("percentages is not an object"))?;
    percentages.insert("free_throws_pct".to_string(), share(ft_points));
    percentages.insert("three_pt_pct".to_string(), share(three_pt));
    percentages.insert("paint_pct".to_string(), share(paint));
    percentages.insert("mid_range_pct".to_string(), share(mid_range));

    entry.insert(
        "free_throws".to_string(),
        json!({
            "ftm": line.ftm,
            "fta": line.fta,
            "ft_pct": line.ft_pct,
            "ft_points": ft_points,
        }),
    );
    entry.insert(
        "note".to_string(),
        json!(format!("Updated with real free throw data from NBA API (season {season})")),
    );

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoring() -> Map<String, Value> {
        serde_json::from_value(json!({
            "Boston Celtics": {
                "field_goal_points": {"three_pt": 3000, "paint": 3200, "mid_range": 800, "total": 7000},
                "percentages": {"three_pt_pct": 42.9, "paint_pct": 45.7, "mid_range_pct": 11.4},
                "note": "From shot chart data"
            },
            "Utah Jazz": {
                "field_goal_points": {"three_pt": 2400, "paint": 3400, "mid_range": 700, "total": 6500},
                "percentages": {},
                "note": "From shot chart data"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_enrich_recomputes_totals() {
        let mut data = scoring();
        let mut lines = HashMap::new();
        lines.insert(
            "Boston Celtics".to_string(),
            FreeThrowLine {
                ftm: 1000,
                fta: 1250,
                ft_pct: 0.8,
            },
        );
        let season = SeasonKey::new("2024-25").unwrap();

        let skipped = enrich(&mut data, &lines, &season);

        let bos = &data["Boston Celtics"];
        assert_eq!(bos["field_goal_points"]["total"], json!(8000.0));
        assert_eq!(bos["free_throws"]["ftm"], 1000);
        assert_eq!(bos["free_throws"]["ft_points"], json!(1000.0));
        assert_eq!(bos["percentages"]["free_throws_pct"], json!(12.5));
        assert_eq!(bos["percentages"]["three_pt_pct"], json!(37.5));
        assert_eq!(bos["percentages"]["paint_pct"], json!(40.0));
        assert_eq!(bos["percentages"]["mid_range_pct"], json!(10.0));
        assert_eq!(
            bos["note"],
            "Updated with real free throw data from NBA API (season 2024-25)"
        );

        // missing from the API: untouched and reported
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "Utah Jazz");
        assert_eq!(data["Utah Jazz"]["note"], "From shot chart data");
        assert!(data["Utah Jazz"].get("free_throws").is_none());
    }

    #[test]
    fn test_failed_team_is_left_unchanged() {
        let mut data: Map<String, Value> = serde_json::from_value(json!({
            "Boston Celtics": {
                "field_goal_points": {"three_pt": 3000, "paint": 3200, "mid_range": 800, "total": 7000},
                "percentages": null,
                "note": "From shot chart data"
            }
        }))
        .unwrap();
        let before = data.clone();
        let mut lines = HashMap::new();
        lines.insert(
            "Boston Celtics".to_string(),
            FreeThrowLine {
                ftm: 1000,
                fta: 1250,
                ft_pct: 0.8,
            },
        );
        let season = SeasonKey::new("2024-25").unwrap();

        let skipped = enrich(&mut data, &lines, &season);

        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "Boston Celtics");
        assert!(matches!(skipped[0].1, CourtsideError::MalformedRow { .. }));
        assert_eq!(data, before);
        assert_eq!(data["Boston Celtics"]["field_goal_points"]["total"], json!(7000));
    }

    #[test]
    fn test_index_team_lines() {
        let mut table = Table::new(
            ["TEAM_ID", "TEAM_NAME", "FTM", "FTA", "FT_PCT"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        table.rows = vec![
            vec![Scalar::Int(1), "Boston Celtics".into(), Scalar::Int(1300), Scalar::Int(1612), Scalar::Float(0.806)],
            vec![Scalar::Int(2), "Utah Jazz".into(), Scalar::Null, Scalar::Int(1500), Scalar::Float(0.77)],
        ];

        let (lines, skipped) = FreeThrowLine::index(&table);

        assert_eq!(lines["Boston Celtics"].ftm, 1300);
        assert_eq!(lines["Boston Celtics"].points(), 1300.0);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "Utah Jazz");
    }
}
