//! Season summary: standings joined with playoff history
//!
//! Standings come from one `leaguestandingsv3` call. Playoff results come
//! from `teamyearbyyearstats`, one call per team, matched on the season's
//! `YEAR` row. A team whose history call fails keeps its standings with
//! zero playoff games and is reported as a failed key.

use super::{RecipeContext, RecipeOutput};
use crate::config::SeasonSummaryRecipe;
use crate::domain::teams::{self, TEAMS};
use crate::domain::{
    CourtsideError, Fixture, FixtureBody, FixtureFormat, Record, Result, Scalar, SeasonKey, Table,
};
use std::collections::HashMap;

/// Output fields, in order
pub const FIELDS: [&str; 10] = [
    "name",
    "conference",
    "wins",
    "losses",
    "win_pct",
    "playoff_rank",
    "conf_record",
    "playoff_wins",
    "playoff_losses",
    "finals_appearance",
];

/// Playoff results of one team for one season
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayoffHistory {
    pub wins: i64,
    pub losses: i64,
    pub finals_appearance: String,
}

impl PlayoffHistory {
    /// Pick the row for `season` out of a team's year-by-year table
    pub fn from_year_by_year(table: &Table, season: &SeasonKey) -> Option<Self> {
        table
            .records()
            .find(|r| r.get("YEAR").and_then(Scalar::as_str) == Some(season.as_str()))
            .map(|r| Self {
                wins: r.get("PO_WINS").and_then(Scalar::as_i64).unwrap_or(0),
                losses: r.get("PO_LOSSES").and_then(Scalar::as_i64).unwrap_or(0),
                finals_appearance: r
                    .get("NBA_FINALS_APPEARANCE")
                    .filter(|v| !v.is_null())
                    .map(Scalar::to_string)
                    .unwrap_or_default(),
            })
    }
}

pub async fn run(ctx: &RecipeContext<'_>, spec: &SeasonSummaryRecipe) -> Result<RecipeOutput> {
    let season = ctx.require_season()?;
    let client = ctx.stats_api()?;

    let mut standings = client
        .fetch(
            "leaguestandingsv3",
            &[
                ("LeagueID", "00"),
                ("Season", season.as_str()),
                ("SeasonType", spec.season_type.as_str()),
            ],
            0,
        )
        .await?;
    tracing::info!(recipe = %ctx.name(), teams = standings.len(), "Fetched standings");

    let mut failures = ctx.skipped_rows(&mut standings, None);
    let mut history = HashMap::new();
    for (idx, team) in TEAMS.iter().enumerate() {
        let team_id = team.id.to_string();
        let params = [
            ("TeamID", team_id.as_str()),
            ("LeagueID", "00"),
            ("PerMode", "Totals"),
            ("SeasonType", spec.season_type.as_str()),
        ];

        match client.fetch("teamyearbyyearstats", &params, 0).await {
            Ok(mut table) => {
                failures.extend(ctx.skipped_rows(&mut table, Some(team.abbr)));
                if let Some(row) = PlayoffHistory::from_year_by_year(&table, season) {
                    history.insert(team.abbr, row);
                }
                tracing::debug!(
                    recipe = %ctx.name(),
                    team = team.abbr,
                    progress = %format!("{}/{}", idx + 1, TEAMS.len()),
                    "Fetched playoff history"
                );
            }
            Err(e) => failures.push(ctx.row_failure(team.abbr, &e)),
        }
    }

    let (entries, skipped) = summarize(&standings, &history);
    for (key, error) in skipped {
        failures.push(ctx.row_failure(key, &error));
    }

    let fixture = Fixture::new(
        ctx.recipe.output_path(None),
        Some(season.clone()),
        FixtureFormat::Json,
        FIELDS.iter().map(|f| f.to_string()).collect(),
        FixtureBody::Keyed(entries),
    )?;

    Ok(RecipeOutput::fixture(fixture, failures))
}

/// Join standings rows with playoff history, keyed by team abbreviation
pub fn summarize(
    standings: &Table,
    history: &HashMap<&str, PlayoffHistory>,
) -> (Vec<(String, Record)>, Vec<(String, CourtsideError)>) {
    let mut entries = Vec::with_capacity(standings.len());
    let mut skipped = Vec::new();

    for (idx, row) in standings.records().enumerate() {
        let key = row
            .get("TeamSlug")
            .and_then(Scalar::as_str)
            .map(teams::abbr_for_slug)
            .unwrap_or_else(|| format!("row {}", idx + 1));

        match summary_record(&key, &row, history.get(key.as_str())) {
            Ok(record) => entries.push((key, record)),
            Err(e) => skipped.push((key, e)),
        }
    }

    (entries, skipped)
}

fn summary_record(key: &str, row: &Record, history: Option<&PlayoffHistory>) -> Result<Record> {
    let field = |column: &str| -> Result<Scalar> {
        row.get(column)
            .cloned()
            .ok_or_else(|| CourtsideError::MissingField {
                key: key.to_string(),
                field: column.to_string(),
            })
    };
    let integer = |column: &str| -> Result<i64> {
        field(column)?
            .as_i64()
            .ok_or_else(|| CourtsideError::MalformedRow {
                key: key.to_string(),
                reason: format!("{column} is not an integer"),
            })
    };

    let win_pct = field("WinPCT")?
        .as_f64()
        .ok_or_else(|| CourtsideError::MalformedRow {
            key: key.to_string(),
            reason: "WinPCT is not a number".to_string(),
        })?;
    let playoff_rank = field("PlayoffRank")?.as_i64();
    let history = history.cloned().unwrap_or_default();

    Ok(Record::new()
        .with("name", field("TeamName")?)
        .with("conference", field("Conference")?)
        .with("wins", integer("WINS")?)
        .with("losses", integer("LOSSES")?)
        .with("win_pct", win_pct)
        .with("playoff_rank", playoff_rank)
        .with("conf_record", field("ConferenceRecord")?)
        .with("playoff_wins", history.wins)
        .with("playoff_losses", history.losses)
        .with("finals_appearance", history.finals_appearance))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standings() -> Table {
        let mut table = Table::new(
            [
                "TeamID", "TeamName", "TeamSlug", "Conference", "WINS", "LOSSES", "WinPCT",
                "PlayoffRank", "ConferenceRecord",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        );
        table.rows = vec![
            vec![
                Scalar::Int(1610612760),
                "Thunder".into(),
                "thunder".into(),
                "West".into(),
                Scalar::Int(68),
                Scalar::Int(14),
                Scalar::Float(0.829),
                Scalar::Int(1),
                "39-13".into(),
            ],
            vec![
                Scalar::Int(1610612762),
                "Jazz".into(),
                "jazz".into(),
                "West".into(),
                Scalar::Int(17),
                Scalar::Int(65),
                Scalar::Float(0.207),
                Scalar::Null,
                "9-43".into(),
            ],
            vec![
                Scalar::Int(0),
                "Sonics".into(),
                "supersonics".into(),
                "West".into(),
                "n/a".into(),
                Scalar::Int(0),
                Scalar::Float(0.0),
                Scalar::Null,
                "0-0".into(),
            ],
        ];
        table
    }

    #[test]
    fn test_summarize_joins_playoff_history() {
        let mut history = HashMap::new();
        history.insert(
            "OKC",
            PlayoffHistory {
                wins: 16,
                losses: 7,
                finals_appearance: "LEAGUE CHAMPION".to_string(),
            },
        );

        let (entries, skipped) = summarize(&standings(), &history);

        assert_eq!(entries.len(), 2);
        let (key, okc) = &entries[0];
        assert_eq!(key, "OKC");
        assert_eq!(okc.field_names().collect::<Vec<_>>(), FIELDS);
        assert_eq!(okc.get("playoff_wins"), Some(&Scalar::Int(16)));
        assert_eq!(okc.get("finals_appearance"), Some(&Scalar::from("LEAGUE CHAMPION")));

        let (key, uta) = &entries[1];
        assert_eq!(key, "UTA");
        assert_eq!(uta.get("playoff_rank"), Some(&Scalar::Null));
        assert_eq!(uta.get("playoff_wins"), Some(&Scalar::Int(0)));
        assert_eq!(uta.get("finals_appearance"), Some(&Scalar::from("")));

        // unknown slug falls back to its first three letters
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "SUP");
    }

    #[test]
    fn test_history_row_for_season() {
        let mut table = Table::new(
            ["YEAR", "PO_WINS", "PO_LOSSES", "NBA_FINALS_APPEARANCE"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        table.rows = vec![
            vec!["2023-24".into(), Scalar::Int(5), Scalar::Int(5), "N/A".into()],
            vec!["2024-25".into(), Scalar::Int(16), Scalar::Int(7), "LEAGUE CHAMPION".into()],
        ];

        let season = SeasonKey::new("2024-25").unwrap();
        let history = PlayoffHistory::from_year_by_year(&table, &season).unwrap();
        assert_eq!(history.wins, 16);
        assert_eq!(history.finals_appearance, "LEAGUE CHAMPION");

        let missing = SeasonKey::new("1999-00").unwrap();
        assert!(PlayoffHistory::from_year_by_year(&table, &missing).is_none());
    }
}
