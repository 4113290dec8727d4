//! Per-team game schedules
//!
//! One `teamgamelog` call per team, paced by the stats API limiter. The
//! JSON fixture is keyed by team abbreviation; the optional CSV flattens
//! every game into one row.

use super::{substitute, RecipeContext, RecipeOutput};
use crate::config::ScheduleRecipe;
use crate::domain::teams::{Team, TEAMS};
use crate::domain::{
    CourtsideError, Fixture, FixtureBody, FixtureFormat, Record, Result, Scalar, Table,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

const ENDPOINT: &str = "teamgamelog";

/// Columns of the flat games CSV
pub const CSV_FIELDS: [&str; 7] = ["team", "team_name", "date", "result", "opponent", "home", "points"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    /// ISO date when the source date parses, the source text otherwise
    pub date: String,
    pub game_date_display: String,
    pub result: String,
    pub opponent: String,
    pub home: Option<bool>,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSchedule {
    pub team_name: String,
    pub games: Vec<Game>,
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TeamSchedule {
    fn new(team: &Team, games: Vec<Game>) -> Self {
        let wins = games.iter().filter(|g| g.result == "W").count();
        let losses = games.iter().filter(|g| g.result == "L").count();
        Self {
            team_name: team.name.to_string(),
            total_games: games.len(),
            games,
            wins,
            losses,
            error: None,
        }
    }

    fn failed(team: &Team, error: &CourtsideError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(team, Vec::new())
        }
    }
}

pub async fn run(ctx: &RecipeContext<'_>, spec: &ScheduleRecipe) -> Result<RecipeOutput> {
    let season = ctx.require_season()?;
    let client = ctx.stats_api()?;

    let mut document = Map::new();
    let mut csv_rows = Vec::new();
    let mut output = RecipeOutput::default();

    for (idx, team) in TEAMS.iter().enumerate() {
        let params = [
            ("TeamID", team.id.to_string()),
            ("Season", season.to_string()),
            ("SeasonType", spec.season_type.clone()),
            ("LeagueID", "00".to_string()),
            ("DateFrom", String::new()),
            ("DateTo", String::new()),
        ];

        let schedule = match client.fetch(ENDPOINT, &params, 0).await {
            Ok(mut table) => {
                output.failures.extend(ctx.skipped_rows(&mut table, Some(team.abbr)));
                let (schedule, skipped) = build_schedule(team, &table);
                for (key, error) in skipped {
                    output.failures.push(ctx.row_failure(key, &error));
                }
                schedule
            }
            Err(e) => {
                output.failures.push(ctx.row_failure(team.abbr, &e));
                TeamSchedule::failed(team, &e)
            }
        };

        tracing::info!(
            recipe = %ctx.name(),
            team = team.abbr,
            progress = %format!("{}/{}", idx + 1, TEAMS.len()),
            games = schedule.total_games,
            wins = schedule.wins,
            losses = schedule.losses,
            "Fetched schedule"
        );

        csv_rows.extend(schedule.games.iter().map(|g| csv_record(team, g)));
        document.insert(team.abbr.to_string(), serde_json::to_value(&schedule)?);
    }

    output.fixtures.push(Fixture::new(
        ctx.recipe.output_path(None),
        Some(season.clone()),
        FixtureFormat::Json,
        Vec::new(),
        FixtureBody::Document(Value::Object(document)),
    )?);

    if let Some(csv_output) = &spec.csv_output {
        output.fixtures.push(Fixture::new(
            PathBuf::from(substitute(csv_output, Some(season), None)),
            Some(season.clone()),
            FixtureFormat::Csv,
            CSV_FIELDS.iter().map(|f| f.to_string()).collect(),
            FixtureBody::Rows(csv_rows),
        )?);
    }

    Ok(output)
}

/// Build one team's schedule from its game log
///
/// Games without a W/L result are returned as skipped so that wins and
/// losses always add up to the games listed.
pub fn build_schedule(team: &Team, table: &Table) -> (TeamSchedule, Vec<(String, CourtsideError)>) {
    let mut games = Vec::with_capacity(table.len());
    let mut skipped = Vec::new();

    for (idx, record) in table.records().enumerate() {
        let key = format!("{} game {}", team.abbr, idx + 1);
        match parse_game(&key, &record) {
            Ok(game) => games.push(game),
            Err(e) => skipped.push((key, e)),
        }
    }

    (TeamSchedule::new(team, games), skipped)
}

fn parse_game(key: &str, record: &Record) -> Result<Game> {
    let text = |column: &str| -> Result<String> {
        match record.get(column) {
            Some(Scalar::Null) | None => Err(CourtsideError::MissingField {
                key: key.to_string(),
                field: column.to_string(),
            }),
            Some(value) => Ok(value.to_string()),
        }
    };

    let display = text("GAME_DATE")?;
    let matchup = text("MATCHUP")?;
    let result = text("WL")?;
    if result != "W" && result != "L" {
        return Err(CourtsideError::MalformedRow {
            key: key.to_string(),
            reason: format!("unexpected result '{result}'"),
        });
    }

    let (opponent, home) = parse_matchup(&matchup);
    let points = record.get("PTS").and_then(Scalar::as_i64).unwrap_or(0);

    Ok(Game {
        date: normalize_date(&display),
        game_date_display: display,
        result,
        opponent,
        home,
        points,
    })
}

/// `"GSW vs. LAL"` is a home game, `"GSW @ LAL"` an away game
pub fn parse_matchup(matchup: &str) -> (String, Option<bool>) {
    if let Some((_, opponent)) = matchup.split_once(" vs. ") {
        (opponent.to_string(), Some(true))
    } else if let Some((_, opponent)) = matchup.split_once(" @ ") {
        (opponent.to_string(), Some(false))
    } else {
        ("UNK".to_string(), None)
    }
}

/// `"Apr 13, 2025"` becomes `"2025-04-13"`; anything else is kept verbatim
pub fn normalize_date(display: &str) -> String {
    NaiveDate::parse_from_str(display, "%b %d, %Y")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| display.to_string())
}

fn csv_record(team: &Team, game: &Game) -> Record {
    Record::new()
        .with("team", team.abbr)
        .with("team_name", team.name)
        .with("date", game.date.as_str())
        .with("result", game.result.as_str())
        .with("opponent", game.opponent.as_str())
        .with("home", game.home)
        .with("points", game.points)
}
