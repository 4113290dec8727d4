//! Playoff brackets
//!
//! Brackets are hand-maintained data, loaded from a TOML file and validated
//! before anything is written. A bracket composes series into conference
//! rounds, conferences into the overall bracket.

use super::errors::CourtsideError;
use super::ids::{SeasonKey, TeamAbbr};
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Games needed to win a series
pub const SERIES_WINS: u8 = 4;

/// One best-of-seven series
///
/// `series` is `"<wins of teams[0]>-<wins of teams[1]>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub winner: TeamAbbr,
    pub teams: [TeamAbbr; 2],
    pub series: String,
}

impl Series {
    /// Parse the tally into `(wins of teams[0], wins of teams[1])`
    pub fn tally(&self) -> Result<(u8, u8)> {
        parse_tally(&self.series)
    }

    pub fn loser(&self) -> &TeamAbbr {
        if self.teams[0] == self.winner {
            &self.teams[1]
        } else {
            &self.teams[0]
        }
    }

    /// Check winner, teams and tally agree
    pub fn validate(&self, label: &str) -> Result<()> {
        if self.teams[0] == self.teams[1] {
            return Err(invalid(format!(
                "{label}: a team cannot play itself ({})",
                self.teams[0]
            )));
        }
        if !self.teams.contains(&self.winner) {
            return Err(invalid(format!(
                "{label}: winner {} is not one of {} / {}",
                self.winner, self.teams[0], self.teams[1]
            )));
        }

        let (first, second) = self.tally()?;
        let winner_index = if self.teams[0] == self.winner { 0 } else { 1 };
        let (winner_wins, loser_wins) = if winner_index == 0 {
            (first, second)
        } else {
            (second, first)
        };
        if winner_wins != SERIES_WINS || loser_wins >= SERIES_WINS {
            return Err(invalid(format!(
                "{label}: series {} does not give {} (teams[{winner_index}]) {SERIES_WINS} wins",
                self.series, self.winner
            )));
        }
        Ok(())
    }
}

/// Parse a `"a-b"` tally with both sides in `0..=4`
pub fn parse_tally(tally: &str) -> Result<(u8, u8)> {
    let parse_side = |s: &str| -> Option<u8> {
        if s.len() == 1 {
            s.parse::<u8>().ok().filter(|n| *n <= SERIES_WINS)
        } else {
            None
        }
    };

    tally
        .split_once('-')
        .and_then(|(a, b)| Some((parse_side(a)?, parse_side(b)?)))
        .ok_or_else(|| invalid(format!("Invalid series tally '{tally}'. Expected a-b with 0-4")))
}

/// One conference's side of the bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    pub conference: String,
    pub finals: Series,
    pub semifinals: Vec<Series>,
    pub first_round: Vec<Series>,
}

impl Conference {
    fn validate(&self, season: &SeasonKey) -> Result<()> {
        let label = format!("{season} {}", self.conference);

        if self.semifinals.len() != 2 {
            return Err(invalid(format!(
                "{label}: expected 2 semifinal series, found {}",
                self.semifinals.len()
            )));
        }
        if self.first_round.len() != 4 {
            return Err(invalid(format!(
                "{label}: expected 4 first round series, found {}",
                self.first_round.len()
            )));
        }

        self.finals.validate(&format!("{label} finals"))?;
        for (i, series) in self.semifinals.iter().enumerate() {
            series.validate(&format!("{label} semifinal {}", i + 1))?;
        }
        for (i, series) in self.first_round.iter().enumerate() {
            series.validate(&format!("{label} first round {}", i + 1))?;
        }

        let first_round_teams = teams_of(&self.first_round);
        if first_round_teams.len() != 8 {
            return Err(invalid(format!(
                "{label}: a team appears in more than one first round series"
            )));
        }

        advance(
            &format!("{label} semifinals"),
            &self.first_round,
            &teams_of(&self.semifinals),
        )?;
        advance(
            &format!("{label} finals"),
            &self.semifinals,
            &self.finals.teams.iter().collect(),
        )
    }
}

/// A full season bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub season: SeasonKey,
    pub champion: TeamAbbr,
    pub east: Conference,
    pub west: Conference,
    pub finals: Series,
}

impl PlayoffBracket {
    /// Check every series and that each round is made of the previous
    /// round's winners
    pub fn validate(&self) -> Result<()> {
        self.east.validate(&self.season)?;
        self.west.validate(&self.season)?;

        let label = format!("{} finals", self.season);
        self.finals.validate(&label)?;

        let champions: HashSet<&TeamAbbr> =
            [&self.east.finals.winner, &self.west.finals.winner].into();
        let finalists: HashSet<&TeamAbbr> = self.finals.teams.iter().collect();
        if champions != finalists {
            return Err(invalid(format!(
                "{label}: teams {} / {} are not the conference champions {} / {}",
                self.finals.teams[0],
                self.finals.teams[1],
                self.east.finals.winner,
                self.west.finals.winner
            )));
        }

        if self.champion != self.finals.winner {
            return Err(invalid(format!(
                "{}: champion {} is not the finals winner {}",
                self.season, self.champion, self.finals.winner
            )));
        }
        Ok(())
    }

    /// One-line description of the finals, e.g. `OKC vs IND (4-3)`
    pub fn finals_line(&self) -> String {
        format!(
            "{} vs {} ({})",
            self.finals.teams[0], self.finals.teams[1], self.finals.series
        )
    }
}

#[derive(Debug, Deserialize)]
struct BracketFile {
    #[serde(default)]
    brackets: Vec<PlayoffBracket>,
}

/// Load and validate every bracket in a TOML data file
///
/// Seasons must be unique. The brackets come back in file order.
pub fn load_brackets(path: impl AsRef<Path>) -> Result<Vec<PlayoffBracket>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        CourtsideError::Io(format!(
            "Failed to read bracket data {}: {e}",
            path.display()
        ))
    })?;
    parse_brackets(&content)
}

/// Parse and validate brackets from TOML text
pub fn parse_brackets(content: &str) -> Result<Vec<PlayoffBracket>> {
    let file: BracketFile = toml::from_str(content)
        .map_err(|e| invalid(format!("Invalid bracket data: {e}")))?;

    let mut seen = HashSet::new();
    for bracket in &file.brackets {
        if !seen.insert(bracket.season.clone()) {
            return Err(invalid(format!(
                "Duplicate bracket for season {}",
                bracket.season
            )));
        }
        bracket.validate()?;
    }
    Ok(file.brackets)
}

fn teams_of(series: &[Series]) -> HashSet<&TeamAbbr> {
    series.iter().flat_map(|s| s.teams.iter()).collect()
}

fn advance(label: &str, previous: &[Series], next_teams: &HashSet<&TeamAbbr>) -> Result<()> {
    let winners: HashSet<&TeamAbbr> = previous.iter().map(|s| &s.winner).collect();
    if &winners != next_teams {
        let mut expected: Vec<&str> = winners.iter().map(|t| t.as_str()).collect();
        let mut found: Vec<&str> = next_teams.iter().map(|t| t.as_str()).collect();
        expected.sort_unstable();
        found.sort_unstable();
        return Err(invalid(format!(
            "{label}: teams [{}] are not the previous round's winners [{}]",
            found.join(", "),
            expected.join(", ")
        )));
    }
    Ok(())
}

fn invalid(message: String) -> CourtsideError {
    CourtsideError::Validation(message)
}
