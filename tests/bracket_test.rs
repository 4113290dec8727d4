//! Integration tests for the playoff bracket data file

use courtside::domain::bracket::{load_brackets, parse_brackets};
use courtside::domain::{teams, CourtsideError};

const BRACKETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/playoff_brackets.toml");

#[test]
fn test_shipped_brackets_load() {
    let brackets = load_brackets(BRACKETS).unwrap();

    let champions: Vec<(&str, &str)> = brackets
        .iter()
        .map(|b| (b.season.as_str(), b.champion.as_str()))
        .collect();
    assert_eq!(
        champions,
        vec![("2022-23", "DEN"), ("2023-24", "BOS"), ("2024-25", "OKC")]
    );
}

#[test]
fn test_shipped_brackets_use_known_teams() {
    let brackets = load_brackets(BRACKETS).unwrap();

    for bracket in &brackets {
        for conference in [&bracket.east, &bracket.west] {
            let series = conference
                .first_round
                .iter()
                .chain(&conference.semifinals)
                .chain(std::iter::once(&conference.finals));
            for s in series {
                for team in &s.teams {
                    assert!(
                        teams::by_abbr(team.as_str()).is_some(),
                        "{} {}: unknown team {team}",
                        bracket.season,
                        conference.conference
                    );
                }
            }
        }
    }
}

#[test]
fn test_finals_tally_is_reported_from_first_team() {
    let brackets = load_brackets(BRACKETS).unwrap();
    let latest = brackets.last().unwrap();

    assert_eq!(latest.finals.tally().unwrap(), (4, 3));
    assert_eq!(latest.finals_line(), "OKC vs IND (4-3)");
    assert_eq!(latest.finals.loser().as_str(), "IND");
}

#[test]
fn test_edited_bracket_with_bad_tally_is_rejected() {
    let content = std::fs::read_to_string(BRACKETS).unwrap();
    // Give the 2022-23 champion a 3-4 finals
    let edited = content.replacen(
        "winner = \"DEN\"\nteams = [\"DEN\", \"MIA\"]\nseries = \"4-1\"",
        "winner = \"DEN\"\nteams = [\"DEN\", \"MIA\"]\nseries = \"3-4\"",
        1,
    );
    assert_ne!(content, edited, "fixture text changed; update the test");

    let err = parse_brackets(&edited).unwrap_err();
    assert!(matches!(err, CourtsideError::Validation(_)));
    assert!(err.to_string().contains("2022-23 finals"));
}

#[test]
fn test_missing_bracket_file_is_io_error() {
    let err = load_brackets("no/such/brackets.toml").unwrap_err();
    assert!(matches!(err, CourtsideError::Io(_)));
}
