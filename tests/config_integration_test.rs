//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX to avoid
//! interference between tests.

use courtside::config::{load_config, RateLimitConfig, RecipeKind, SourceKind};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("COURTSIDE_APPLICATION_LOG_LEVEL");
    std::env::remove_var("COURTSIDE_APPLICATION_DRY_RUN");
    std::env::remove_var("COURTSIDE_DATABASE_SQLITE_PATH");
    std::env::remove_var("COURTSIDE_STATS_API_RATE_LIMIT_INTERVAL_MS");
    std::env::remove_var("TEST_NBA_SQLITE_PATH");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_shipped_config_is_valid() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/courtside.toml")).unwrap();

    let names: Vec<&str> = config.recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "team_stats",
            "top_players",
            "scoring_trends",
            "teams_simple",
            "standings",
            "playoff_history",
            "season_summary",
            "team_schedules",
            "free_throws",
            "playoff_brackets",
            "logos",
        ]
    );
    assert_eq!(
        config.stats_api.rate_limit,
        RateLimitConfig::FixedInterval { interval_ms: 600 }
    );

    let standings = &config.recipes[4];
    assert_eq!(standings.output_path(None), "data/nba_api/standings_2024-25.csv");
    let RecipeKind::Table(table) = &standings.kind else {
        panic!("standings should be a table recipe");
    };
    assert_eq!(table.source, SourceKind::StatsApi);
    assert_eq!(table.fields.len(), 9);

    let history = &config.recipes[5];
    let RecipeKind::Table(table) = &history.kind else {
        panic!("playoff_history should be a table recipe");
    };
    assert!(table.per_team);
    assert_eq!(table.fields[0].column(), "team_key");
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_NBA_SQLITE_PATH", "/srv/nba/nba.sqlite");

    let temp_file = write_config(
        r#"
[database]
target = "sqlite"

[database.sqlite]
path = "${TEST_NBA_SQLITE_PATH}"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(
        config.database.unwrap().sqlite.path,
        "/srv/nba/nba.sqlite"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[database.sqlite]
path = "${TEST_NBA_SQLITE_PATH}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("Missing required environment variables"));
    assert!(err.contains("TEST_NBA_SQLITE_PATH"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("COURTSIDE_APPLICATION_LOG_LEVEL", "debug");
    std::env::set_var("COURTSIDE_APPLICATION_DRY_RUN", "true");
    std::env::set_var("COURTSIDE_STATS_API_RATE_LIMIT_INTERVAL_MS", "0");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.stats_api.rate_limit, RateLimitConfig::None);

    cleanup_env_vars();
}

#[test]
fn test_invalid_season_key_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[[recipes]]
name = "season_summary"
kind = "season_summary"
season = "2024-26"
output = "data/nba_api/team_season_summary_{season}.json"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("Failed to parse TOML"));
}

#[test]
fn test_season_keyed_output_must_name_the_season() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[[recipes]]
name = "season_summary"
kind = "season_summary"
season = "2024-25"
output = "data/nba_api/team_season_summary.json"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("Configuration validation failed"));
    assert!(err.contains("must contain {season}"));
}

#[test]
fn test_season_summary_requires_season() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[[recipes]]
name = "team_schedules"
kind = "team_schedules"
output = "data/nba_api/team_schedules.json"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("requires a season"));
}

#[test]
fn test_select_recipes() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/courtside.toml")).unwrap();

    let selected = config
        .select_recipes(&["logos".to_string(), "standings".to_string()])
        .unwrap();
    // Configuration order wins over selection order
    let names: Vec<&str> = selected.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["standings", "logos"]);

    let err = config
        .select_recipes(&["standings".to_string(), "nope".to_string()])
        .unwrap_err();
    assert_eq!(err, "Unknown recipe(s): nope");
}
