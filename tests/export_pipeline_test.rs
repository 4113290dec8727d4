//! End-to-end export runs against a temporary SQLite database and a mocked
//! stats API

use courtside::config::{load_config, CourtsideConfig};
use courtside::core::export::ExportCoordinator;
use courtside::core::output::WriteStatus;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

const STANDINGS_BODY: &str = r#"{"resultSets": [{"name": "Standings",
    "headers": ["TeamID", "TeamName", "Conference", "WINS", "LOSSES"],
    "rowSet": [
        [1610612760, "Thunder", "West", 68, 14],
        [1610612739, "Cavaliers", "East", 64, 18],
        [1610612738, "Celtics", "East", 61, 21]
    ]}]}"#;

fn create_database(path: &Path) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE team (id INTEGER, full_name TEXT, abbreviation TEXT, city TEXT, year_founded INTEGER);
         INSERT INTO team VALUES (1610612738, 'Boston Celtics', 'BOS', 'Boston', 1946);
         INSERT INTO team VALUES (1610612760, 'Oklahoma City Thunder', 'OKC', 'Oklahoma City', 1967);
         INSERT INTO team VALUES (1610612739, 'Cleveland Cavaliers', 'CLE', 'Cleveland', 1970);",
    )
    .unwrap();
}

fn write_config(dir: &Path, stats_url: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[database]
target = "sqlite"

[database.sqlite]
path = "{dir}/nba.sqlite"

[stats_api]
base_url = "{stats_url}"

[stats_api.rate_limit]
policy = "none"

[logging]
local_enabled = false

[[recipes]]
name = "teams_simple"
kind = "table"
query = "SELECT abbreviation, full_name, city, year_founded FROM team ORDER BY year_founded"
output = "{dir}/js/data/teams_simple.json"
fields = [
    {{ name = "team", column = "abbreviation" }},
    {{ name = "name", column = "full_name" }},
    {{ name = "city" }},
    {{ name = "year_founded" }},
]

[[recipes]]
name = "standings"
kind = "table"
source = "stats_api"
endpoint = "leaguestandingsv3"
season = "2024-25"
params = {{ LeagueID = "00", Season = "{{season}}", SeasonType = "Regular Season" }}
output = "{dir}/data/nba_api/standings_{{season}}.csv"
fields = [{{ name = "TeamName" }}, {{ name = "Conference" }}, {{ name = "WINS" }}, {{ name = "LOSSES" }}]

[[recipes]]
name = "playoff_brackets"
kind = "playoff_brackets"
input = "{manifest}/data/playoff_brackets.toml"
output = "{dir}/data/nba_api/playoff_bracket_{{season}}.json"
"#,
        dir = dir.display(),
        stats_url = stats_url,
        manifest = env!("CARGO_MANIFEST_DIR"),
    )
    .unwrap();
    file.flush().unwrap();
    file
}

async fn coordinator(config: &CourtsideConfig, recipes: &[&str], dry_run: bool) -> ExportCoordinator {
    let names: Vec<String> = recipes.iter().map(|s| s.to_string()).collect();
    ExportCoordinator::new(config, &names, dry_run).await.unwrap()
}

#[tokio::test]
async fn test_full_export_then_rerun_is_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let standings = server
        .mock("GET", "/leaguestandingsv3")
        .match_query(mockito::Matcher::UrlEncoded(
            "Season".into(),
            "2024-25".into(),
        ))
        .with_status(200)
        .with_body(STANDINGS_BODY)
        .expect(2)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    create_database(&dir.path().join("nba.sqlite"));
    let config_file = write_config(dir.path(), &server.url());
    let config = load_config(config_file.path()).unwrap();

    let first = coordinator(&config, &[], false).await.execute_export().await;
    assert!(first.is_successful());
    assert_eq!(first.exit_code(), 0);
    // 1 table + 1 CSV + 3 bracket seasons
    assert_eq!(first.files_written(), 5);
    assert_eq!(first.row_failures(), 0);

    let teams = fs::read_to_string(dir.path().join("js/data/teams_simple.json")).unwrap();
    let teams: serde_json::Value = serde_json::from_str(&teams).unwrap();
    assert_eq!(teams[0]["team"], "BOS");
    assert_eq!(teams[2]["name"], "Cleveland Cavaliers");

    let csv = fs::read_to_string(dir.path().join("data/nba_api/standings_2024-25.csv")).unwrap();
    assert_eq!(
        csv,
        "TeamName,Conference,WINS,LOSSES\nThunder,West,68,14\nCavaliers,East,64,18\nCeltics,East,61,21\n"
    );

    assert!(dir
        .path()
        .join("data/nba_api/playoff_bracket_2023-24.json")
        .exists());

    let second = coordinator(&config, &[], false).await.execute_export().await;
    assert_eq!(second.files_written(), 0);
    assert_eq!(second.files_unchanged(), 5);

    standings.assert_async().await;
}

#[tokio::test]
async fn test_dry_run_leaves_no_files() {
    let dir = TempDir::new().unwrap();
    create_database(&dir.path().join("nba.sqlite"));
    let config_file = write_config(dir.path(), "http://127.0.0.1:9");
    let config = load_config(config_file.path()).unwrap();

    let summary = coordinator(&config, &["teams_simple", "playoff_brackets"], true)
        .await
        .execute_export()
        .await;

    assert!(summary.dry_run);
    assert_eq!(summary.files_skipped(), 4);
    assert_eq!(summary.recipes[0].name, "teams_simple");
    assert_eq!(summary.recipes[0].records, 3);
    assert!(!dir.path().join("js").exists());
    assert!(!dir.path().join("data").exists());
}

#[tokio::test]
async fn test_unreachable_api_fails_only_its_recipe() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/leaguestandingsv3")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    create_database(&dir.path().join("nba.sqlite"));
    let config_file = write_config(dir.path(), &server.url());
    let config = load_config(config_file.path()).unwrap();

    let summary = coordinator(&config, &[], false).await.execute_export().await;

    let failed: Vec<&str> = summary
        .failed_recipes()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(failed, vec!["standings"]);
    assert_eq!(summary.exit_code(), 4);
    assert!(dir.path().join("js/data/teams_simple.json").exists());
    assert!(!dir.path().join("data/nba_api/standings_2024-25.csv").exists());

    let brackets = summary
        .recipes
        .iter()
        .find(|r| r.name == "playoff_brackets")
        .unwrap();
    assert_eq!(brackets.count(WriteStatus::Written), 3);
}
