//! Explore command implementation
//!
//! This module implements the `explore` command, which prints the tables of
//! the configured database with their columns, row counts and a few sample
//! rows. It is the starting point for writing `table` recipes.

use crate::adapters::database::{create_database_source, DatabaseSource};
use crate::config::load_config;
use crate::domain::Table;
use clap::Args;

/// Widest a sample cell is printed before it is cut
const MAX_CELL_WIDTH: usize = 24;

/// Arguments for the explore command
#[derive(Args, Debug)]
pub struct ExploreArgs {
    /// Sample rows shown per table (0 disables samples)
    #[arg(long, default_value_t = 3)]
    pub samples: usize,

    /// Only describe this table
    #[arg(long)]
    pub table: Option<String>,
}

impl ExploreArgs {
    /// Execute the explore command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Exploring database");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let Some(db_config) = &config.database else {
            println!("❌ No [database] section in {config_path}");
            return Ok(2);
        };

        let source = match create_database_source(db_config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to database");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        match self.explore(source.as_ref()).await {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "Explore failed");
                println!("❌ {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    async fn explore(&self, source: &(dyn DatabaseSource + Send + Sync)) -> crate::domain::Result<()> {
        let mut tables = source.describe().await?;
        if let Some(only) = &self.table {
            tables.retain(|t| &t.name == only);
            if tables.is_empty() {
                println!("No table named '{only}'.");
                return Ok(());
            }
        }

        println!("🗄️  {} database: {} table(s)", source.backend(), tables.len());
        for table in &tables {
            println!("  - {}", table.name);
        }
        println!();
        println!("{}", "=".repeat(60));

        for table in &tables {
            println!();
            println!("Table '{}' ({} rows)", table.name, table.row_count);
            for column in &table.columns {
                println!("  - {} ({})", column.name, column.type_name);
            }

            if self.samples > 0 && table.row_count > 0 {
                let sample = source.sample(&table.name, self.samples).await?;
                println!("  Sample rows:");
                for line in render_sample(&sample) {
                    println!("    {line}");
                }
            }
            println!("{}", "-".repeat(40));
        }

        Ok(())
    }
}

/// Sample rows as aligned text lines, header first
fn render_sample(table: &Table) -> Vec<String> {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| clip(&v.to_csv_field())).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(clip(name).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<String>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(table.columns.iter().map(|c| clip(c)).collect())];
    lines.extend(cells.into_iter().map(line));
    lines
}

fn clip(value: &str) -> String {
    if value.chars().count() > MAX_CELL_WIDTH {
        let cut: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scalar;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn config_file(db_path: &std::path::Path) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
target = "sqlite"

[database.sqlite]
path = "{}"
"#,
            db_path.display()
        )
        .unwrap();
        file
    }

    #[test]
    fn test_render_sample_aligns_columns() {
        let table = Table {
            columns: vec!["abbreviation".to_string(), "city".to_string()],
            rows: vec![
                vec![Scalar::Text("GSW".into()), Scalar::Text("San Francisco".into())],
                vec![Scalar::Text("BOS".into()), Scalar::Null],
            ],
            ..Default::default()
        };

        let lines = render_sample(&table);
        assert_eq!(lines[0], "abbreviation | city");
        assert_eq!(lines[1], "GSW          | San Francisco");
        assert_eq!(lines[2], "BOS          |");
    }

    #[test]
    fn test_clip_long_values() {
        let long = "x".repeat(40);
        assert_eq!(clip(&long).chars().count(), MAX_CELL_WIDTH);
        assert_eq!(clip("short"), "short");
    }

    #[tokio::test]
    async fn test_explore_sqlite_database() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nba.sqlite");
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE team (id INTEGER, abbreviation TEXT);
             INSERT INTO team VALUES (1610612738, 'BOS');",
        )
        .unwrap();
        drop(conn);

        let file = config_file(&db_path);
        let args = ExploreArgs {
            samples: 3,
            table: None,
        };
        assert_eq!(args.execute(file.path().to_str().unwrap()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_explore_missing_database_is_connection_error() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir.path().join("missing.sqlite"));

        let args = ExploreArgs {
            samples: 3,
            table: None,
        };
        assert_eq!(args.execute(file.path().to_str().unwrap()).await.unwrap(), 4);
    }
}
