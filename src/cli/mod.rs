//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for courtside using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// courtside - NBA statistics fixture exporter
#[derive(Parser, Debug)]
#[command(name = "courtside")]
#[command(version, about, long_about = None)]
#[command(author = "Courtside Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "courtside.toml", env = "COURTSIDE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COURTSIDE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the configured recipes and write their fixtures
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show each recipe's output files with size, records and checksum
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// List database tables, columns, row counts and sample rows
    Explore(commands::explore::ExploreArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["courtside", "export"]);
        assert_eq!(cli.config, "courtside.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["courtside", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["courtside", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_recipes() {
        let cli = Cli::parse_from([
            "courtside",
            "export",
            "--recipe",
            "standings,team_schedules",
            "--dry-run",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.recipe, vec!["standings", "team_schedules"]);
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["courtside", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["courtside", "status"]);
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["courtside", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_explore() {
        let cli = Cli::parse_from(["courtside", "explore", "--samples", "5"]);
        let Commands::Explore(args) = cli.command else {
            panic!("expected explore");
        };
        assert_eq!(args.samples, 5);
    }
}
