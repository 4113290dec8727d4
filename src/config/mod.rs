//! Configuration management for courtside.
//!
//! # Overview
//!
//! courtside reads one TOML file (default `courtside.toml`) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `COURTSIDE_<SECTION>_<KEY>` overrides for scalar settings
//! - Default values for optional settings
//! - Validation of every section and recipe before anything runs
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level, dry run
//! - [`DatabaseConfig`] - SQLite file or PostgreSQL connection
//! - [`StatsApiConfig`] - stats.nba.com base URL, headers, [`RateLimitConfig`]
//! - [`LoggingConfig`] - rolling JSON log files
//! - [`RecipeConfig`] - one entry per fixture, see [`RecipeKind`]
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [database]
//! target = "sqlite"
//!
//! [database.sqlite]
//! path = "data/nba.sqlite"
//!
//! [stats_api.rate_limit]
//! policy = "fixed_interval"
//! interval_ms = 600
//!
//! [[recipes]]
//! name = "teams_simple"
//! kind = "table"
//! query = "SELECT id, full_name, abbreviation FROM team"
//! output = "js/data/teams_simple.json"
//!
//! [[recipes]]
//! name = "brackets"
//! kind = "playoff_brackets"
//! output = "data/nba_api/playoff_bracket_{season}.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BracketsRecipe, CourtsideConfig, DatabaseConfig, DatabaseTarget,
    DerivedSpec, FieldSpec, FilterOp, FilterSpec, FreeThrowsRecipe, LoggingConfig, LogosRecipe,
    PostgreSQLConfig, RateLimitConfig, RecipeConfig, RecipeKind, ScheduleRecipe,
    SeasonSummaryRecipe, Shape, SortSpec, SourceKind, SqliteConfig, StatsApiConfig, TableRecipe,
    SEASON_PLACEHOLDER,
};
pub use secret::{secret_string, SecretString, SecretValue};
