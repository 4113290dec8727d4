//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CourtsideConfig, DatabaseConfig, PostgreSQLConfig, RateLimitConfig};
use super::secret::secret_string;
use crate::domain::errors::CourtsideError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CourtsideConfig
/// 4. Applies environment variable overrides (COURTSIDE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `CourtsideError::Configuration` if the file is missing or
/// unreadable, a referenced variable is unset, the TOML is malformed, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use courtside::config::loader::load_config;
///
/// let config = load_config("courtside.toml").expect("Failed to load config");
/// println!("{} recipes", config.recipes.len());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CourtsideConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CourtsideError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CourtsideError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CourtsideConfig = toml::from_str(&contents)
        .map_err(|e| CourtsideError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CourtsideError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every unset variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CourtsideError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CourtsideError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using COURTSIDE_* prefix
///
/// Environment variables follow the pattern: COURTSIDE_<SECTION>_<KEY>
/// For example: COURTSIDE_DATABASE_SQLITE_PATH, COURTSIDE_STATS_API_BASE_URL
fn apply_env_overrides(config: &mut CourtsideConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("COURTSIDE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("COURTSIDE_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Database overrides; any of these creates the section if it is absent
    if let Ok(val) = std::env::var("COURTSIDE_DATABASE_TARGET") {
        let target = val.parse().map_err(CourtsideError::Configuration)?;
        config.database.get_or_insert_with(DatabaseConfig::default).target = target;
    }
    if let Ok(val) = std::env::var("COURTSIDE_DATABASE_SQLITE_PATH") {
        config
            .database
            .get_or_insert_with(DatabaseConfig::default)
            .sqlite
            .path = val;
    }
    if let Ok(val) = std::env::var("COURTSIDE_DATABASE_POSTGRESQL_CONNECTION_STRING") {
        let database = config.database.get_or_insert_with(DatabaseConfig::default);
        match database.postgresql.as_mut() {
            Some(pg) => pg.connection_string = secret_string(val),
            None => database.postgresql = Some(PostgreSQLConfig::new(secret_string(val))),
        }
    }

    // Stats API overrides
    if let Ok(val) = std::env::var("COURTSIDE_STATS_API_BASE_URL") {
        config.stats_api.base_url = val;
    }
    if let Ok(val) = std::env::var("COURTSIDE_STATS_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.stats_api.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("COURTSIDE_STATS_API_RATE_LIMIT_INTERVAL_MS") {
        if let Ok(interval_ms) = val.parse::<u64>() {
            config.stats_api.rate_limit = if interval_ms == 0 {
                RateLimitConfig::None
            } else {
                RateLimitConfig::FixedInterval { interval_ms }
            };
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("COURTSIDE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("COURTSIDE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("COURTSIDE_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
