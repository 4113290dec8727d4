//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the courtside configuration file.

use crate::config::load_config;
use crate::config::schema::{DatabaseTarget, RateLimitConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates every section and recipe
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);

        match &config.database {
            Some(database) => match database.target {
                DatabaseTarget::Sqlite => {
                    println!("  Database: SQLite ({})", database.sqlite.path);
                }
                DatabaseTarget::PostgreSQL => {
                    if let Some(pg_config) = &database.postgresql {
                        use secrecy::ExposeSecret;
                        println!(
                            "  Database: PostgreSQL ({})",
                            display_host(pg_config.connection_string.expose_secret().as_str())
                        );
                        println!("  Max Connections: {}", pg_config.max_connections);
                    }
                }
            },
            None => println!("  Database: not configured"),
        }

        println!("  Stats API: {}", config.stats_api.base_url);
        let pacing = match &config.stats_api.rate_limit {
            RateLimitConfig::None => "none".to_string(),
            RateLimitConfig::FixedInterval { interval_ms } => {
                format!("fixed interval, {interval_ms} ms")
            }
            RateLimitConfig::TokenBucket {
                capacity,
                refill_interval_ms,
            } => format!("token bucket, {capacity} tokens, refill every {refill_interval_ms} ms"),
        };
        println!("  Rate Limit: {pacing}");

        println!("  Recipes: {}", config.recipes.len());
        for recipe in &config.recipes {
            println!(
                "    - {} ({}) -> {}",
                recipe.name,
                recipe.kind.kind_name(),
                recipe.output_path(None)
            );
        }
        println!();

        Ok(0)
    }
}

/// The part of a connection string after the credentials
fn display_host(connection_string: &str) -> &str {
    connection_string.split('@').next_back().unwrap_or("***")
}
