//! Database source factory
//!
//! This module provides the factory function that opens the configured
//! database backend.

use crate::adapters::database::traits::DatabaseSource;
use crate::adapters::postgresql::client::PostgresSource;
use crate::adapters::sqlite::client::SqliteSource;
use crate::config::schema::{DatabaseConfig, DatabaseTarget};
use crate::domain::{CourtsideError, Result};
use std::sync::Arc;

/// Open a database source based on the configuration
///
/// This factory function examines `database.target` and opens the matching
/// implementation, then tests the connection.
///
/// # Errors
///
/// Returns `CourtsideError::SourceUnavailable` if the source cannot be opened
/// or does not answer the connection test.
pub async fn create_database_source(
    config: &DatabaseConfig,
) -> Result<Arc<dyn DatabaseSource + Send + Sync>> {
    let source: Arc<dyn DatabaseSource + Send + Sync> = match config.target {
        DatabaseTarget::Sqlite => {
            tracing::info!(path = %config.sqlite.path, "Opening SQLite database");
            Arc::new(SqliteSource::open(&config.sqlite.path).await?)
        }
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                CourtsideError::Configuration(
                    "database.postgresql configuration is required when database.target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL connection pool");
            Arc::new(PostgresSource::new(pg_config.clone()).await?)
        }
    };

    source.test_connection().await.map_err(|e| {
        CourtsideError::SourceUnavailable(format!(
            "{} database did not answer: {e}",
            source.backend()
        ))
    })?;

    Ok(source)
}
