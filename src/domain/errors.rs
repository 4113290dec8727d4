//! Domain error types
//!
//! This module defines the error hierarchy for courtside. Errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main courtside error type
///
/// Source-level and write-level variants are fatal to the recipe that raised
/// them. `MissingField` and `MalformedRow` are row-level: the exporter logs
/// them with the row key, skips the row, and keeps going.
#[derive(Debug, Error)]
pub enum CourtsideError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The database or the stats API could not be reached
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Stats API errors
    #[error("Stats API error: {0}")]
    StatsApi(#[from] StatsApiError),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// A requested field is absent from a row
    #[error("Missing field '{field}' in row {key}")]
    MissingField { key: String, field: String },

    /// A row exists but cannot be shaped as the recipe asks
    #[error("Malformed row {key}: {reason}")]
    MalformedRow { key: String, reason: String },

    /// A fixture or asset could not be written
    #[error("Write failure for {path}: {reason}")]
    WriteFailure { path: String, reason: String },

    /// Validation errors (brackets, identifiers, fixtures)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl CourtsideError {
    /// Whether this error only affects a single row
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            CourtsideError::MissingField { .. } | CourtsideError::MalformedRow { .. }
        )
    }

    /// Whether this error means a data source could not be used at all
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            CourtsideError::SourceUnavailable(_)
                | CourtsideError::StatsApi(
                    StatsApiError::ConnectionFailed(_)
                        | StatsApiError::Timeout(_)
                        | StatsApiError::ServerError { .. }
                )
                | CourtsideError::Database(DatabaseError::ConnectionFailed(_))
        )
    }

    /// Shorthand for a write failure on a path
    pub fn write_failure(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        CourtsideError::WriteFailure {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Stats API errors
///
/// Errors that occur when talking to the remote stats API. These don't
/// expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum StatsApiError {
    /// Failed to reach the API
    #[error("Failed to connect to stats API: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// The response body is not the expected result-set shape
    #[error("Invalid response from stats API: {0}")]
    InvalidResponse(String),

    /// The requested result set index does not exist
    #[error("Result set {index} not found in {endpoint} response")]
    ResultSetNotFound { endpoint: String, index: usize },
}

/// Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Could not open or connect to the database
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// The query failed to prepare or execute
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A column has a type we cannot map to a scalar
    #[error("Unsupported column type '{type_name}' for column '{column}'")]
    UnsupportedType { column: String, type_name: String },
}

/// A row-level failure recorded during an export
///
/// Provides the context needed for the end-of-run summary: which recipe,
/// which row or team key, and what went wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Recipe name
    pub recipe: String,

    /// Identifying key of the skipped row (team abbreviation, row index, ...)
    pub key: String,

    /// Error message
    pub message: String,
}

impl RowFailure {
    /// Creates a new row failure
    pub fn new(
        recipe: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipe: recipe.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CourtsideError {
    fn from(err: std::io::Error) -> Self {
        CourtsideError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CourtsideError {
    fn from(err: serde_json::Error) -> Self {
        CourtsideError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CourtsideError {
    fn from(err: toml::de::Error) -> Self {
        CourtsideError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for CourtsideError {
    fn from(err: csv::Error) -> Self {
        CourtsideError::Serialization(format!("CSV error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courtside_error_display() {
        let err = CourtsideError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_missing_field_display() {
        let err = CourtsideError::MissingField {
            key: "row 3".to_string(),
            field: "wins".to_string(),
        };
        assert_eq!(err.to_string(), "Missing field 'wins' in row row 3");
        assert!(err.is_row_level());
    }

    #[test]
    fn test_stats_api_error_conversion() {
        let api_err = StatsApiError::ConnectionFailed("Network error".to_string());
        let err: CourtsideError = api_err.into();
        assert!(matches!(err, CourtsideError::StatsApi(_)));
        assert!(err.is_source_error());
        assert!(!err.is_row_level());

        let server: CourtsideError = StatsApiError::ServerError {
            status: 503,
            message: "leaguestandingsv3: unavailable".to_string(),
        }
        .into();
        assert!(server.is_source_error());
    }

    #[test]
    fn test_database_error_conversion() {
        let db_err = DatabaseError::QueryFailed("no such table: game".to_string());
        let err: CourtsideError = db_err.into();
        assert!(matches!(err, CourtsideError::Database(_)));
        assert!(!err.is_source_error());
    }

    #[test]
    fn test_write_failure_helper() {
        let err = CourtsideError::write_failure("js/data/out.json", "permission denied");
        assert_eq!(
            err.to_string(),
            "Write failure for js/data/out.json: permission denied"
        );
    }

    #[test]
    fn test_row_failure_builder() {
        let failure = RowFailure::new("team_schedules", "GSW", "timeout");
        assert_eq!(failure.recipe, "team_schedules");
        assert_eq!(failure.key, "GSW");
        assert_eq!(failure.message, "timeout");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: CourtsideError = io_err.into();
        assert!(matches!(err, CourtsideError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: CourtsideError = json_err.into();
        assert!(matches!(err, CourtsideError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: CourtsideError = toml_err.into();
        assert!(matches!(err, CourtsideError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
