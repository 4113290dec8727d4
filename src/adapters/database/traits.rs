//! Database abstraction traits
//!
//! This module defines the trait that relational sources implement so that
//! recipes and the `explore` command work the same on SQLite and PostgreSQL.

use crate::domain::{Result, Table};
use async_trait::async_trait;

/// One column of a source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,

    /// Declared type as the backend reports it
    pub type_name: String,
}

/// A table as seen by `explore`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub row_count: u64,
}

/// Read-only relational source
///
/// Implementations are opened once per run and hand back [`Table`]s whose
/// columns keep the query's select order.
#[async_trait]
pub trait DatabaseSource: Send + Sync {
    /// Backend name for logs ("sqlite", "postgresql")
    fn backend(&self) -> &'static str;

    /// Test the database connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Run a read-only query
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::QueryFailed` if the statement cannot be
    /// prepared or executed.
    async fn query(&self, sql: &str) -> Result<Table>;

    /// List user tables with their columns and row counts
    async fn describe(&self) -> Result<Vec<TableInfo>>;

    /// First `limit` rows of a table
    async fn sample(&self, table: &str, limit: usize) -> Result<Table> {
        self.query(&format!(
            "SELECT * FROM {} LIMIT {limit}",
            quote_identifier(table)
        ))
        .await
    }
}

/// Quote an identifier for SQL; embedded quotes are doubled
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("team"), "\"team\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
