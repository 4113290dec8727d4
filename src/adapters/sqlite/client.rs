//! SQLite source implementation
//!
//! The database file is opened read-only, once per run. rusqlite is
//! synchronous, so every call runs on the blocking pool with the shared
//! connection behind a mutex.

use crate::adapters::database::traits::{quote_identifier, ColumnInfo, DatabaseSource, TableInfo};
use crate::domain::{DatabaseError, Result, Scalar, Table};
use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Read-only SQLite source
pub struct SqliteSource {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSource {
    /// Open an existing database file read-only
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConnectionFailed` if the file is missing or is
    /// not a SQLite database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_path = path.clone();

        let conn = tokio::task::spawn_blocking(move || {
            if !open_path.exists() {
                return Err(DatabaseError::ConnectionFailed(format!(
                    "SQLite database not found: {}",
                    open_path.display()
                )));
            }

            let conn = Connection::open_with_flags(
                &open_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| {
                DatabaseError::ConnectionFailed(format!(
                    "Failed to open {}: {e}",
                    open_path.display()
                ))
            })?;

            // Reading the schema forces SQLite to validate the file header
            conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))
                .map_err(|e| {
                    DatabaseError::ConnectionFailed(format!(
                        "{} is not a readable SQLite database: {e}",
                        open_path.display()
                    ))
                })?;

            Ok(conn)
        })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(format!("SQLite open task failed: {e}")))??;

        tracing::debug!(path = %path.display(), "SQLite database opened read-only");

        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a closure against the connection on the blocking pool
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> std::result::Result<T, DatabaseError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let value = tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| DatabaseError::QueryFailed("SQLite connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| DatabaseError::QueryFailed(format!("SQLite task failed: {e}")))??;
        Ok(value)
    }
}

impl Drop for SqliteSource {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "Closing SQLite database");
    }
}

#[async_trait]
impl DatabaseSource for SqliteSource {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn test_connection(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))
                .map_err(|e| DatabaseError::ConnectionFailed(format!("Connection test failed: {e}")))
        })
        .await?;

        tracing::info!("SQLite connection test successful");
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<Table> {
        let sql = sql.to_string();
        self.with_connection(move |conn| run_query(conn, &sql)).await
    }

    async fn describe(&self) -> Result<Vec<TableInfo>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT name FROM sqlite_master \
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                     ORDER BY name",
                )
                .map_err(|e| DatabaseError::QueryFailed(format!("Failed to list tables: {e}")))?;

            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|e| DatabaseError::QueryFailed(format!("Failed to list tables: {e}")))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| DatabaseError::QueryFailed(format!("Failed to list tables: {e}")))?;

            let mut tables = Vec::with_capacity(names.len());
            for name in names {
                let quoted = quote_identifier(&name);

                let mut info = conn
                    .prepare(&format!("PRAGMA table_info({quoted})"))
                    .map_err(|e| DatabaseError::QueryFailed(format!("table_info({name}): {e}")))?;
                let columns = info
                    .query_map([], |row| {
                        Ok(ColumnInfo {
                            name: row.get(1)?,
                            type_name: row.get(2)?,
                        })
                    })
                    .map_err(|e| DatabaseError::QueryFailed(format!("table_info({name}): {e}")))?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| DatabaseError::QueryFailed(format!("table_info({name}): {e}")))?;

                let row_count: i64 = conn
                    .query_row(&format!("SELECT COUNT(*) FROM {quoted}"), [], |row| row.get(0))
                    .map_err(|e| DatabaseError::QueryFailed(format!("COUNT({name}): {e}")))?;

                tables.push(TableInfo {
                    name,
                    columns,
                    row_count: row_count.max(0) as u64,
                });
            }
            Ok(tables)
        })
        .await
    }
}

fn run_query(conn: &Connection, sql: &str) -> std::result::Result<Table, DatabaseError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| DatabaseError::QueryFailed(format!("Failed to prepare query: {e}")))?;

    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();
    let mut table = Table::new(columns);

    let mut rows = stmt
        .query([])
        .map_err(|e| DatabaseError::QueryFailed(format!("Query failed: {e}")))?;

    while let Some(row) = rows
        .next()
        .map_err(|e| DatabaseError::QueryFailed(format!("Failed to read row: {e}")))?
    {
        let mut values = Vec::with_capacity(width);
        for idx in 0..width {
            let value = row
                .get_ref(idx)
                .map_err(|e| DatabaseError::QueryFailed(format!("Failed to read column: {e}")))?;
            values.push(match value {
                ValueRef::Null => Scalar::Null,
                ValueRef::Integer(i) => Scalar::Int(i),
                ValueRef::Real(f) => Scalar::Float(f),
                ValueRef::Text(bytes) => Scalar::Text(String::from_utf8_lossy(bytes).into_owned()),
                ValueRef::Blob(_) => {
                    return Err(DatabaseError::UnsupportedType {
                        column: table.columns[idx].clone(),
                        type_name: "BLOB".to_string(),
                    })
                }
            });
        }
        table.rows.push(values);
    }

    Ok(table)
}
