//! Atomic fixture writer
//!
//! Bytes go to a temporary file in the destination directory, which is then
//! renamed over the destination. A failure before the rename leaves the
//! previous file (if any) untouched, and the temporary file is removed when
//! dropped.

use super::checksum::checksum_bytes;
use crate::domain::{CourtsideError, Fixture, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What happened to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// New or changed content was persisted
    Written,
    /// The file already held identical bytes
    Unchanged,
    /// Dry run: nothing touched the file system
    Skipped,
}

impl std::fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteStatus::Written => write!(f, "written"),
            WriteStatus::Unchanged => write!(f, "unchanged"),
            WriteStatus::Skipped => write!(f, "skipped (dry run)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub status: WriteStatus,
    pub bytes: usize,
    pub checksum: String,
}

/// Writes fixtures and assets
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWriter {
    dry_run: bool,
}

impl FixtureWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Validate, render and write a fixture
    ///
    /// # Errors
    ///
    /// Returns `MalformedRow` if a row does not carry the declared fields,
    /// and `WriteFailure` if the file cannot be written.
    pub fn write_fixture(&self, fixture: &Fixture) -> Result<WriteOutcome> {
        fixture.check_fields()?;
        let bytes = fixture.render()?;
        let outcome = self.write_bytes(fixture.path(), &bytes)?;

        tracing::info!(
            path = %outcome.path.display(),
            format = %fixture.format(),
            records = fixture.record_count(),
            status = %outcome.status,
            "Fixture {}",
            outcome.status
        );
        Ok(outcome)
    }

    /// Write raw bytes atomically
    pub fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<WriteOutcome> {
        let checksum = checksum_bytes(bytes);
        let outcome = |status| WriteOutcome {
            path: path.to_path_buf(),
            status,
            bytes: bytes.len(),
            checksum: checksum.clone(),
        };

        if self.dry_run {
            return Ok(outcome(WriteStatus::Skipped));
        }

        if let Ok(existing) = std::fs::read(path) {
            if existing == bytes {
                return Ok(outcome(WriteStatus::Unchanged));
            }
        }

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)
            .map_err(|e| CourtsideError::write_failure(path.display(), format!("cannot create directory: {e}")))?;

        let mut temp = NamedTempFile::new_in(&parent)
            .map_err(|e| CourtsideError::write_failure(path.display(), format!("cannot create temporary file: {e}")))?;
        temp.write_all(bytes)
            .and_then(|_| temp.flush())
            .map_err(|e| CourtsideError::write_failure(path.display(), e))?;
        temp.persist(path)
            .map_err(|e| CourtsideError::write_failure(path.display(), e.error))?;

        Ok(outcome(WriteStatus::Written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixtureBody, FixtureFormat, Record};
    use std::fs;
    use tempfile::TempDir;

    fn standings(path: PathBuf) -> Fixture {
        Fixture::new(
            path,
            None,
            FixtureFormat::Csv,
            vec!["team_name".to_string(), "wins".to_string()],
            FixtureBody::Rows(vec![Record::new()
                .with("team_name", "Boston Celtics")
                .with("wins", 61i64)]),
        )
        .unwrap()
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("js/data/standings.csv");

        let outcome = FixtureWriter::new(false)
            .write_fixture(&standings(path.clone()))
            .unwrap();

        assert_eq!(outcome.status, WriteStatus::Written);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "team_name,wins\nBoston Celtics,61\n"
        );
    }

    #[test]
    fn test_second_write_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("standings.csv");
        let writer = FixtureWriter::new(false);

        let first = writer.write_fixture(&standings(path.clone())).unwrap();
        let second = writer.write_fixture(&standings(path)).unwrap();

        assert_eq!(second.status, WriteStatus::Unchanged);
        assert_eq!(first.checksum, second.checksum);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/standings.csv");

        let outcome = FixtureWriter::new(true)
            .write_fixture(&standings(path.clone()))
            .unwrap();

        assert_eq!(outcome.status, WriteStatus::Skipped);
        assert!(!path.exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");

        FixtureWriter::new(false).write_bytes(&path, b"[]").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let err = FixtureWriter::new(false)
            .write_bytes(&blocker.join("x.json"), b"[]")
            .unwrap_err();

        assert!(matches!(err, CourtsideError::WriteFailure { .. }));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "a file, not a directory");
    }

    #[test]
    fn test_mismatched_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        let fixture = Fixture::new(
            dir.path().join("x.json"),
            None,
            FixtureFormat::Json,
            vec!["team_name".to_string()],
            FixtureBody::Rows(vec![Record::new().with("wins", 1i64)]),
        )
        .unwrap();

        let err = FixtureWriter::new(false).write_fixture(&fixture).unwrap_err();
        assert!(matches!(err, CourtsideError::MalformedRow { .. }));
        assert!(!dir.path().join("x.json").exists());
    }
}
