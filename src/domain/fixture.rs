//! Fixtures: the unit of output
//!
//! A fixture is everything destined for one file: its path, optional season,
//! format, the declared field list, and the body. Rendering is deterministic
//! so an unchanged source yields byte-identical files.

use super::errors::CourtsideError;
use super::ids::SeasonKey;
use super::record::{Record, Scalar};
use super::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureFormat {
    Json,
    Csv,
}

impl FixtureFormat {
    /// Derive the format from a file extension (`.csv` is CSV, anything else JSON)
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => FixtureFormat::Csv,
            _ => FixtureFormat::Json,
        }
    }

    /// Count the records in an already rendered file
    ///
    /// JSON arrays count elements, JSON objects count keys, CSV counts data
    /// rows.
    pub fn count_records(&self, bytes: &[u8]) -> Result<usize> {
        match self {
            FixtureFormat::Json => match serde_json::from_slice::<Value>(bytes)? {
                Value::Array(items) => Ok(items.len()),
                Value::Object(map) => Ok(map.len()),
                _ => Ok(1),
            },
            FixtureFormat::Csv => {
                let mut reader = csv::Reader::from_reader(bytes);
                let mut count = 0;
                for row in reader.records() {
                    row?;
                    count += 1;
                }
                Ok(count)
            }
        }
    }
}

impl std::fmt::Display for FixtureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureFormat::Json => write!(f, "json"),
            FixtureFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Fixture contents
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureBody {
    /// A JSON array or a CSV table
    Rows(Vec<Record>),

    /// A JSON object keyed by one field of each row
    Keyed(Vec<(String, Record)>),

    /// A nested document (brackets, schedules, enriched breakdowns)
    Document(Value),
}

/// One output file, built once per run
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    path: PathBuf,
    season: Option<SeasonKey>,
    format: FixtureFormat,
    fields: Vec<String>,
    body: FixtureBody,
}

impl Fixture {
    /// Creates a fixture, checking that a season-keyed fixture's file name
    /// carries its season
    pub fn new(
        path: impl Into<PathBuf>,
        season: Option<SeasonKey>,
        format: FixtureFormat,
        fields: Vec<String>,
        body: FixtureBody,
    ) -> Result<Self> {
        let path = path.into();

        if let Some(season) = &season {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !file_name.contains(season.as_str()) {
                return Err(CourtsideError::Validation(format!(
                    "Fixture {} is keyed by season {} but its file name does not contain it",
                    path.display(),
                    season
                )));
            }
        }

        if format == FixtureFormat::Csv && !matches!(body, FixtureBody::Rows(_)) {
            return Err(CourtsideError::Validation(format!(
                "Fixture {} is CSV but its body is not a list of rows",
                path.display()
            )));
        }

        Ok(Self {
            path,
            season,
            format,
            fields,
            body,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn season(&self) -> Option<&SeasonKey> {
        self.season.as_ref()
    }

    pub fn format(&self) -> FixtureFormat {
        self.format
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn body(&self) -> &FixtureBody {
        &self.body
    }

    /// Number of top-level records (rows, keys, or 1 for a document)
    pub fn record_count(&self) -> usize {
        match &self.body {
            FixtureBody::Rows(rows) => rows.len(),
            FixtureBody::Keyed(entries) => entries.len(),
            FixtureBody::Document(Value::Object(map)) => map.len(),
            FixtureBody::Document(Value::Array(items)) => items.len(),
            FixtureBody::Document(_) => 1,
        }
    }

    /// Check every row carries exactly the declared fields, in order
    pub fn check_fields(&self) -> Result<()> {
        let rows: Box<dyn Iterator<Item = (String, &Record)> + '_> = match &self.body {
            FixtureBody::Rows(rows) => Box::new(
                rows.iter()
                    .enumerate()
                    .map(|(i, r)| (format!("row {}", i + 1), r)),
            ),
            FixtureBody::Keyed(entries) => Box::new(entries.iter().map(|(k, r)| (k.clone(), r))),
            FixtureBody::Document(_) => return Ok(()),
        };

        for (key, record) in rows {
            let names: Vec<&str> = record.field_names().collect();
            if names != self.fields.iter().map(String::as_str).collect::<Vec<_>>() {
                return Err(CourtsideError::MalformedRow {
                    key,
                    reason: format!(
                        "fields [{}] do not match declared [{}]",
                        names.join(", "),
                        self.fields.join(", ")
                    ),
                });
            }
        }
        Ok(())
    }

    /// Serialize the fixture to the bytes that go on disk
    pub fn render(&self) -> Result<Vec<u8>> {
        match self.format {
            FixtureFormat::Json => self.render_json(),
            FixtureFormat::Csv => self.render_csv(),
        }
    }

    fn render_json(&self) -> Result<Vec<u8>> {
        let bytes = match &self.body {
            FixtureBody::Rows(rows) => serde_json::to_vec_pretty(rows)?,
            FixtureBody::Keyed(entries) => {
                let map = entries
                    .iter()
                    .map(|(k, r)| (k.clone(), r.to_json()))
                    .collect::<serde_json::Map<_, _>>();
                serde_json::to_vec_pretty(&Value::Object(map))?
            }
            FixtureBody::Document(doc) => serde_json::to_vec_pretty(doc)?,
        };
        Ok(bytes)
    }

    fn render_csv(&self) -> Result<Vec<u8>> {
        let FixtureBody::Rows(rows) = &self.body else {
            return Err(CourtsideError::Validation(format!(
                "Cannot render {} as CSV",
                self.path.display()
            )));
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.fields)?;
        for record in rows {
            let cells: Vec<String> = self
                .fields
                .iter()
                .map(|f| record.get(f).map(Scalar::to_csv_field).unwrap_or_default())
                .collect();
            writer.write_record(&cells)?;
        }
        writer
            .into_inner()
            .map_err(|e| CourtsideError::Serialization(format!("CSV error: {e}")))
    }
}

/// Read rendered rows back into records
///
/// Keyed JSON objects yield their values; CSV cells are type-inferred.
pub fn parse_records(bytes: &[u8], format: FixtureFormat) -> Result<Vec<Record>> {
    match format {
        FixtureFormat::Json => {
            let value: Value = serde_json::from_slice(bytes)?;
            let items: Vec<Value> = match value {
                Value::Array(items) => items,
                Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
                other => {
                    return Err(CourtsideError::Serialization(format!(
                        "Expected a JSON array or object, found {other}"
                    )))
                }
            };
            items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map
                        .iter()
                        .map(|(k, v)| (k.clone(), Scalar::from_json(v)))
                        .collect()),
                    other => Err(CourtsideError::Serialization(format!(
                        "Expected a JSON object row, found {other}"
                    ))),
                })
                .collect()
        }
        FixtureFormat::Csv => {
            let mut reader = csv::Reader::from_reader(bytes);
            let headers = reader.headers()?.clone();
            let mut records = Vec::new();
            for row in reader.records() {
                let row = row?;
                records.push(
                    headers
                        .iter()
                        .zip(row.iter())
                        .map(|(h, v)| (h.to_string(), Scalar::parse_csv_field(v)))
                        .collect(),
                );
            }
            Ok(records)
        }
    }
}
