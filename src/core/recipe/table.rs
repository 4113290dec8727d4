//! The generic table recipe
//!
//! Pipeline: fetch a [`Table`] → map declared fields → derived ratios →
//! filter → sort → limit → round → shape as rows or a keyed object.
//!
//! Filters, sort keys and the key field are looked up in the shaped record
//! first and in the raw source row second, so they may name either an
//! output field or a source column.

use super::{substitute, RecipeContext, RecipeOutput};
use crate::config::{DerivedSpec, FieldSpec, FilterOp, FilterSpec, Shape, SortSpec, SourceKind, TableRecipe};
use crate::domain::teams::{Team, TEAMS};
use crate::domain::{
    CourtsideError, Fixture, FixtureBody, FixtureFormat, Record, Result, RowFailure, Scalar,
    SeasonKey, Table,
};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::PathBuf;

/// Column added to per-team stats API rows, holding the team abbreviation
pub const TEAM_KEY_COLUMN: &str = "team_key";

static NULL_SCALAR: Scalar = Scalar::Null;

pub async fn run(ctx: &RecipeContext<'_>, spec: &TableRecipe) -> Result<RecipeOutput> {
    let (table, mut failures) = fetch(ctx, spec).await?;
    tracing::debug!(
        recipe = %ctx.name(),
        rows = table.len(),
        columns = table.columns.len(),
        "Fetched source table"
    );

    let (fixture, shape_failures) = shape(
        ctx.name(),
        spec,
        &table,
        PathBuf::from(ctx.recipe.output_path(None)),
        ctx.season().cloned(),
        ctx.recipe.format(),
    )?;
    failures.extend(shape_failures);

    Ok(RecipeOutput::fixture(fixture, failures))
}

async fn fetch(ctx: &RecipeContext<'_>, spec: &TableRecipe) -> Result<(Table, Vec<RowFailure>)> {
    let season = ctx.season();

    match spec.source {
        SourceKind::Database => {
            let sql = substitute(spec.query.as_deref().unwrap_or_default(), season, None);
            let table = ctx.database()?.query(&sql).await?;
            Ok((table, Vec::new()))
        }
        SourceKind::StatsApi => {
            let client = ctx.stats_api()?;
            let endpoint = spec.endpoint.as_deref().unwrap_or_default();

            if !spec.per_team {
                let params = params_for(spec, season, None);
                let mut table = client.fetch(endpoint, &params, spec.result_set).await?;
                let failures = ctx.skipped_rows(&mut table, None);
                return Ok((table, failures));
            }

            let mut combined = Table::default();
            let mut failures = Vec::new();
            for (idx, team) in TEAMS.iter().enumerate() {
                let params = params_for(spec, season, Some(team));
                match client.fetch(endpoint, &params, spec.result_set).await {
                    Ok(mut table) => {
                        failures.extend(ctx.skipped_rows(&mut table, Some(team.abbr)));
                        tracing::info!(
                            recipe = %ctx.name(),
                            team = team.abbr,
                            progress = %format!("{}/{}", idx + 1, TEAMS.len()),
                            rows = table.len(),
                            "Fetched team rows"
                        );
                        table.add_constant_column(TEAM_KEY_COLUMN, Scalar::from(team.abbr));
                        combined.extend(table);
                    }
                    Err(e) => failures.push(ctx.row_failure(team.abbr, &e)),
                }
            }
            Ok((combined, failures))
        }
    }
}

fn params_for(spec: &TableRecipe, season: Option<&SeasonKey>, team: Option<&Team>) -> Vec<(String, String)> {
    spec.params
        .iter()
        .map(|(k, v)| (k.clone(), substitute(v, season, team)))
        .collect()
}

/// Shape a source table into a fixture
///
/// Rows that cannot be shaped are returned as failures and left out.
pub fn shape(
    recipe: &str,
    spec: &TableRecipe,
    table: &Table,
    path: PathBuf,
    season: Option<SeasonKey>,
    format: FixtureFormat,
) -> Result<(Fixture, Vec<RowFailure>)> {
    let fields: Vec<FieldSpec> = if spec.fields.is_empty() {
        table
            .columns
            .iter()
            .map(|c| FieldSpec {
                name: c.clone(),
                column: None,
                required: true,
            })
            .collect()
    } else {
        spec.fields.clone()
    };

    let derived_names: HashSet<&str> = spec.derived.iter().map(|d| d.name.as_str()).collect();
    let mut declared: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
    for derived in &spec.derived {
        if !declared.contains(&derived.name) {
            declared.push(derived.name.clone());
        }
    }

    let mut failures = Vec::new();
    let mut rows: Vec<(Record, Record)> = Vec::with_capacity(table.len());
    for (idx, raw) in table.records().enumerate() {
        let key = row_key(spec, &raw, idx);
        match shape_row(&key, &fields, &derived_names, &spec.derived, &raw) {
            Ok(record) => rows.push((record, raw)),
            Err(e) => failures.push(failure(recipe, key, &e)),
        }
    }

    rows.retain(|(record, raw)| {
        spec.filter
            .iter()
            .all(|f| matches_filter(f, lookup(record, raw, &f.field)))
    });

    if !spec.sort_by.is_empty() {
        rows.sort_by(|a, b| compare_rows(&spec.sort_by, a, b));
    }

    if let Some(limit) = spec.limit {
        rows.truncate(limit);
    }

    if let Some(decimals) = spec.round {
        rows = rows
            .into_iter()
            .map(|(record, raw)| (round_record(&record, decimals), raw))
            .collect();
    }

    let body = match spec.shape {
        Shape::Rows => FixtureBody::Rows(rows.into_iter().map(|(record, _)| record).collect()),
        Shape::Keyed => {
            let key_field = spec.key_field.as_deref().unwrap_or_default();
            declared.retain(|f| f != key_field);

            let mut seen = HashSet::new();
            let mut entries = Vec::with_capacity(rows.len());
            for (idx, (mut record, raw)) in rows.into_iter().enumerate() {
                let key = record
                    .remove(key_field)
                    .or_else(|| raw.get(key_field).cloned())
                    .filter(|k| !k.is_null());

                let Some(key) = key.map(|k| k.to_string()) else {
                    let err = CourtsideError::MalformedRow {
                        key: format!("row {}", idx + 1),
                        reason: format!("no value for key field '{key_field}'"),
                    };
                    failures.push(failure(recipe, format!("row {}", idx + 1), &err));
                    continue;
                };

                if !seen.insert(key.clone()) {
                    let err = CourtsideError::MalformedRow {
                        key: key.clone(),
                        reason: "duplicate key".to_string(),
                    };
                    failures.push(failure(recipe, key, &err));
                    continue;
                }
                entries.push((key, record));
            }
            FixtureBody::Keyed(entries)
        }
    };

    let fixture = Fixture::new(path, season, format, declared, body)?;
    Ok((fixture, failures))
}

fn failure(recipe: &str, key: impl Into<String>, error: &CourtsideError) -> RowFailure {
    let failure = RowFailure::new(recipe, key, error.to_string());
    tracing::warn!(recipe = %recipe, key = %failure.key, error = %error, "Skipping row");
    failure
}

fn row_key(spec: &TableRecipe, raw: &Record, idx: usize) -> String {
    let from_field = |name: &str| raw.get(name).filter(|v| !v.is_null()).map(Scalar::to_string);

    spec.key_field
        .as_deref()
        .and_then(|k| {
            let column = spec
                .fields
                .iter()
                .find(|f| f.name == k)
                .map(FieldSpec::column)
                .unwrap_or(k);
            from_field(column)
        })
        .or_else(|| from_field(TEAM_KEY_COLUMN))
        .unwrap_or_else(|| format!("row {}", idx + 1))
}

fn shape_row(
    key: &str,
    fields: &[FieldSpec],
    derived_names: &HashSet<&str>,
    derived: &[DerivedSpec],
    raw: &Record,
) -> Result<Record> {
    let mut record = Record::new();

    for field in fields {
        if derived_names.contains(field.name.as_str()) {
            record.insert(field.name.clone(), Scalar::Null);
            continue;
        }

        match raw.get(field.column()) {
            Some(value) => record.insert(field.name.clone(), value.clone()),
            None if field.required => {
                return Err(CourtsideError::MissingField {
                    key: key.to_string(),
                    field: field.column().to_string(),
                })
            }
            None => record.insert(field.name.clone(), Scalar::Null),
        }
    }

    for spec in derived {
        let value = ratio(spec, &record, raw);
        record.insert(spec.name.clone(), value);
    }

    Ok(record)
}

/// `sum(numerator) / sum(denominator)`; null when a term is not numeric or
/// the denominator is zero
fn ratio(spec: &DerivedSpec, record: &Record, raw: &Record) -> Scalar {
    let sum = |names: &[String]| -> Option<f64> {
        names
            .iter()
            .map(|n| lookup(record, raw, n).and_then(Scalar::as_f64))
            .sum()
    };

    match (sum(&spec.numerator), sum(&spec.denominator)) {
        (Some(num), Some(den)) if den != 0.0 => Scalar::Float(num / den),
        _ => Scalar::Null,
    }
}

fn lookup<'r>(record: &'r Record, raw: &'r Record, field: &str) -> Option<&'r Scalar> {
    record.get(field).or_else(|| raw.get(field))
}

fn matches_filter(filter: &FilterSpec, value: Option<&Scalar>) -> bool {
    let value = value.unwrap_or(&NULL_SCALAR);
    let target = filter.value.as_ref();

    match filter.op {
        FilterOp::NotNull => !value.is_null(),
        FilterOp::Eq => target.is_some_and(|t| scalar_equals(value, &Scalar::from_json(t))),
        FilterOp::Ne => !target.is_some_and(|t| scalar_equals(value, &Scalar::from_json(t))),
        FilterOp::Contains => target.is_some_and(|t| {
            !value.is_null() && value.to_csv_field().contains(&Scalar::from_json(t).to_csv_field())
        }),
        FilterOp::In => match target {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .any(|t| scalar_equals(value, &Scalar::from_json(t))),
            _ => false,
        },
        FilterOp::Gt => target.is_some_and(|t| {
            numeric_cmp(value, &Scalar::from_json(t)) == Some(Ordering::Greater)
        }),
        FilterOp::Lt => target.is_some_and(|t| {
            numeric_cmp(value, &Scalar::from_json(t)) == Some(Ordering::Less)
        }),
    }
}

fn scalar_equals(a: &Scalar, b: &Scalar) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a.to_csv_field() == b.to_csv_field(),
    }
}

fn numeric_cmp(a: &Scalar, b: &Scalar) -> Option<Ordering> {
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Nulls sort last in either direction
fn compare_rows(sort_by: &[SortSpec], a: &(Record, Record), b: &(Record, Record)) -> Ordering {
    for spec in sort_by {
        let left = lookup(&a.0, &a.1, &spec.field).unwrap_or(&NULL_SCALAR);
        let right = lookup(&b.0, &b.1, &spec.field).unwrap_or(&NULL_SCALAR);

        let ord = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = numeric_cmp(left, right)
                    .unwrap_or_else(|| left.to_string().cmp(&right.to_string()));
                if spec.descending {
                    ord.reverse()
                } else {
                    ord
                }
            }
        };

        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn round_record(record: &Record, decimals: u32) -> Record {
    record
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone().rounded(decimals)))
        .collect()
}
