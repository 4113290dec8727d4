//! Stats API response models
//!
//! Every endpoint answers with one or more result sets, each a list of
//! column headers plus rows of values. Most endpoints use `resultSets`
//! (a list); a few use `resultSet` (a single object).

use crate::domain::{Scalar, SkippedRow, StatsApiError, Table};
use serde::Deserialize;
use serde_json::Value;

/// Raw endpoint response
#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    pub result_sets: Option<OneOrMany>,

    #[serde(rename = "resultSet", default)]
    pub result_set: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<ResultSet>),
    One(ResultSet),
}

/// One named result set
#[derive(Debug, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub name: Option<String>,

    pub headers: Vec<String>,

    #[serde(rename = "rowSet")]
    pub row_set: Vec<Vec<Value>>,
}

impl StatsResponse {
    /// Take result set `index` as a [`Table`]
    ///
    /// # Errors
    ///
    /// Returns `ResultSetNotFound` if the index is out of range and
    /// `InvalidResponse` if the body carries no result sets. Rows whose
    /// width differs from the header are moved to [`Table::skipped`].
    pub fn into_table(self, endpoint: &str, index: usize) -> Result<Table, StatsApiError> {
        let sets = match self.result_sets.or(self.result_set) {
            Some(OneOrMany::Many(sets)) => sets,
            Some(OneOrMany::One(set)) => vec![set],
            None => {
                return Err(StatsApiError::InvalidResponse(format!(
                    "{endpoint} response has neither resultSets nor resultSet"
                )))
            }
        };

        let set = sets
            .into_iter()
            .nth(index)
            .ok_or_else(|| StatsApiError::ResultSetNotFound {
                endpoint: endpoint.to_string(),
                index,
            })?;

        set.into_table(endpoint)
    }
}

impl ResultSet {
    fn into_table(self, endpoint: &str) -> Result<Table, StatsApiError> {
        let width = self.headers.len();
        let mut table = Table::new(self.headers);

        for (idx, row) in self.row_set.into_iter().enumerate() {
            if row.len() != width {
                table.skipped.push(SkippedRow {
                    key: format!("row {idx}"),
                    reason: format!("{endpoint} returned {} values for {width} headers", row.len()),
                });
                continue;
            }
            table.rows.push(row.iter().map(Scalar::from_json).collect());
        }

        Ok(table)
    }
}
