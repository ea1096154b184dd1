//! Row-keyed metric tables.
//!
//! Every view is materialized as a `MetricTable`: metric (or sample) names
//! as row keys, statistics or per-core labels as columns. All cells are
//! numeric except the reserved timestamp column.

use crate::parser::timestamp::parse_timestamp;
use crate::utils::config::TIMESTAMP_COLUMN;
use crate::utils::error::ViewError;
use chrono::NaiveDateTime;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::view::Projection;

/// Case folding shared by every key and column comparison
fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Rows exactly as read from a backend, before coercion
///
/// `header[0]` labels the index column; `rows[i][0]` is the row key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Coerce raw text to a number; anything unparseable is missing
    pub fn numeric(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if !value.is_nan() => Self::Number(value),
            _ => Self::Missing,
        }
    }

    pub fn text(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            Self::Missing
        } else {
            Self::Text(raw.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
            Self::Missing => f.write_str("-"),
        }
    }
}

/// One keyed row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub key: String,
    pub cells: Vec<Cell>,
}

/// A 2-D table with unique (case-insensitive) row keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    pub index_name: String,
    columns: Vec<String>,
    rows: Vec<MetricRow>,
}

impl MetricTable {
    /// Build an empty table with the given columns
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            index_name: index_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Coerce a raw table
    ///
    /// Every column except `timestamp` is parsed as a number; failures
    /// become `Cell::Missing`. Rows whose key repeats an earlier key
    /// (ignoring case) are dropped.
    ///
    /// # Errors
    /// * `ViewError::MalformedTable` - no header row
    pub fn from_raw(raw: RawTable) -> Result<Self, ViewError> {
        let mut header = raw.header.into_iter();
        let index_name = header
            .next()
            .ok_or_else(|| ViewError::MalformedTable("missing header row".to_string()))?;
        let columns: Vec<String> = header.map(|c| c.trim().to_string()).collect();

        let is_timestamp: Vec<bool> = columns
            .iter()
            .map(|c| c.eq_ignore_ascii_case(TIMESTAMP_COLUMN))
            .collect();

        let mut table = Self::new(index_name.trim(), columns);
        let mut seen: HashSet<String> = HashSet::with_capacity(raw.rows.len());
        for raw_row in raw.rows {
            let mut values = raw_row.into_iter();
            let Some(key) = values.next() else {
                continue;
            };

            let mut cells: Vec<Cell> = values
                .zip(is_timestamp.iter())
                .map(|(value, &ts)| if ts { Cell::text(&value) } else { Cell::numeric(&value) })
                .collect();
            cells.resize(table.columns.len(), Cell::Missing);

            let key = key.trim().to_string();
            if !seen.insert(fold(&key)) {
                warn!("Dropping duplicate row key '{}'", key);
                continue;
            }
            table.rows.push(MetricRow { key, cells });
        }

        debug!(
            "Coerced table: {} rows x {} columns",
            table.rows.len(),
            table.columns.len()
        );

        Ok(table)
    }

    /// Append a row, keeping keys unique
    ///
    /// Returns false (and drops the row) when the key already exists.
    pub fn push_row(&mut self, key: impl Into<String>, mut cells: Vec<Cell>) -> bool {
        let key = key.into();
        if self.row(&key).is_some() {
            warn!("Dropping duplicate row key '{}'", key);
            return false;
        }
        cells.resize(self.columns.len(), Cell::Missing);
        self.rows.push(MetricRow { key, cells });
        true
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a row by key, ignoring case
    pub fn row(&self, key: &str) -> Option<&MetricRow> {
        let key = fold(key);
        self.rows.iter().find(|r| fold(&r.key) == key)
    }

    /// Position of a column; exact match wins over a case-insensitive one
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| {
                let name = fold(name);
                self.columns.iter().position(|c| fold(c) == name)
            })
    }

    pub fn get(&self, row: &str, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.row(row)?.cells.get(index)
    }

    pub fn value(&self, row: &str, column: &str) -> Option<f64> {
        self.get(row, column).and_then(Cell::as_f64)
    }

    /// All `(key, cell)` pairs of one column
    pub fn column(&self, name: &str) -> Option<Vec<(&str, &Cell)>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| (r.key.as_str(), &r.cells[index]))
                .collect(),
        )
    }

    /// Column names containing `needle`, ignoring case
    pub fn columns_matching(&self, needle: &str) -> Vec<&str> {
        let needle = fold(needle);
        self.columns
            .iter()
            .filter(|c| fold(c).contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Keep rows whose key is listed, in table order
    pub fn select_rows<S: AsRef<str>>(&self, keys: &[S]) -> Self {
        let wanted: HashSet<String> = keys.iter().map(|k| fold(k.as_ref())).collect();
        Self {
            index_name: self.index_name.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| wanted.contains(&fold(&r.key)))
                .cloned()
                .collect(),
        }
    }

    /// Keep listed columns, in the listed order; unknown names are skipped
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let mut indices: Vec<usize> = Vec::with_capacity(names.len());
        for name in names {
            match self.column_index(name.as_ref()) {
                Some(index) if !indices.contains(&index) => indices.push(index),
                Some(_) => {}
                None => debug!("Projection column '{}' not in table", name.as_ref()),
            }
        }

        Self {
            index_name: self.index_name.clone(),
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| MetricRow {
                    key: r.key.clone(),
                    cells: indices.iter().map(|&i| r.cells[i].clone()).collect(),
                })
                .collect(),
        }
    }

    /// Apply a row/column allow-list
    pub fn project(&self, projection: &Projection) -> Self {
        let rows = match &projection.rows {
            Some(keys) => self.select_rows(keys),
            None => self.clone(),
        };
        match &projection.columns {
            Some(columns) => rows.select_columns(columns),
            None => rows,
        }
    }

    /// Replace each missing cell with the last present value above it
    pub fn forward_fill(&mut self) {
        for col in 0..self.columns.len() {
            let mut last: Option<Cell> = None;
            for row in &mut self.rows {
                let cell = &mut row.cells[col];
                if cell.is_missing() {
                    if let Some(previous) = &last {
                        *cell = previous.clone();
                    }
                } else {
                    last = Some(cell.clone());
                }
            }
        }
    }

    /// Parsed timestamp per row, or `None` when the table has no timestamp column
    pub fn timestamps(&self) -> Option<Vec<Option<NaiveDateTime>>> {
        let index = self.column_index(TIMESTAMP_COLUMN)?;
        Some(
            self.rows
                .iter()
                .map(|r| {
                    let text = r.cells[index].as_text()?;
                    let parsed = parse_timestamp(text);
                    if parsed.is_none() {
                        warn!("Unparseable timestamp '{}' in row '{}'", text, r.key);
                    }
                    parsed
                })
                .collect(),
        )
    }

    /// Copy of this table with every row key lower-cased
    pub fn case_folded(&self) -> Self {
        let mut folded = Self::new(self.index_name.clone(), self.columns.clone());
        for row in &self.rows {
            folded.push_row(fold(&row.key), row.cells.clone());
        }
        folded
    }
}
