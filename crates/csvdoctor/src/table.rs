//! Rectangular in-memory table the engine operates on.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DoctorError, Result};

/// Parsed tabular data: ordered headers and ordered rows of cell strings.
///
/// Every row has exactly one cell per header; this is checked on
/// construction (and on deserialization), so the detectors and fixers can
/// index cells without bounds juggling. A `Table` is never mutated by the
/// engine: fixes build a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Unchecked wire shape of a [`Table`].
#[derive(Deserialize)]
struct RawTable {
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl TryFrom<RawTable> for Table {
    type Error = DoctorError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Table::new(raw.headers, raw.rows)
    }
}

impl Table {
    /// Create a table, rejecting rows whose length differs from the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let expected = headers.len();
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != expected)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(DoctorError::MalformedTable {
                row,
                expected,
                found,
            });
        }

        Ok(Self { headers, rows })
    }

    /// Convenience constructor from string slices.
    pub fn from_records<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) -> Result<Self> {
        Self::new(
            headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
        )
    }

    /// Build a table from rows that are known to be rectangular.
    pub(crate) fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Self { headers, rows }
    }

    /// Column headers in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in file order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column carrying `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Columns the per-column rules look at: the first occurrence of each
    /// header name, in header order.
    pub fn distinct_columns(&self) -> impl Iterator<Item = (usize, &str)> {
        let mut seen = HashSet::new();
        self.headers
            .iter()
            .enumerate()
            .filter_map(move |(i, name)| seen.insert(name.as_str()).then_some((i, name.as_str())))
    }

    /// Header names that occur more than once, in order of first appearance.
    pub fn duplicate_headers(&self) -> Vec<String> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for header in &self.headers {
            *counts.entry(header.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Copy of this table with one column's cells rewritten.
    ///
    /// `rewrite` gets each cell and returns `Some(new)` to replace it.
    pub(crate) fn map_column<F>(&self, col: usize, mut rewrite: F) -> Self
    where
        F: FnMut(usize, &str) -> Option<String>,
    {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let mut row = row.clone();
                if let Some(cell) = row.get_mut(col) {
                    if let Some(new_value) = rewrite(row_idx, cell) {
                        *cell = new_value;
                    }
                }
                row
            })
            .collect();
        Self::from_parts(self.headers.clone(), rows)
    }

    /// Check if a value counts as missing: empty or all whitespace.
    pub fn is_blank(value: &str) -> bool {
        value.trim().is_empty()
    }
}
