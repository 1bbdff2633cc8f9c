//! Fix engine that turns an issue into a new table.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::detect::{charset, dates, duplicate_groups, stats};
use crate::error::{DoctorError, Result};
use crate::issue::{ENTIRE_ROW, Issue, IssueType, UNKNOWN_PLACEHOLDER, rules};
use crate::table::Table;

use super::operations::{FixChange, FixOperation, FixResult, RowAudit};

/// Applies auto-fixes to tables.
///
/// Fixes never modify their input: each one returns a new table, so callers
/// can keep earlier generations around for comparison.
pub struct FixEngine;

impl FixEngine {
    /// Create a new fix engine.
    pub fn new() -> Self {
        Self
    }

    /// Apply the fix for `issue` to `table`.
    ///
    /// Fails with [`DoctorError::UnsupportedFix`] for outliers, for issues not
    /// marked auto-fixable, and for columns the table does not have.
    pub fn apply_fix(&self, table: &Table, issue: &Issue) -> Result<FixResult> {
        let operation = self.plan(table, issue)?;
        let (fixed, change) = self.apply_operation(&operation, table)?;

        debug!(
            column = %issue.column,
            issue_type = %issue.issue_type,
            resolved = change.values_changed,
            "Applied fix"
        );

        Ok(FixResult {
            table: fixed,
            resolved_count: change.values_changed,
            change,
        })
    }

    /// Decide which operation resolves an issue.
    pub fn plan(&self, table: &Table, issue: &Issue) -> Result<FixOperation> {
        if !issue.issue_type.is_auto_fixable() {
            return Err(DoctorError::unsupported(format!(
                "{} issues require manual review",
                issue.issue_type
            )));
        }
        if !issue.auto_fixable {
            return Err(DoctorError::unsupported(format!(
                "issue '{}' is not marked auto-fixable",
                issue.key()
            )));
        }

        match issue.issue_type {
            IssueType::Duplicate => {
                if !issue.is_row_level() {
                    return Err(DoctorError::unsupported(format!(
                        "duplicate issues apply to '{}', not '{}'",
                        ENTIRE_ROW, issue.column
                    )));
                }
                Ok(FixOperation::RemoveDuplicateRows)
            }
            IssueType::Missing => {
                let col_idx = resolve_column(table, &issue.column)?;
                Ok(FixOperation::FillMissing {
                    column: issue.column.clone(),
                    fill: fill_value(table, col_idx, &issue.column),
                })
            }
            IssueType::Format => {
                resolve_column(table, &issue.column)?;
                Ok(FixOperation::NormalizeDates {
                    column: issue.column.clone(),
                })
            }
            IssueType::Encoding => {
                resolve_column(table, &issue.column)?;
                Ok(FixOperation::Transliterate {
                    column: issue.column.clone(),
                })
            }
            IssueType::Outlier => Err(DoctorError::unsupported(
                "outlier issues require manual review",
            )),
        }
    }

    /// Apply a planned operation.
    pub fn apply_operation(
        &self,
        operation: &FixOperation,
        table: &Table,
    ) -> Result<(Table, FixChange)> {
        match operation {
            FixOperation::RemoveDuplicateRows => Ok(self.remove_duplicates(table, operation)),
            FixOperation::FillMissing { column, fill } => {
                let col_idx = resolve_column(table, column)?;
                Ok(rewrite_column(table, operation, col_idx, |value| {
                    Table::is_blank(value).then(|| {
                        (fill.clone(), format!("Filled blank value with '{}'", fill))
                    })
                }))
            }
            FixOperation::NormalizeDates { column } => {
                let col_idx = resolve_column(table, column)?;
                Ok(rewrite_column(table, operation, col_idx, |value| {
                    dates::canonicalize(value)
                        .filter(|canonical| canonical != value)
                        .map(|canonical| {
                            (canonical, "Rewrote date as YYYY-MM-DD".to_string())
                        })
                }))
            }
            FixOperation::Transliterate { column } => {
                let col_idx = resolve_column(table, column)?;
                Ok(rewrite_column(table, operation, col_idx, |value| {
                    charset::has_disallowed(value).then(|| {
                        (
                            charset::clean(value),
                            "Replaced non-standard characters".to_string(),
                        )
                    })
                }))
            }
        }
    }

    fn remove_duplicates(&self, table: &Table, operation: &FixOperation) -> (Table, FixChange) {
        let canonical_of: HashMap<usize, usize> = duplicate_groups(table)
            .into_iter()
            .flat_map(|group| {
                let first = group[0];
                group.into_iter().skip(1).map(move |row| (row, first))
            })
            .collect();

        let mut kept = Vec::with_capacity(table.row_count() - canonical_of.len());
        let mut row_audits = Vec::with_capacity(canonical_of.len());

        for (row_idx, row) in table.rows().iter().enumerate() {
            match canonical_of.get(&row_idx) {
                Some(first) => row_audits.push(RowAudit {
                    row: row_idx,
                    column: ENTIRE_ROW.to_string(),
                    original_value: row.join(","),
                    new_value: String::new(),
                    fix_type: IssueType::Duplicate,
                    reason: format!("Duplicate of row {}", first),
                }),
                None => kept.push(row.clone()),
            }
        }

        let change = FixChange {
            description: operation.description(),
            column: ENTIRE_ROW.to_string(),
            values_changed: row_audits.len(),
            row_audits,
        };

        (
            Table::from_parts(table.headers().to_vec(), kept),
            change,
        )
    }
}

impl Default for FixEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_column(table: &Table, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| DoctorError::unsupported(format!("column '{}' not found", column)))
}

/// Rewrite the cells of one column for which `rewrite` returns a new value
/// and a reason, recording an audit per changed cell.
fn rewrite_column<F>(
    table: &Table,
    operation: &FixOperation,
    col_idx: usize,
    mut rewrite: F,
) -> (Table, FixChange)
where
    F: FnMut(&str) -> Option<(String, String)>,
{
    let column = table.headers()[col_idx].clone();
    let fix_type = operation.issue_type();
    let mut row_audits = Vec::new();

    let fixed = table.map_column(col_idx, |row_idx, value| {
        let (new_value, reason) = rewrite(value)?;
        row_audits.push(RowAudit {
            row: row_idx,
            column: column.clone(),
            original_value: value.to_string(),
            new_value: new_value.clone(),
            fix_type,
            reason,
        });
        Some(new_value)
    });

    let change = FixChange {
        description: operation.description(),
        column,
        values_changed: row_audits.len(),
        row_audits,
    };
    (fixed, change)
}

/// Value written into blank cells of a column.
///
/// Columns named like `age` or `number` get the median of their numeric
/// values; everything else, and numeric columns with nothing to take a
/// median of, gets the placeholder.
fn fill_value(table: &Table, col_idx: usize, column: &str) -> String {
    if !rules::uses_median_fill(column) {
        return UNKNOWN_PLACEHOLDER.to_string();
    }

    match median_fill(table, col_idx, column) {
        Ok(fill) => fill,
        Err(e) => {
            warn!(column, error = %e, "Falling back to placeholder fill");
            UNKNOWN_PLACEHOLDER.to_string()
        }
    }
}

fn median_fill(table: &Table, col_idx: usize, column: &str) -> Result<String> {
    let values: Vec<f64> = table
        .column_values(col_idx)
        .filter(|value| !Table::is_blank(value))
        .filter_map(stats::parse_number)
        .collect();

    stats::median(&values)
        .map(stats::format_number)
        .ok_or_else(|| DoctorError::Fix(format!("column '{}' has no numeric values", column)))
}
