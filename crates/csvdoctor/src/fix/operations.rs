//! Fix operations and their results.

use serde::{Deserialize, Serialize};

use crate::issue::IssueType;
use crate::table::Table;

/// A fix planned for one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FixOperation {
    /// Drop every row identical to an earlier row.
    RemoveDuplicateRows,

    /// Replace blank cells of a column with a fixed value.
    FillMissing { column: String, fill: String },

    /// Rewrite parsable dates of a column to `YYYY-MM-DD`.
    NormalizeDates { column: String },

    /// Replace or drop disallowed characters in a column.
    Transliterate { column: String },
}

impl FixOperation {
    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            FixOperation::RemoveDuplicateRows => {
                "Remove duplicate rows, keeping the first occurrence".to_string()
            }
            FixOperation::FillMissing { column, fill } => {
                format!("Fill blank cells in '{}' with '{}'", column, fill)
            }
            FixOperation::NormalizeDates { column } => {
                format!("Rewrite dates in '{}' as YYYY-MM-DD", column)
            }
            FixOperation::Transliterate { column } => {
                format!("Replace non-standard characters in '{}'", column)
            }
        }
    }

    /// Issue type this operation resolves.
    pub fn issue_type(&self) -> IssueType {
        match self {
            FixOperation::RemoveDuplicateRows => IssueType::Duplicate,
            FixOperation::FillMissing { .. } => IssueType::Missing,
            FixOperation::NormalizeDates { .. } => IssueType::Format,
            FixOperation::Transliterate { .. } => IssueType::Encoding,
        }
    }
}

/// Result of applying one fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixResult {
    /// The fixed table; the input table is left untouched.
    pub table: Table,

    /// Number of rows removed or cells rewritten.
    pub resolved_count: usize,

    /// What was changed, row by row.
    pub change: FixChange,
}

/// The change made by a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixChange {
    /// Description of the change.
    pub description: String,

    /// Column affected.
    pub column: String,

    /// Number of values changed.
    pub values_changed: usize,

    /// Per-row audit information.
    pub row_audits: Vec<RowAudit>,
}

/// Audit information for a single altered cell or removed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowAudit {
    /// Row index (0-based) in the table the fix was applied to.
    pub row: usize,

    /// Column that was changed.
    pub column: String,

    /// Original value before the fix. Removed rows are shown joined by
    /// commas.
    pub original_value: String,

    /// New value after the fix; empty for removed rows.
    pub new_value: String,

    /// Type of issue the fix resolved.
    pub fix_type: IssueType,

    /// Reason for the change.
    pub reason: String,
}
