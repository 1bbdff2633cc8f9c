//! Issue types for data quality problems.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DoctorError;

use super::rules;

/// Column sentinel for issues that concern whole rows.
pub const ENTIRE_ROW: &str = "entire_row";

/// Type of issue detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Rows identical to an earlier row.
    Duplicate,
    /// Empty or whitespace-only cells.
    Missing,
    /// Mixed date formats in a date/time column.
    Format,
    /// Numeric values far from the column mean.
    Outlier,
    /// Control characters or mis-decoded text.
    Encoding,
}

impl IssueType {
    /// Every issue type, in detection order.
    pub const ALL: [IssueType; 5] = [
        IssueType::Duplicate,
        IssueType::Missing,
        IssueType::Format,
        IssueType::Outlier,
        IssueType::Encoding,
    ];

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Duplicate => "duplicate",
            IssueType::Missing => "missing",
            IssueType::Format => "format",
            IssueType::Outlier => "outlier",
            IssueType::Encoding => "encoding",
        }
    }

    /// Get a human-readable label for the issue type.
    pub fn label(&self) -> &'static str {
        match self {
            IssueType::Duplicate => "Duplicate Rows",
            IssueType::Missing => "Missing Values",
            IssueType::Format => "Format Inconsistency",
            IssueType::Outlier => "Outliers",
            IssueType::Encoding => "Encoding Problem",
        }
    }

    /// Whether issues of this type can be fixed without review.
    pub fn is_auto_fixable(&self) -> bool {
        rules::is_auto_fixable(*self)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = DoctorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DoctorError::unsupported(format!("unknown issue type '{}'", s)))
    }
}

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor issue, worth a look.
    Low,
    /// Issue that should be reviewed.
    Medium,
    /// Issue that should be addressed before using the data.
    High,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }

    /// Penalty weight used by the quality score.
    pub fn weight(&self) -> f64 {
        rules::severity_weight(*self)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of an issue within one analysis: the `(column, type)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IssueKey {
    /// Affected column, or [`ENTIRE_ROW`].
    pub column: String,
    /// Type of issue.
    #[serde(rename = "type")]
    pub issue_type: IssueType,
}

impl IssueKey {
    /// Create a key.
    pub fn new(column: impl Into<String>, issue_type: IssueType) -> Self {
        Self {
            column: column.into(),
            issue_type,
        }
    }

    /// Key of the row-level duplicate issue.
    pub fn duplicate_rows() -> Self {
        Self::new(ENTIRE_ROW, IssueType::Duplicate)
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column, self.issue_type)
    }
}

/// Parses `COLUMN:TYPE`. The type is taken after the last colon, so column
/// names may contain colons themselves.
impl FromStr for IssueKey {
    type Err = DoctorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, issue_type) = s.rsplit_once(':').ok_or_else(|| {
            DoctorError::unsupported(format!("expected COLUMN:TYPE, got '{}'", s))
        })?;
        Ok(Self::new(column, issue_type.parse()?))
    }
}

/// A detected data quality issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Affected column name, or [`ENTIRE_ROW`].
    pub column: String,
    /// Type of issue.
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Severity level.
    pub severity: Severity,
    /// Number of offending rows or cells.
    pub count: usize,
    /// Human-readable description.
    pub description: String,
    /// Whether the fixer may resolve this issue automatically.
    pub auto_fixable: bool,
    /// Up to five zero-based row indices showing the problem.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_rows: Vec<usize>,
}

/// Rows kept as evidence per issue.
pub(crate) const MAX_SAMPLE_ROWS: usize = 5;

impl Issue {
    /// Create an issue; description and fixability follow from the type.
    pub fn new(
        column: impl Into<String>,
        issue_type: IssueType,
        severity: Severity,
        count: usize,
    ) -> Self {
        let column = column.into();
        Self {
            description: rules::describe(&column, issue_type, count),
            auto_fixable: issue_type.is_auto_fixable(),
            column,
            issue_type,
            severity,
            count,
            sample_rows: Vec::new(),
        }
    }

    /// Set the sample rows, keeping at most five.
    pub fn with_sample_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.sample_rows = rows.into_iter().take(MAX_SAMPLE_ROWS).collect();
        self
    }

    /// Identity of this issue.
    pub fn key(&self) -> IssueKey {
        IssueKey::new(self.column.clone(), self.issue_type)
    }

    /// Whether the issue concerns whole rows rather than one column.
    pub fn is_row_level(&self) -> bool {
        self.column == ENTIRE_ROW && self.issue_type == IssueType::Duplicate
    }

    /// What the fixer would do about this issue.
    pub fn fix_suggestion(&self) -> &'static str {
        rules::fix_suggestion(&self.column, self.issue_type)
    }
}
