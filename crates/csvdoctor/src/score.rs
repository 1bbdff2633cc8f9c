//! Aggregate quality score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::issue::{Issue, Severity};
use crate::table::Table;

/// Score of a table with no issues.
pub const MAX_SCORE: u8 = 100;

/// Compute the 0-100 quality score for a table and its issues.
///
/// Each issue subtracts `weight(severity) * min(1, count / total_rows)`.
/// On a table without rows any issue counts as fully affecting it.
pub fn score(table: &Table, issues: &[Issue]) -> u8 {
    let total_rows = table.row_count();

    let penalty: f64 = issues
        .iter()
        .map(|issue| issue.severity.weight() * affected_ratio(issue.count, total_rows))
        .sum();

    let raw = (f64::from(MAX_SCORE) - penalty).clamp(0.0, f64::from(MAX_SCORE));
    raw.round() as u8
}

fn affected_ratio(count: usize, total_rows: usize) -> f64 {
    if total_rows == 0 {
        return if count > 0 { 1.0 } else { 0.0 };
    }
    (count as f64 / total_rows as f64).min(1.0)
}

/// Coarse band of a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    /// Below 60.
    Poor,
    /// 60 to 79.
    Fair,
    /// 80 and above.
    Good,
}

impl QualityGrade {
    /// Band a score.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => QualityGrade::Good,
            60..=79 => QualityGrade::Fair,
            _ => QualityGrade::Poor,
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            QualityGrade::Good => "Good",
            QualityGrade::Fair => "Fair",
            QualityGrade::Poor => "Poor",
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One-line recommendation for an analysis.
pub fn recommendation(issues: &[Issue], score: u8) -> String {
    let high = issues.iter().filter(|i| i.severity == Severity::High).count();
    let fixable = issues.iter().filter(|i| i.auto_fixable).count();

    if issues.is_empty() {
        "No issues detected. Data is ready for analysis.".to_string()
    } else if high > 0 {
        format!(
            "Address {} high-severity issue(s) before proceeding with analysis ({} auto-fixable).",
            high, fixable
        )
    } else if QualityGrade::from_score(score) == QualityGrade::Good {
        "Data quality is good. Minor issues detected for review.".to_string()
    } else if fixable > 0 {
        format!(
            "Apply the {} auto-fix(es) to improve data quality (score: {}%).",
            fixable, score
        )
    } else {
        "Data quality needs attention. Review all issues.".to_string()
    }
}
