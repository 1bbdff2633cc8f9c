//! Fixed severity, fixability and wording rules.
//!
//! Every decision that depends only on the issue type and a computed metric
//! lives here as a pure function, so detectors never hard-code thresholds.

use super::types::{IssueType, Severity};

/// Placeholder written into blank text cells.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Metric a detector computed, tagged by the rule that computed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityMetric {
    /// Duplicate rows out of all rows.
    Duplicate { duplicates: usize, total_rows: usize },
    /// Blank cells out of all rows.
    Missing { missing: usize, total_rows: usize },
    /// Whether any non-empty value matched no known date pattern.
    Format { has_unrecognized: bool },
    /// Outliers are always low.
    Outlier,
    /// Encoding problems are always medium.
    Encoding,
}

impl SeverityMetric {
    /// Issue type this metric belongs to.
    pub fn issue_type(&self) -> IssueType {
        match self {
            SeverityMetric::Duplicate { .. } => IssueType::Duplicate,
            SeverityMetric::Missing { .. } => IssueType::Missing,
            SeverityMetric::Format { .. } => IssueType::Format,
            SeverityMetric::Outlier => IssueType::Outlier,
            SeverityMetric::Encoding => IssueType::Encoding,
        }
    }
}

/// Severity for a computed metric.
///
/// Ratios are compared in integer arithmetic (`part * 100 >= pct * total`)
/// so that boundary cases like exactly 5% are exact.
pub fn severity_for(metric: SeverityMetric) -> Severity {
    match metric {
        SeverityMetric::Duplicate {
            duplicates,
            total_rows,
        } => {
            if at_least_percent(duplicates, total_rows, 5) {
                Severity::High
            } else {
                Severity::Medium
            }
        }
        SeverityMetric::Missing { missing, total_rows } => {
            if at_least_percent(missing, total_rows, 20) {
                Severity::High
            } else if at_least_percent(missing, total_rows, 5) {
                Severity::Medium
            } else {
                Severity::Low
            }
        }
        SeverityMetric::Format { has_unrecognized } => {
            if has_unrecognized {
                Severity::Medium
            } else {
                Severity::Low
            }
        }
        SeverityMetric::Outlier => Severity::Low,
        SeverityMetric::Encoding => Severity::Medium,
    }
}

fn at_least_percent(part: usize, total: usize, pct: usize) -> bool {
    total > 0 && part.saturating_mul(100) >= pct.saturating_mul(total)
}

/// Whether issues of a type may be fixed automatically.
pub fn is_auto_fixable(issue_type: IssueType) -> bool {
    match issue_type {
        IssueType::Duplicate | IssueType::Missing | IssueType::Format | IssueType::Encoding => {
            true
        }
        IssueType::Outlier => false,
    }
}

/// Score penalty weight for a severity.
pub fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::High => 40.0,
        Severity::Medium => 20.0,
        Severity::Low => 8.0,
    }
}

/// Description of an issue; depends only on `(column, type, count)`.
pub fn describe(column: &str, issue_type: IssueType, count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    match issue_type {
        IssueType::Duplicate => format!("{} duplicate row{} found", count, plural),
        IssueType::Missing => {
            format!("{} missing value{} in '{}' column", count, plural, column)
        }
        IssueType::Format => format!(
            "{} value{} in '{}' not matching the dominant date format",
            count, plural, column
        ),
        IssueType::Outlier => format!(
            "{} value{} in '{}' more than 3 standard deviations from the mean",
            count, plural, column
        ),
        IssueType::Encoding => format!(
            "{} value{} in '{}' with control or non-standard characters",
            count, plural, column
        ),
    }
}

/// Whether a column's name marks it as date/time data.
pub fn is_date_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("date") || lower.contains("time")
}

/// Whether blanks in a column are filled with the column median.
pub fn uses_median_fill(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("age") || lower.contains("number")
}

/// Short description of the fix for an issue.
pub fn fix_suggestion(column: &str, issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::Duplicate => "Remove duplicate rows while preserving the first occurrence",
        IssueType::Missing if uses_median_fill(column) => "Fill missing values with median",
        IssueType::Missing => "Fill missing values with \"Unknown\"",
        IssueType::Format => "Standardize date format to ISO-8601 (YYYY-MM-DD)",
        IssueType::Outlier => "Flag outliers for manual review",
        IssueType::Encoding => "Replace non-standard characters with ASCII equivalents",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_thresholds() {
        let sev = |d, t| severity_for(SeverityMetric::Duplicate { duplicates: d, total_rows: t });
        assert_eq!(sev(1, 100), Severity::Medium);
        assert_eq!(sev(4, 100), Severity::Medium);
        assert_eq!(sev(5, 100), Severity::High);
        assert_eq!(sev(1, 4), Severity::High);
    }

    #[test]
    fn test_missing_thresholds() {
        let sev = |m, t| severity_for(SeverityMetric::Missing { missing: m, total_rows: t });
        assert_eq!(sev(1, 100), Severity::Low);
        assert_eq!(sev(5, 100), Severity::Medium);
        assert_eq!(sev(19, 100), Severity::Medium);
        assert_eq!(sev(20, 100), Severity::High);
        assert_eq!(sev(1, 4), Severity::High);
    }

    #[test]
    fn test_fixed_severities() {
        assert_eq!(severity_for(SeverityMetric::Outlier), Severity::Low);
        assert_eq!(severity_for(SeverityMetric::Encoding), Severity::Medium);
        assert_eq!(
            severity_for(SeverityMetric::Format { has_unrecognized: false }),
            Severity::Low
        );
        assert_eq!(
            severity_for(SeverityMetric::Format { has_unrecognized: true }),
            Severity::Medium
        );
    }

    #[test]
    fn test_fixability_covers_every_type() {
        let fixable: Vec<_> = IssueType::ALL.into_iter().filter(|t| is_auto_fixable(*t)).collect();
        assert_eq!(
            fixable,
            vec![IssueType::Duplicate, IssueType::Missing, IssueType::Format, IssueType::Encoding]
        );
    }

    #[test]
    fn test_metric_maps_to_type() {
        assert_eq!(SeverityMetric::Outlier.issue_type(), IssueType::Outlier);
        assert_eq!(
            SeverityMetric::Missing { missing: 0, total_rows: 0 }.issue_type(),
            IssueType::Missing
        );
    }

    #[test]
    fn test_describe_is_deterministic() {
        assert_eq!(describe("entire_row", IssueType::Duplicate, 1), "1 duplicate row found");
        assert_eq!(describe("age", IssueType::Missing, 3), "3 missing values in 'age' column");
        assert_eq!(
            describe("age", IssueType::Missing, 3),
            describe("age", IssueType::Missing, 3)
        );
    }

    #[test]
    fn test_column_name_rules() {
        assert!(is_date_column("signup_date"));
        assert!(is_date_column("Timestamp"));
        assert!(!is_date_column("name"));

        assert!(uses_median_fill("age"));
        assert!(uses_median_fill("Phone_Number"));
        assert!(uses_median_fill("page_views"));
        assert!(!uses_median_fill("email"));
    }

    #[test]
    fn test_fix_suggestion_for_missing_depends_on_column() {
        assert_eq!(fix_suggestion("age", IssueType::Missing), "Fill missing values with median");
        assert_eq!(
            fix_suggestion("city", IssueType::Missing),
            "Fill missing values with \"Unknown\""
        );
    }
}
