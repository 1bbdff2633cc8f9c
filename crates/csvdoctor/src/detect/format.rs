//! Mixed date format detection.

use std::collections::BTreeMap;

use tracing::debug;

use crate::issue::{Issue, IssueType, SeverityMetric, UNKNOWN_PLACEHOLDER, rules};
use crate::table::Table;

use super::dates::DatePattern;
use super::engine::Detector;

/// Validates date/time columns for format inconsistencies.
///
/// Only columns whose name contains `date` or `time` are checked. Each
/// non-empty value is classified as one of the recognized patterns or as
/// unrecognized; more than one class in a column is an issue whose count is
/// the number of values outside the most common class.
///
/// Cells equal to the `Unknown` fill placeholder are not classified, which
/// departs from classifying every non-empty value: the placeholder marks a
/// gap, so a column filled by the missing-value fix does not turn into a
/// format issue. This applies to raw data too, so `Unknown` in an untouched
/// date column is never reported.
pub struct DateFormatDetector;

/// Per-row patterns of a column's non-empty values.
pub(crate) fn classify_column(table: &Table, col_idx: usize) -> Vec<(usize, DatePattern)> {
    table
        .column_values(col_idx)
        .enumerate()
        .filter(|(_, value)| !Table::is_blank(value) && value.trim() != UNKNOWN_PLACEHOLDER)
        .map(|(row_idx, value)| (row_idx, DatePattern::classify(value)))
        .collect()
}

/// Most common pattern; ties go to the earlier pattern in declaration order.
fn majority(counts: &BTreeMap<DatePattern, usize>) -> Option<DatePattern> {
    counts
        .iter()
        .max_by(|(pa, ca), (pb, cb)| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(pattern, _)| *pattern)
}

impl Detector for DateFormatDetector {
    fn name(&self) -> &'static str {
        "date_format_detector"
    }

    fn detect(&self, table: &Table) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (col_idx, name) in table.distinct_columns() {
            if !rules::is_date_column(name) {
                continue;
            }

            let classified = classify_column(table, col_idx);
            let mut counts: BTreeMap<DatePattern, usize> = BTreeMap::new();
            for (_, pattern) in &classified {
                *counts.entry(*pattern).or_insert(0) += 1;
            }

            if counts.len() <= 1 {
                continue;
            }
            let Some(dominant) = majority(&counts) else {
                continue;
            };

            let off_rows: Vec<usize> = classified
                .iter()
                .filter(|(_, pattern)| *pattern != dominant)
                .map(|(row_idx, _)| *row_idx)
                .collect();

            debug!(
                column = name,
                dominant = dominant.description(),
                off_pattern = off_rows.len(),
                "Mixed date formats"
            );

            let severity = rules::severity_for(SeverityMetric::Format {
                has_unrecognized: counts.contains_key(&DatePattern::Unrecognized),
            });

            issues.push(
                Issue::new(name, IssueType::Format, severity, off_rows.len())
                    .with_sample_rows(off_rows),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;

    fn single_column(name: &str, values: &[&str]) -> Table {
        let rows: Vec<Vec<&str>> = values.iter().map(|v| vec![*v]).collect();
        Table::from_records(&[name], &rows).unwrap()
    }

    #[test]
    fn test_iso_and_unrecognized() {
        let table = single_column("signup_date", &["2023-01-15", "2023/01/17"]);

        let issues = DateFormatDetector.detect(&table);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert_eq!(issues[0].sample_rows, vec![1]);
    }

    #[test]
    fn test_recognized_mix_is_low() {
        let table = single_column(
            "visit_date",
            &["2023-01-15", "01/16/2023", "2023-01-17", "2023-01-18"],
        );

        let issues = DateFormatDetector.detect(&table);
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_majority_can_be_non_iso() {
        let table = single_column(
            "created_time",
            &["01/15/2023", "01/16/2023", "01/17/2023", "2023-01-18"],
        );

        let issues = DateFormatDetector.detect(&table);
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].sample_rows, vec![3]);
    }

    #[test]
    fn test_consistent_column_has_no_issue() {
        let table = single_column("date", &["2023-01-15", "", "2023-02-01"]);
        assert!(DateFormatDetector.detect(&table).is_empty());

        let all_odd = single_column("date", &["Jan 1", "Feb 2"]);
        assert!(DateFormatDetector.detect(&all_odd).is_empty());
    }

    #[test]
    fn test_only_date_named_columns() {
        let table = single_column("name", &["2023-01-15", "2023/01/17"]);
        assert!(DateFormatDetector.detect(&table).is_empty());
    }

    #[test]
    fn test_placeholder_is_skipped() {
        let table = single_column("date", &["2023-01-15", "Unknown", "2023-02-01"]);
        assert!(DateFormatDetector.detect(&table).is_empty());
    }

    #[test]
    fn test_tie_prefers_recognized_pattern() {
        let mut counts = BTreeMap::new();
        counts.insert(DatePattern::Unrecognized, 2);
        counts.insert(DatePattern::UsSlash, 2);
        counts.insert(DatePattern::Iso, 1);
        assert_eq!(majority(&counts), Some(DatePattern::UsSlash));
    }
}
