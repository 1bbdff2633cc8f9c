//! Blank cell detection.

use crate::issue::{Issue, IssueType, SeverityMetric, rules};
use crate::table::Table;

use super::engine::Detector;

/// Counts empty or whitespace-only cells per column.
pub struct MissingValueDetector;

impl Detector for MissingValueDetector {
    fn name(&self) -> &'static str {
        "missing_value_detector"
    }

    fn detect(&self, table: &Table) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (col_idx, name) in table.distinct_columns() {
            let blank_rows: Vec<usize> = table
                .column_values(col_idx)
                .enumerate()
                .filter(|(_, value)| Table::is_blank(value))
                .map(|(row_idx, _)| row_idx)
                .collect();

            if blank_rows.is_empty() {
                continue;
            }

            let count = blank_rows.len();
            let severity = rules::severity_for(SeverityMetric::Missing {
                missing: count,
                total_rows: table.row_count(),
            });

            issues.push(
                Issue::new(name, IssueType::Missing, severity, count).with_sample_rows(blank_rows),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;

    #[test]
    fn test_counts_blank_and_whitespace() {
        let table = Table::from_records(
            &["name", "age"],
            &[
                vec!["Alice", "25"],
                vec!["", "32"],
                vec!["  ", ""],
                vec!["Dan", "40"],
            ],
        )
        .unwrap();

        let issues = MissingValueDetector.detect(&table);
        assert_eq!(issues.len(), 2);

        assert_eq!(issues[0].column, "name");
        assert_eq!(issues[0].count, 2);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].sample_rows, vec![1, 2]);

        assert_eq!(issues[1].column, "age");
        assert_eq!(issues[1].count, 1);
    }

    #[test]
    fn test_na_strings_are_not_blank() {
        let table = Table::from_records(&["x"], &[vec!["NA"], vec!["null"], vec!["-"]]).unwrap();
        assert!(MissingValueDetector.detect(&table).is_empty());
    }

    #[test]
    fn test_low_severity_for_sparse_gaps() {
        let rows: Vec<Vec<String>> = (0..50)
            .map(|i| vec![if i == 7 { String::new() } else { format!("v{}", i) }])
            .collect();
        let table = Table::new(vec!["notes".to_string()], rows).unwrap();

        let issues = MissingValueDetector.detect(&table);
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_repeated_header_reported_once() {
        let table = Table::from_records(&["x", "x"], &[vec!["", ""], vec!["1", ""]]).unwrap();

        let issues = MissingValueDetector.detect(&table);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].count, 1);
    }
}
