//! Exact duplicate row detection.

use indexmap::IndexMap;

use crate::issue::{ENTIRE_ROW, Issue, IssueType, SeverityMetric, rules};
use crate::table::Table;

use super::engine::Detector;

/// Groups rows that are identical in every column.
///
/// Comparison is exact: no trimming or case folding. The first row of each
/// group is canonical; the rest are duplicates.
pub struct DuplicateRowDetector;

/// Row groups with identical content, each in ascending row order.
/// Only groups with more than one row are returned, ordered by their
/// canonical row.
pub(crate) fn duplicate_groups(table: &Table) -> Vec<Vec<usize>> {
    if table.column_count() == 0 {
        return Vec::new();
    }

    let mut groups: IndexMap<&[String], Vec<usize>> = IndexMap::with_capacity(table.row_count());
    for (row_idx, row) in table.rows().iter().enumerate() {
        groups.entry(row.as_slice()).or_default().push(row_idx);
    }

    groups.into_values().filter(|rows| rows.len() > 1).collect()
}

/// Non-canonical rows of every duplicate group, in ascending order.
pub(crate) fn redundant_rows(table: &Table) -> Vec<usize> {
    let mut rows: Vec<usize> = duplicate_groups(table)
        .into_iter()
        .flat_map(|group| group.into_iter().skip(1))
        .collect();
    rows.sort_unstable();
    rows
}

impl Detector for DuplicateRowDetector {
    fn name(&self) -> &'static str {
        "duplicate_row_detector"
    }

    fn detect(&self, table: &Table) -> Vec<Issue> {
        let redundant = redundant_rows(table);
        if redundant.is_empty() {
            return Vec::new();
        }

        let count = redundant.len();
        let severity = rules::severity_for(SeverityMetric::Duplicate {
            duplicates: count,
            total_rows: table.row_count(),
        });

        vec![Issue::new(ENTIRE_ROW, IssueType::Duplicate, severity, count).with_sample_rows(redundant)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> Table {
        Table::from_records(&headers, &rows).unwrap()
    }

    #[test]
    fn test_detects_first_and_last_row_duplicate() {
        let table = make_table(
            vec!["id", "name"],
            vec![
                vec!["1", "Alice"],
                vec!["2", "Bob"],
                vec!["3", "Carol"],
                vec!["1", "Alice"],
            ],
        );

        let issues = DuplicateRowDetector.detect(&table);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column, ENTIRE_ROW);
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].sample_rows, vec![3]);
    }

    #[test]
    fn test_comparison_is_exact() {
        let table = make_table(
            vec!["name"],
            vec![vec!["alice"], vec!["Alice"], vec!["alice "]],
        );
        assert!(DuplicateRowDetector.detect(&table).is_empty());
    }

    #[test]
    fn test_counts_across_groups() {
        let table = make_table(
            vec!["v"],
            vec![vec!["a"], vec!["b"], vec!["a"], vec!["a"], vec!["b"], vec!["c"]],
        );

        assert_eq!(duplicate_groups(&table), vec![vec![0, 2, 3], vec![1, 4]]);
        assert_eq!(redundant_rows(&table), vec![2, 3, 4]);

        let issues = DuplicateRowDetector.detect(&table);
        assert_eq!(issues[0].count, 3);
    }

    #[test]
    fn test_medium_below_five_percent() {
        let mut rows: Vec<Vec<String>> = (0..40).map(|i| vec![i.to_string()]).collect();
        rows.push(vec!["0".to_string()]);
        let table = Table::new(vec!["n".to_string()], rows).unwrap();

        let issues = DuplicateRowDetector.detect(&table);
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_no_columns_no_duplicates() {
        let table = Table::new(Vec::new(), vec![Vec::new(), Vec::new()]).unwrap();
        assert!(DuplicateRowDetector.detect(&table).is_empty());
    }
}
