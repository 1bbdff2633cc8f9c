//! Numeric outlier detection (3-sigma rule).

use crate::issue::{Issue, IssueType, SeverityMetric, rules};
use crate::table::Table;

use super::engine::Detector;
use super::stats;

/// Distance from the mean, in sample standard deviations, beyond which a
/// value is an outlier.
pub const SIGMA_THRESHOLD: f64 = 3.0;

/// Flags values more than three standard deviations from the column mean.
///
/// A column qualifies only if every non-empty cell is a finite number and
/// there are at least two of them. Outliers are reported, never fixed.
pub struct OutlierDetector;

/// Parsed values of a fully numeric column with their row indices.
fn numeric_column(table: &Table, col_idx: usize) -> Option<Vec<(usize, f64)>> {
    let mut values = Vec::new();
    for (row_idx, value) in table.column_values(col_idx).enumerate() {
        if Table::is_blank(value) {
            continue;
        }
        values.push((row_idx, stats::parse_number(value)?));
    }
    (values.len() >= 2).then_some(values)
}

impl Detector for OutlierDetector {
    fn name(&self) -> &'static str {
        "outlier_detector"
    }

    fn detect(&self, table: &Table) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (col_idx, name) in table.distinct_columns() {
            let Some(values) = numeric_column(table, col_idx) else {
                continue;
            };

            let numbers: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
            let (Some(mean), Some(std_dev)) =
                (stats::mean(&numbers), stats::sample_std_dev(&numbers))
            else {
                continue;
            };
            if std_dev == 0.0 || !std_dev.is_finite() {
                continue;
            }

            let outlier_rows: Vec<usize> = values
                .iter()
                .filter(|(_, v)| (v - mean).abs() > SIGMA_THRESHOLD * std_dev)
                .map(|(row_idx, _)| *row_idx)
                .collect();

            if outlier_rows.is_empty() {
                continue;
            }

            let severity = rules::severity_for(SeverityMetric::Outlier);
            issues.push(
                Issue::new(name, IssueType::Outlier, severity, outlier_rows.len())
                    .with_sample_rows(outlier_rows),
            );
        }

        issues
    }
}
