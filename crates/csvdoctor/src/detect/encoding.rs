//! Detection of control characters and mis-decoded text.

use crate::issue::{Issue, IssueType, SeverityMetric, rules};
use crate::table::Table;

use super::charset;
use super::engine::Detector;

/// Counts cells containing characters outside printable ASCII and the
/// accented Latin letters.
pub struct EncodingDetector;

impl Detector for EncodingDetector {
    fn name(&self) -> &'static str {
        "encoding_detector"
    }

    fn detect(&self, table: &Table) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (col_idx, name) in table.distinct_columns() {
            let bad_rows: Vec<usize> = table
                .column_values(col_idx)
                .enumerate()
                .filter(|(_, value)| charset::has_disallowed(value))
                .map(|(row_idx, _)| row_idx)
                .collect();

            if bad_rows.is_empty() {
                continue;
            }

            let severity = rules::severity_for(SeverityMetric::Encoding);
            issues.push(
                Issue::new(name, IssueType::Encoding, severity, bad_rows.len())
                    .with_sample_rows(bad_rows),
            );
        }

        issues
    }
}
