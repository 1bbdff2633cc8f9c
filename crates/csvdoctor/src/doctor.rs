//! The main analysis entry point.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detect::DetectionEngine;
use crate::error::Result;
use crate::fix::{FixEngine, FixResult};
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::issue::{Issue, IssueKey, Severity};
use crate::score::{self, QualityGrade};
use crate::session::Session;
use crate::table::Table;

/// Configuration for CSV Doctor.
#[derive(Debug, Clone)]
pub struct DoctorConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Run detection rules in parallel.
    pub parallel: bool,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            parallel: true,
        }
    }
}

/// Summary numbers for one table generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStats {
    /// Number of data rows.
    pub total_rows: usize,
    /// Number of columns.
    pub total_columns: usize,
    /// Number of active issues.
    pub issues_found: usize,
    /// Quality score (0-100).
    pub data_quality_score: u8,
}

impl DataStats {
    /// Compute stats for a table and its issues.
    pub fn compute(table: &Table, issues: &[Issue]) -> Self {
        Self {
            total_rows: table.row_count(),
            total_columns: table.column_count(),
            issues_found: issues.len(),
            data_quality_score: score::score(table, issues),
        }
    }
}

/// Result of analyzing one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Issues in detection order.
    pub issues: Vec<Issue>,
    /// Summary statistics.
    pub stats: DataStats,
    /// Score band.
    pub grade: QualityGrade,
    /// Header names that occur more than once.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_headers: Vec<String>,
    /// Human-readable recommendation.
    pub recommendation: String,
}

impl AnalysisReport {
    /// Build a report from detected issues.
    pub fn new(table: &Table, issues: Vec<Issue>) -> Self {
        let stats = DataStats::compute(table, &issues);
        Self {
            grade: QualityGrade::from_score(stats.data_quality_score),
            recommendation: score::recommendation(&issues, stats.data_quality_score),
            duplicate_headers: table.duplicate_headers(),
            issues,
            stats,
        }
    }

    /// Look up an active issue by key.
    pub fn issue(&self, key: &IssueKey) -> Option<&Issue> {
        self.issues
            .iter()
            .find(|i| i.column == key.column && i.issue_type == key.issue_type)
    }

    /// Issues the fixer can resolve, in report order.
    pub fn auto_fixable(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.auto_fixable)
    }

    /// Number of issues at a severity.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Whether the table has no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A loaded file together with its analysis.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The loaded table.
    pub table: Table,
    /// Analysis of the table.
    pub report: AnalysisReport,
}

/// The CSV Doctor engine: loader, detection rules and fixer.
pub struct Doctor {
    config: DoctorConfig,
    parser: Parser,
    detection: DetectionEngine,
    fixer: FixEngine,
}

impl Doctor {
    /// Create a new instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(DoctorConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: DoctorConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser.clone()),
            detection: DetectionEngine::new().with_parallel(config.parallel),
            fixer: FixEngine::new(),
            config,
        }
    }

    /// Detect issues in a table.
    pub fn detect(&self, table: &Table) -> Vec<Issue> {
        self.detection.detect(table)
    }

    /// Analyze a table.
    pub fn analyze(&self, table: &Table) -> AnalysisReport {
        let report = AnalysisReport::new(table, self.detect(table));

        info!(
            rows = report.stats.total_rows,
            columns = report.stats.total_columns,
            issues = report.stats.issues_found,
            score = report.stats.data_quality_score,
            "Analysis complete"
        );

        report
    }

    /// Load a file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Load and analyze a file.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<FileAnalysis> {
        let (table, source) = self.load(path)?;
        let report = self.analyze(&table);
        Ok(FileAnalysis {
            source,
            table,
            report,
        })
    }

    /// Apply the fix for one issue.
    pub fn apply_fix(&self, table: &Table, issue: &Issue) -> Result<FixResult> {
        self.fixer.apply_fix(table, issue)
    }

    /// Start a fix session on a table with this instance's configuration.
    pub fn session(&self, table: Table) -> Session {
        Session::new(table, self.config.clone())
    }
}

impl Default for Doctor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_analyze_file() {
        let file = create_test_file(
            "id,name,age,email,signup_date\n\
             1,Alice Johnson,25,alice@email.com,2023-01-15\n\
             2,Bob Smith,32,bob@email.com,2023-01-16\n\
             3,Charlie Brown,,charlie@email.com,2023/01/17\n\
             1,Alice Johnson,25,alice@email.com,2023-01-15\n",
        );

        let analysis = Doctor::new().analyze_file(file.path()).unwrap();
        assert_eq!(analysis.source.format, "csv");
        assert!(analysis.source.hash.starts_with("sha256:"));

        let report = analysis.report;
        assert_eq!(report.stats.total_rows, 4);
        assert_eq!(report.stats.total_columns, 5);
        assert_eq!(report.stats.issues_found, 3);
        assert_eq!(report.stats.data_quality_score, 75);
        assert_eq!(report.grade, QualityGrade::Fair);
        assert_eq!(report.count_by_severity(Severity::High), 2);

        assert!(report.issue(&IssueKey::duplicate_rows()).is_some());
        assert!(report.issue(&IssueKey::new("age", IssueType::Missing)).is_some());
        assert!(report.issue(&IssueKey::new("signup_date", IssueType::Format)).is_some());
    }

    #[test]
    fn test_duplicate_headers_reported() {
        let table = Table::from_records(&["id", "id"], &[vec!["1", "2"]]).unwrap();
        let report = Doctor::new().analyze(&table);
        assert_eq!(report.duplicate_headers, vec!["id"]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_report_wire_format() {
        let table = Table::from_records(&["name"], &[vec!["a"], vec![""]]).unwrap();
        let report = Doctor::new().analyze(&table);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["stats"]["totalRows"], 2);
        assert_eq!(json["stats"]["issuesFound"], 1);
        assert_eq!(json["issues"][0]["type"], "missing");
        assert_eq!(json["issues"][0]["autoFixable"], true);
        assert_eq!(json["grade"], "good");
        assert_eq!(json["stats"]["dataQualityScore"], 80);
        assert!(json.get("duplicateHeaders").is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = Doctor::new()
            .analyze_file("/nonexistent/data.csv")
            .unwrap_err();
        assert!(matches!(err, crate::error::DoctorError::Io { .. }));
    }
}
