//! CSV Doctor: deterministic diagnosis and repair of tabular data.
//!
//! The engine takes a parsed [`Table`], detects a fixed set of data-quality
//! issues (duplicate rows, missing values, mixed date formats, numeric
//! outliers, encoding problems), scores the table from 0 to 100 and applies
//! auto-fixes that return a new table.
//!
//! # Core Principles
//!
//! - **Deterministic**: the same table always yields the same issues, counts
//!   and score
//! - **Non-destructive**: fixes never modify their input table
//! - **Auditable**: every fix reports the cells and rows it changed
//!
//! # Example
//!
//! ```no_run
//! use csvdoctor::{Doctor, IssueKey};
//!
//! let doctor = Doctor::new();
//! let analysis = doctor.analyze_file("customers.csv").unwrap();
//! println!("Score: {}", analysis.report.stats.data_quality_score);
//!
//! let mut session = doctor.session(analysis.table);
//! session.fix(&IssueKey::duplicate_rows()).unwrap();
//! println!("Rows left: {}", session.current().row_count());
//! ```

pub mod detect;
pub mod error;
pub mod fix;
pub mod input;
pub mod issue;
pub mod score;

mod doctor;
mod session;
mod table;

pub use crate::doctor::{AnalysisReport, DataStats, Doctor, DoctorConfig, FileAnalysis};
pub use crate::session::{AppliedFix, Generation, ResolvedIssue, Session};
pub use crate::table::Table;
pub use error::{DoctorError, Result};
pub use fix::{FixChange, FixResult, RowAudit};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use issue::{ENTIRE_ROW, Issue, IssueKey, IssueType, Severity};
pub use score::{QualityGrade, score};

/// Detect issues in a table with every rule.
pub fn detect(table: &Table) -> Vec<Issue> {
    detect::DetectionEngine::new().detect(table)
}

/// Apply the fix for one issue, returning the new table.
pub fn apply_fix(table: &Table, issue: &Issue) -> Result<FixResult> {
    fix::FixEngine::new().apply_fix(table, issue)
}
