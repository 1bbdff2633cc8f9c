//! Issue model and the fixed rules that classify issues.

pub mod rules;
mod types;

pub use rules::{SeverityMetric, UNKNOWN_PLACEHOLDER};
pub use types::{ENTIRE_ROW, Issue, IssueKey, IssueType, Severity};
