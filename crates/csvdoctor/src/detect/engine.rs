//! Detector trait and the engine that runs every rule.

use rayon::prelude::*;
use tracing::debug;

use crate::issue::Issue;
use crate::table::Table;

use super::duplicate::DuplicateRowDetector;
use super::encoding::EncodingDetector;
use super::format::DateFormatDetector;
use super::missing::MissingValueDetector;
use super::outlier::OutlierDetector;

/// One detection rule.
pub trait Detector: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Scan the table and return the issues this rule finds, in column order.
    fn detect(&self, table: &Table) -> Vec<Issue>;
}

/// Runs the detection rules and concatenates their issues.
///
/// Issues come out rule by rule in a fixed order (duplicate, missing,
/// format, outlier, encoding), so two runs over the same table always
/// produce the same list, whether or not rules run in parallel.
pub struct DetectionEngine {
    detectors: Vec<Box<dyn Detector>>,
    parallel: bool,
}

impl DetectionEngine {
    /// Create an engine with every rule, running them in parallel.
    pub fn new() -> Self {
        Self {
            detectors: vec![
                Box::new(DuplicateRowDetector),
                Box::new(MissingValueDetector),
                Box::new(DateFormatDetector),
                Box::new(OutlierDetector),
                Box::new(EncodingDetector),
            ],
            parallel: true,
        }
    }

    /// Enable or disable parallel rule execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run all rules.
    pub fn detect(&self, table: &Table) -> Vec<Issue> {
        let per_rule: Vec<Vec<Issue>> = if self.parallel {
            self.detectors
                .par_iter()
                .map(|detector| run_detector(detector.as_ref(), table))
                .collect()
        } else {
            self.detectors
                .iter()
                .map(|detector| run_detector(detector.as_ref(), table))
                .collect()
        };

        per_rule.into_iter().flatten().collect()
    }
}

fn run_detector(detector: &dyn Detector, table: &Table) -> Vec<Issue> {
    let issues = detector.detect(table);
    debug!(
        detector = detector.name(),
        issues = issues.len(),
        "Detector finished"
    );
    issues
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
