//! Fix session: a sequence of table generations with resolution tracking.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::doctor::{AnalysisReport, Doctor, DoctorConfig};
use crate::error::{DoctorError, Result};
use crate::fix::FixChange;
use crate::issue::{Issue, IssueKey};
use crate::table::Table;

/// An issue that a fix has been applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIssue {
    /// The issue as it was reported when first fixed.
    pub issue: Issue,
    /// Rows removed or cells rewritten, summed over every fix of this key.
    pub resolved_count: usize,
    /// Generation produced by the latest fix of this key.
    pub generation: usize,
}

/// The fix that produced a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFix {
    /// Issue the fix was applied to.
    pub key: IssueKey,
    /// What the fix changed.
    pub change: FixChange,
}

/// One table state in a session.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The table at this generation.
    pub table: Table,
    /// Analysis of that table.
    pub report: AnalysisReport,
    /// Fix that produced it; `None` for the original table.
    pub fix: Option<AppliedFix>,
}

/// Working state for fixing one table.
///
/// Every fix produces a new generation; earlier generations are kept as
/// they were, so the original and fixed tables can always be compared.
/// Taking `&mut self` for fixes serializes them.
pub struct Session {
    doctor: Doctor,
    generations: Vec<Generation>,
    resolved: IndexMap<IssueKey, ResolvedIssue>,
}

impl Session {
    /// Start a session; the table is analyzed as generation 0.
    pub fn new(table: Table, config: DoctorConfig) -> Self {
        let doctor = Doctor::with_config(config);
        let report = doctor.analyze(&table);

        Self {
            doctor,
            generations: vec![Generation {
                table,
                report,
                fix: None,
            }],
            resolved: IndexMap::new(),
        }
    }

    fn latest(&self) -> &Generation {
        // A session always holds generation 0.
        &self.generations[self.generations.len() - 1]
    }

    /// The table the session started from.
    pub fn original(&self) -> &Table {
        &self.generations[0].table
    }

    /// The table after every fix applied so far.
    pub fn current(&self) -> &Table {
        &self.latest().table
    }

    /// Analysis of the current table.
    pub fn report(&self) -> &AnalysisReport {
        &self.latest().report
    }

    /// Active issues of the current table.
    pub fn issues(&self) -> &[Issue] {
        &self.report().issues
    }

    /// Index of the current generation.
    pub fn generation(&self) -> usize {
        self.generations.len() - 1
    }

    /// Issues that fixes have been applied to, in the order first fixed.
    pub fn resolved(&self) -> &IndexMap<IssueKey, ResolvedIssue> {
        &self.resolved
    }

    /// Whether a fix has been applied for a key.
    pub fn is_resolved(&self, key: &IssueKey) -> bool {
        self.resolved.contains_key(key)
    }

    /// Every generation, oldest first.
    pub fn history(&self) -> &[Generation] {
        &self.generations
    }

    /// Apply the fix for one active issue and return its resolved count.
    ///
    /// Fixing a key that was already resolved and is no longer active is a
    /// no-op returning 0. A key that was never active fails with
    /// [`DoctorError::UnsupportedFix`]. On error the session is unchanged.
    pub fn fix(&mut self, key: &IssueKey) -> Result<usize> {
        let Some(issue) = self.report().issue(key).cloned() else {
            if self.is_resolved(key) {
                debug!(issue = %key, "Issue already resolved");
                return Ok(0);
            }
            return Err(DoctorError::unsupported(format!(
                "no active issue '{}'",
                key
            )));
        };

        let result = self.doctor.apply_fix(self.current(), &issue)?;
        let report = self.doctor.analyze(&result.table);
        let generation = self.generations.len();
        let resolved_count = result.resolved_count;

        self.generations.push(Generation {
            table: result.table,
            report,
            fix: Some(AppliedFix {
                key: key.clone(),
                change: result.change,
            }),
        });

        self.resolved
            .entry(key.clone())
            .and_modify(|r| {
                r.resolved_count += resolved_count;
                r.generation = generation;
            })
            .or_insert(ResolvedIssue {
                issue,
                resolved_count,
                generation,
            });

        info!(
            issue = %key,
            resolved = resolved_count,
            generation,
            score = self.report().stats.data_quality_score,
            "Fix applied"
        );

        Ok(resolved_count)
    }

    /// Apply every auto-fixable issue of the current report once, in report
    /// order, re-analyzing between fixes. Issues that an earlier fix already
    /// made disappear are skipped. Returns the total resolved count.
    pub fn fix_all(&mut self) -> Result<usize> {
        let keys: Vec<IssueKey> = self.report().auto_fixable().map(Issue::key).collect();

        let mut total = 0;
        for key in keys {
            if self.report().issue(&key).is_none() {
                debug!(issue = %key, "Skipping issue no longer present");
                continue;
            }
            total += self.fix(&key)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueType;

    fn sample() -> Table {
        Table::from_records(
            &["id", "name", "age", "email", "signup_date"],
            &[
                vec!["1", "Alice Johnson", "25", "alice@email.com", "2023-01-15"],
                vec!["2", "Bob Smith", "32", "bob@email.com", "2023-01-16"],
                vec!["3", "Charlie Brown", "", "charlie@email.com", "2023/01/17"],
                vec!["1", "Alice Johnson", "25", "alice@email.com", "2023-01-15"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fix_advances_generation() {
        let mut session = Session::new(sample(), DoctorConfig::default());
        assert_eq!(session.generation(), 0);
        assert_eq!(session.report().stats.data_quality_score, 75);

        let removed = session.fix(&IssueKey::duplicate_rows()).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(session.generation(), 1);
        assert_eq!(session.current().row_count(), 3);
        assert_eq!(session.original().row_count(), 4);
        assert!(session.report().issue(&IssueKey::duplicate_rows()).is_none());
        assert!(session.report().stats.data_quality_score > 75);

        let resolved = &session.resolved()[&IssueKey::duplicate_rows()];
        assert_eq!(resolved.resolved_count, 1);
        assert_eq!(resolved.generation, 1);
    }

    #[test]
    fn test_refix_is_noop() {
        let mut session = Session::new(sample(), DoctorConfig::default());
        let key = IssueKey::new("age", IssueType::Missing);

        assert_eq!(session.fix(&key).unwrap(), 1);
        assert_eq!(session.fix(&key).unwrap(), 0);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_unknown_key_leaves_session_unchanged() {
        let mut session = Session::new(sample(), DoctorConfig::default());
        let err = session
            .fix(&IssueKey::new("email", IssueType::Missing))
            .unwrap_err();

        assert!(matches!(err, DoctorError::UnsupportedFix(_)));
        assert_eq!(session.generation(), 0);
        assert!(session.resolved().is_empty());
    }

    #[test]
    fn test_fix_all() {
        let mut session = Session::new(sample(), DoctorConfig::default());
        assert_eq!(session.issues().len(), 3);
        let total = session.fix_all().unwrap();

        assert_eq!(total, 3);
        assert!(session.issues().is_empty());
        assert!(session.report().is_clean());
        assert_eq!(session.report().stats.data_quality_score, 100);
        assert_eq!(session.history().len(), 4);
        assert_eq!(
            session.resolved().keys().cloned().collect::<Vec<_>>(),
            vec![
                IssueKey::duplicate_rows(),
                IssueKey::new("age", IssueType::Missing),
                IssueKey::new("signup_date", IssueType::Format),
            ]
        );
        assert_eq!(session.current().get(2, 4), Some("2023-01-17"));
        assert_eq!(session.current().get(2, 2), Some("28.5"));
    }

    #[test]
    fn test_history_records_changes() {
        let mut session = Session::new(sample(), DoctorConfig::default());
        session.fix_all().unwrap();

        let history = session.history();
        assert!(history[0].fix.is_none());
        let first = history[1].fix.as_ref().unwrap();
        assert_eq!(first.key, IssueKey::duplicate_rows());
        assert_eq!(first.change.row_audits.len(), 1);
        assert_eq!(history[0].table, sample());
    }
}
