//! CLI argument definitions using clap.

use clap::{ArgAction, Parser, Subcommand};
use csvdoctor::IssueKey;
use std::path::PathBuf;

/// CSV Doctor: diagnose and fix data-quality issues in CSV files
#[derive(Parser)]
#[command(name = "csvdoctor")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Run detection rules one after another instead of in parallel
    #[arg(long, global = true)]
    pub sequential: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a data file and report issues
    Analyze {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply fixes and write the cleaned data
    Fix {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Issue to fix, as COLUMN:TYPE (repeatable)
        #[arg(long = "issue", value_name = "COLUMN:TYPE")]
        issues: Vec<IssueKey>,

        /// Fix every auto-fixable issue
        #[arg(long, conflicts_with = "issues")]
        all: bool,

        /// Output path (default: <file stem>_cleaned.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preview the changes fixes would make, without writing
    Diff {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Issue to preview, as COLUMN:TYPE (repeatable)
        #[arg(long = "issue", value_name = "COLUMN:TYPE")]
        issues: Vec<IssueKey>,

        /// Preview every auto-fixable issue
        #[arg(long, conflicts_with = "issues")]
        all: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use csvdoctor::IssueType;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue_keys() {
        let cli = Cli::try_parse_from([
            "csvdoctor",
            "fix",
            "data.csv",
            "--issue",
            "entire_row:duplicate",
            "--issue",
            "age:missing",
        ])
        .unwrap();

        match cli.command {
            Commands::Fix { issues, all, .. } => {
                assert!(!all);
                assert_eq!(
                    issues,
                    vec![
                        IssueKey::duplicate_rows(),
                        IssueKey::new("age", IssueType::Missing)
                    ]
                );
            }
            _ => panic!("expected fix command"),
        }
    }

    #[test]
    fn test_bad_issue_key_rejected() {
        assert!(Cli::try_parse_from(["csvdoctor", "diff", "d.csv", "--issue", "age"]).is_err());
        assert!(
            Cli::try_parse_from(["csvdoctor", "diff", "d.csv", "--issue", "age:typo"]).is_err()
        );
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["csvdoctor", "analyze", "d.csv", "-vv", "--sequential"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.sequential);

        assert!(Cli::try_parse_from(["csvdoctor", "-q", "-v", "analyze", "d.csv"]).is_err());
    }
}
