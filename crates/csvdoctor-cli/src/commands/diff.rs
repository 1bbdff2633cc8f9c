//! Diff command - preview the changes fixes would make.

use std::path::PathBuf;

use colored::Colorize;
use csvdoctor::{DoctorConfig, IssueKey};

use super::{apply_fixes, open_session};

pub fn run(
    file: PathBuf,
    issues: Vec<IssueKey>,
    all: bool,
    config: DoctorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _source) = open_session(&file, config)?;
    apply_fixes(&mut session, &issues, all)?;

    let applied: Vec<_> = session
        .history()
        .iter()
        .filter_map(|generation| generation.fix.as_ref())
        .collect();

    if applied.iter().all(|fix| fix.change.row_audits.is_empty()) {
        println!("{}", "No changes to preview.".yellow());
        return Ok(());
    }

    for fix in applied {
        println!(
            "{} {} - {}",
            "@@".cyan(),
            fix.key.to_string().white().bold(),
            fix.change.description
        );

        for audit in &fix.change.row_audits {
            if audit.new_value.is_empty() && audit.column == csvdoctor::ENTIRE_ROW {
                println!(
                    "  row {:>5}  {}  ({})",
                    audit.row,
                    format!("- {}", audit.original_value).red(),
                    audit.reason.dimmed()
                );
            } else {
                println!(
                    "  row {:>5}  {}  {}",
                    audit.row,
                    format!("- {:?}", audit.original_value).red(),
                    format!("+ {:?}", audit.new_value).green()
                );
            }
        }
        println!();
    }

    println!(
        "Score {}% -> {}%. Run {} to write these changes.",
        session.history()[0].report.stats.data_quality_score,
        session.report().stats.data_quality_score,
        format!("csvdoctor fix {}", file.display()).cyan().bold()
    );

    Ok(())
}
