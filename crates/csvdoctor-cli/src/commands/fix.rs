//! Fix command - apply fixes and write the cleaned file.

use std::path::{Path, PathBuf};

use colored::Colorize;
use csvdoctor::input::write_delimited;
use csvdoctor::{DoctorConfig, IssueKey};

use super::{apply_fixes, open_session};

pub fn run(
    file: PathBuf,
    issues: Vec<IssueKey>,
    all: bool,
    output: Option<PathBuf>,
    config: DoctorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, source) = open_session(&file, config)?;
    let score_before = session.report().stats.data_quality_score;

    let total = apply_fixes(&mut session, &issues, all)?;

    for (key, resolved) in session.resolved() {
        println!(
            "  {} {} ({} resolved)",
            "Fixed".green().bold(),
            key.to_string().white(),
            resolved.resolved_count
        );
    }

    let output_path = output.unwrap_or_else(|| default_output(&file));
    write_delimited(session.current(), &output_path, source.delimiter)?;

    let report = session.report();
    println!();
    println!(
        "{} {} values/rows; score {}% -> {}%",
        "Resolved".cyan().bold(),
        total.to_string().white().bold(),
        score_before,
        report.stats.data_quality_score.to_string().bold()
    );

    let remaining = session.issues().len();
    if remaining > 0 {
        println!(
            "{} issue(s) remain; run {} to review them",
            remaining.to_string().yellow(),
            format!("csvdoctor analyze {}", output_path.display())
                .cyan()
                .bold()
        );
    }

    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}

/// `<dir>/<stem>_cleaned.<ext>` next to the input file, keeping its
/// extension since the output uses the input's delimiter.
fn default_output(file: &Path) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let ext = file
        .extension()
        .map(|e| e.to_string_lossy())
        .unwrap_or("csv".into());
    file.with_file_name(format!("{}_cleaned.{}", stem, ext))
}
