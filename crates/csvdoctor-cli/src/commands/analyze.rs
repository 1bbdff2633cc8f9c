//! Analyze command - report issues, score and suggested fixes.

use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use csvdoctor::{Doctor, DoctorConfig, QualityGrade, Severity, Table};

/// Rows shown in the verbose data preview.
const PREVIEW_ROWS: usize = 10;

pub fn run(
    file: PathBuf,
    json: bool,
    config: DoctorConfig,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let doctor = Doctor::with_config(config);
    let analysis = doctor.analyze_file(&file)?;
    let report = &analysis.report;

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Analyzed".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "  {} rows, {} columns ({}, {})",
        report.stats.total_rows.to_string().white().bold(),
        report.stats.total_columns.to_string().white().bold(),
        analysis.source.format,
        analysis.source.encoding
    );

    if verbose {
        println!("  {}", analysis.source.hash.dimmed());
        println!();
        let mut lines = preview_lines(&analysis.table, PREVIEW_ROWS).into_iter();
        if let Some(header) = lines.next() {
            println!("  {}", header.bold());
        }
        for line in lines {
            println!("  {}", line);
        }
        if analysis.table.row_count() > PREVIEW_ROWS {
            println!(
                "  {}",
                format!("... {} more rows", analysis.table.row_count() - PREVIEW_ROWS).dimmed()
            );
        }
    }

    for name in &report.duplicate_headers {
        println!(
            "  {} column name '{}' appears more than once; only the first is checked",
            "Note:".yellow().bold(),
            name
        );
    }

    println!();
    println!(
        "Data quality score: {} ({})",
        format!("{}%", report.stats.data_quality_score).bold(),
        grade_label(report.grade)
    );
    println!(
        "Found {} issues ({} high, {} medium, {} low)",
        report.issues.len().to_string().white().bold(),
        report.count_by_severity(Severity::High).to_string().red(),
        report.count_by_severity(Severity::Medium).to_string().yellow(),
        report.count_by_severity(Severity::Low).to_string().blue()
    );

    if report.is_clean() {
        println!();
        println!("{}", "No issues found - data looks clean!".green());
        return Ok(());
    }

    println!();
    for issue in &report.issues {
        println!(
            "  {} {} {}",
            severity_label(issue.severity),
            issue.key().to_string().white().bold(),
            issue.description
        );

        let fix = if issue.auto_fixable {
            issue.fix_suggestion().green()
        } else {
            issue.fix_suggestion().dimmed()
        };
        println!("      {}", fix);

        if verbose && !issue.sample_rows.is_empty() {
            let rows: Vec<String> = issue.sample_rows.iter().map(|r| r.to_string()).collect();
            println!("      rows: {}", rows.join(", ").dimmed());
        }
    }

    println!();
    println!("{}", report.recommendation);

    if report.auto_fixable().next().is_some() {
        println!(
            "Run {} to apply all auto-fixes",
            format!("csvdoctor fix {} --all", file.display())
                .cyan()
                .bold()
        );
    }

    Ok(())
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity.label().to_uppercase());
    match severity {
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.blue(),
    }
}

fn grade_label(grade: QualityGrade) -> ColoredString {
    match grade {
        QualityGrade::Good => grade.label().green(),
        QualityGrade::Fair => grade.label().yellow(),
        QualityGrade::Poor => grade.label().red(),
    }
}

/// Header line followed by the first `limit` rows, cells separated by ` | `.
/// Blank cells are shown as `<blank>` so gaps are visible.
fn preview_lines(table: &Table, limit: usize) -> Vec<String> {
    let mut lines = vec![table.headers().join(" | ")];
    lines.extend(table.rows().iter().take(limit).map(|row| {
        row.iter()
            .map(|cell| if Table::is_blank(cell) { "<blank>" } else { cell.as_str() })
            .collect::<Vec<_>>()
            .join(" | ")
    }));
    lines
}
