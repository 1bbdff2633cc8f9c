//! CLI command implementations.

pub mod analyze;
pub mod diff;
pub mod fix;

use std::path::Path;

use csvdoctor::{Doctor, DoctorConfig, IssueKey, Session, SourceMetadata};

/// Load a file and open a fix session on it.
pub(crate) fn open_session(
    file: &Path,
    config: DoctorConfig,
) -> Result<(Session, SourceMetadata), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let doctor = Doctor::with_config(config);
    let (table, source) = doctor.load(file)?;
    Ok((doctor.session(table), source))
}

/// Apply the requested fixes to a session.
pub(crate) fn apply_fixes(
    session: &mut Session,
    issues: &[IssueKey],
    all: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    if all {
        return Ok(session.fix_all()?);
    }
    if issues.is_empty() {
        return Err("Nothing to fix: pass --issue COLUMN:TYPE or --all".into());
    }

    let mut total = 0;
    for key in issues {
        total += session.fix(key)?;
    }
    Ok(total)
}
