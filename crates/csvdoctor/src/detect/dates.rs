//! Date pattern classification and canonicalization.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// Strict shapes recognized by the format detector.
static ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static US_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").unwrap());
static EU_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").unwrap());

// Looser shapes the fixer accepts when rewriting to ISO.
static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})([-/.])(\d{1,2})([-/.])(\d{1,2})$").unwrap());
static YEAR_LAST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})([-/])(\d{1,2})([-/])(\d{4})$").unwrap());

/// Canonical output format.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Date pattern of a cell value.
///
/// Variant order is the tie-break order when two patterns are equally
/// common: recognized patterns win over `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatePattern {
    /// YYYY-MM-DD
    Iso,
    /// MM/DD/YYYY
    UsSlash,
    /// DD-MM-YYYY
    EuDash,
    /// Anything else, including impossible calendar dates.
    Unrecognized,
}

impl DatePattern {
    /// Human-readable pattern.
    pub fn description(&self) -> &'static str {
        match self {
            DatePattern::Iso => "YYYY-MM-DD",
            DatePattern::UsSlash => "MM/DD/YYYY",
            DatePattern::EuDash => "DD-MM-YYYY",
            DatePattern::Unrecognized => "unrecognized",
        }
    }

    /// Classify a (non-empty) cell value.
    pub fn classify(value: &str) -> DatePattern {
        let trimmed = value.trim();

        if let Some(c) = ISO.captures(trimmed) {
            if valid_date(&c[1], &c[2], &c[3]) {
                return DatePattern::Iso;
            }
        } else if let Some(c) = US_SLASH.captures(trimmed) {
            if valid_date(&c[3], &c[1], &c[2]) {
                return DatePattern::UsSlash;
            }
        } else if let Some(c) = EU_DASH.captures(trimmed) {
            if valid_date(&c[3], &c[2], &c[1]) {
                return DatePattern::EuDash;
            }
        }

        DatePattern::Unrecognized
    }
}

fn to_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn valid_date(year: &str, month: &str, day: &str) -> bool {
    to_date(year, month, day).is_some()
}

/// Parse a value under the recognized patterns, tolerating unpadded
/// components and `/` or `.` as year-first separators.
///
/// Year-last values use the separator to pick the field order: `/` means
/// month first, `-` means day first.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();

    if let Some(c) = YEAR_FIRST.captures(trimmed) {
        if c[2] != c[4] {
            return None;
        }
        return to_date(&c[1], &c[3], &c[5]);
    }

    if let Some(c) = YEAR_LAST.captures(trimmed) {
        return match (&c[2], &c[4]) {
            ("/", "/") => to_date(&c[5], &c[1], &c[3]),
            ("-", "-") => to_date(&c[5], &c[3], &c[1]),
            _ => None,
        };
    }

    None
}

/// Canonical `YYYY-MM-DD` form of a value, if it parses.
pub fn canonicalize(value: &str) -> Option<String> {
    parse_date(value).map(|d| d.format(CANONICAL_FORMAT).to_string())
}
