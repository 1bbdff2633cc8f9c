//! Issue detection rules.
//!
//! Each rule is a [`Detector`]; the [`DetectionEngine`] runs all of them in
//! a fixed order and concatenates their issues.

pub(crate) mod charset;
pub(crate) mod dates;
mod duplicate;
mod encoding;
mod engine;
mod format;
mod missing;
mod outlier;
pub(crate) mod stats;

pub use duplicate::DuplicateRowDetector;
pub use encoding::EncodingDetector;
pub use engine::{DetectionEngine, Detector};
pub use format::DateFormatDetector;
pub use missing::MissingValueDetector;
pub use outlier::{OutlierDetector, SIGMA_THRESHOLD};

pub(crate) use duplicate::duplicate_groups;
