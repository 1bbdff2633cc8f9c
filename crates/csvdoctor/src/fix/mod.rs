//! Auto-fixes for detected issues.

mod engine;
mod operations;

pub use engine::FixEngine;
pub use operations::{FixChange, FixOperation, FixResult, RowAudit};
