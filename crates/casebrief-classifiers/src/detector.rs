//! Detector trait

use casebrief_core::{Result, RiskFlagDraft};

use crate::text::DocumentText;

/// A single risk rule
///
/// Detectors are pure: the same text must always yield the same drafts.
/// An error only removes this detector's findings from a run.
pub trait Detector: Send + Sync {
    /// Stable detector name, used in logs
    fn name(&self) -> &str;

    /// Inspect the text and return zero or more findings
    fn detect(&self, text: &DocumentText<'_>) -> Result<Vec<RiskFlagDraft>>;
}
