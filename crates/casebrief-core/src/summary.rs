//! Aggregate view over a document's risk flags

use serde::{Deserialize, Serialize};

use crate::types::{RiskFlag, Severity};

/// Counts of active and resolved flags for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub total: usize,
    pub unresolved: usize,
    pub resolved: usize,

    /// Unresolved flags per severity
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,

    /// Most severe unresolved flag, if any
    pub highest_unresolved: Option<Severity>,
}

impl RiskSummary {
    pub fn from_flags(flags: &[RiskFlag]) -> Self {
        let mut summary = Self {
            total: flags.len(),
            ..Self::default()
        };

        for flag in flags {
            if flag.is_resolved {
                summary.resolved += 1;
                continue;
            }

            summary.unresolved += 1;
            match flag.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
            summary.highest_unresolved = summary.highest_unresolved.max(Some(flag.severity));
        }

        summary
    }

    /// True when no unresolved flag remains
    pub fn is_clear(&self) -> bool {
        self.unresolved == 0
    }
}
