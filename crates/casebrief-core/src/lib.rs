//! casebrief core
//!
//! Core types, traits, and utilities shared across casebrief components.
//!
//! This crate provides:
//! - Risk flag and document category records, plus the drafts the rule
//!   engines produce
//! - Error types and result handling
//! - The [`RecordSink`] trait that persistence layers implement
//! - A derived [`RiskSummary`] view

pub mod error;
pub mod sink;
pub mod summary;
pub mod types;

pub use error::{Error, Result};
pub use sink::RecordSink;
pub use summary::RiskSummary;
pub use types::{
    Category, CategoryDraft, CategoryOverride, DocumentCategory, DocumentId, Priority, RiskFlag,
    RiskFlagDraft, RiskType, Severity, SuggestedWorkflow, DEFAULT_ESTIMATED_TIME,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::sink::RecordSink;
    pub use crate::summary::RiskSummary;
    pub use crate::types::{
        Category, CategoryDraft, CategoryOverride, DocumentCategory, DocumentId, RiskFlag,
        RiskFlagDraft, RiskType, Severity, SuggestedWorkflow,
    };
}
