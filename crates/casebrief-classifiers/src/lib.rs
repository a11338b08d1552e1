//! casebrief classifiers
//!
//! Deterministic rule engines for legal document text:
//! - Risk rule engine: independent detectors that flag missing sections,
//!   ambiguous dates, contradictory wording and vague language
//! - Category rule engine: ordered first-match-wins rules that pick a
//!   document type, subcategory and review workflow
//!
//! Both engines are pure and synchronous. They never fail on input and can
//! be shared across threads.

pub mod category;
pub mod config;
pub mod detector;
pub mod engines;
pub mod risk;
pub mod text;

use casebrief_core::{CategoryDraft, RiskFlagDraft};
use std::sync::OnceLock;

pub use category::{CategoryEngine, CategoryRule, Predicate, FALLBACK_CONFIDENCE};
pub use config::{
    CategoryRuleSpec, CategoryRulesConfig, ContradictionSpec, PredicateSpec, RiskRulesConfig,
    RulesConfig, SubcategorySpec,
};
pub use detector::Detector;
pub use engines::{RuleEngines, TextAnalysis};
pub use risk::{
    AmbiguousDateDetector, ContradictionDetector, MissingSectionDetector, RiskEngine,
    VagueLanguageDetector,
};
pub use text::{DocumentText, KeywordSet};

static DEFAULT_RISK_ENGINE: OnceLock<RiskEngine> = OnceLock::new();
static DEFAULT_CATEGORY_ENGINE: OnceLock<CategoryEngine> = OnceLock::new();

/// Run the built-in detectors over `text`
pub fn detect_risks(text: &str) -> Vec<RiskFlagDraft> {
    DEFAULT_RISK_ENGINE
        .get_or_init(RiskEngine::default)
        .detect_risks(text)
}

/// Classify `text` with the built-in category rules
pub fn classify(text: &str) -> CategoryDraft {
    DEFAULT_CATEGORY_ENGINE
        .get_or_init(CategoryEngine::default)
        .classify(text)
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::category::CategoryEngine;
    pub use crate::config::RulesConfig;
    pub use crate::detector::Detector;
    pub use crate::engines::{RuleEngines, TextAnalysis};
    pub use crate::risk::RiskEngine;
    pub use crate::text::DocumentText;
    pub use crate::{classify, detect_risks};
}
