//! Category rule engine
//!
//! Rules are tried in order and the first whose predicate holds decides the
//! category. Text that matches nothing is `other` at 0.5 confidence.

use casebrief_core::{Category, CategoryDraft, Result};
use tracing::debug;

use crate::config::{CategoryRuleSpec, CategoryRulesConfig, PredicateSpec};
use crate::text::{DocumentText, KeywordSet};

/// Confidence of the fallback classification
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Compiled keyword predicate
#[derive(Debug, Clone)]
pub enum Predicate {
    Any(KeywordSet),
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn compile(spec: &PredicateSpec) -> Result<Self> {
        match spec {
            PredicateSpec::Any { keywords } => Ok(Self::Any(KeywordSet::new(keywords)?)),
            PredicateSpec::All { of } => Ok(Self::All(
                of.iter().map(Self::compile).collect::<Result<Vec<_>>>()?,
            )),
        }
    }

    pub fn matches(&self, text: &DocumentText<'_>) -> bool {
        match self {
            Self::Any(keywords) => keywords.any(text),
            Self::All(predicates) => predicates.iter().all(|p| p.matches(text)),
        }
    }
}

/// One compiled category rule
#[derive(Debug, Clone)]
pub struct CategoryRule {
    category: Category,
    predicate: Predicate,
    confidence: f32,
    subcategory: Option<String>,
    refinements: Vec<(String, Predicate)>,
}

impl CategoryRule {
    pub fn compile(spec: &CategoryRuleSpec) -> Result<Self> {
        let refinements = spec
            .refinements
            .iter()
            .map(|r| Ok((r.label.clone(), Predicate::compile(&r.when)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            category: spec.category,
            predicate: Predicate::compile(&spec.when)?,
            confidence: spec.confidence,
            subcategory: spec.subcategory.clone(),
            refinements,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    fn subcategory_for(&self, text: &DocumentText<'_>) -> Option<String> {
        self.refinements
            .iter()
            .find(|(_, predicate)| predicate.matches(text))
            .map(|(label, _)| label.clone())
            .or_else(|| self.subcategory.clone())
    }
}

/// First-match-wins document classifier
#[derive(Debug, Clone)]
pub struct CategoryEngine {
    rules: Vec<CategoryRule>,
}

impl CategoryEngine {
    /// Engine with the built-in rule list
    pub fn new() -> Result<Self> {
        Self::from_config(&CategoryRulesConfig::default())
    }

    pub fn from_config(config: &CategoryRulesConfig) -> Result<Self> {
        let rules = config
            .rules
            .iter()
            .map(CategoryRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Categories in rule order
    pub fn rule_order(&self) -> Vec<Category> {
        self.rules.iter().map(CategoryRule::category).collect()
    }

    /// Classify the text; always returns exactly one draft
    pub fn classify(&self, text: &str) -> CategoryDraft {
        let text = DocumentText::new(text);

        let draft = match self.rules.iter().find(|rule| rule.predicate.matches(&text)) {
            Some(rule) => CategoryDraft::detected(
                rule.category,
                rule.subcategory_for(&text),
                rule.confidence,
            ),
            None => CategoryDraft::detected(Category::Other, None, FALLBACK_CONFIDENCE),
        };

        debug!(
            category = %draft.category,
            confidence = draft.confidence_score,
            "Document classified"
        );
        draft
    }
}

impl Default for CategoryEngine {
    fn default() -> Self {
        Self::new().expect("Failed to create default category engine")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebrief_core::Priority;

    fn classify(text: &str) -> CategoryDraft {
        CategoryEngine::new().unwrap().classify(text)
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            CategoryEngine::new().unwrap().rule_order(),
            vec![
                Category::Fir,
                Category::ChargeSheet,
                Category::WitnessStatement,
                Category::Contract,
                Category::CaseRecord,
                Category::AudioTranscript,
            ]
        );
    }

    #[test]
    fn test_empty_text_is_other() {
        let draft = classify("");
        assert_eq!(draft.category, Category::Other);
        assert_eq!(draft.confidence_score, 0.5);
        assert_eq!(draft.subcategory, None);
        assert_eq!(draft.suggested_workflow.priority, Priority::Medium);
        assert_eq!(
            draft.suggested_workflow.steps,
            vec!["Manual review", "Content analysis", "Classification needed"]
        );
        assert!(draft.auto_detected);
    }

    #[test]
    fn test_fir() {
        let draft = classify("FIR No. 123 filed at Police Station X");
        assert_eq!(draft.category, Category::Fir);
        assert_eq!(draft.subcategory.as_deref(), Some("Criminal"));
        assert_eq!(draft.confidence_score, 0.92);
        assert_eq!(draft.suggested_workflow.priority, Priority::High);
        assert_eq!(draft.suggested_workflow.estimated_time, "15-30 minutes");
        assert_eq!(draft.suggested_workflow.steps[0], "Extract incident details");
    }

    #[test]
    fn test_charge_sheet() {
        let draft = classify("Final report under Section 173 CrPC");
        assert_eq!(draft.category, Category::ChargeSheet);
        assert_eq!(draft.confidence_score, 0.88);
        assert_eq!(draft.subcategory, None);
    }

    #[test]
    fn test_witness_needs_both_terms() {
        assert_eq!(
            classify("Testimony of the witness").category,
            Category::WitnessStatement
        );
        // "witness" alone falls through to later rules
        assert_eq!(classify("The witness agreement").category, Category::Contract);
    }

    #[test]
    fn test_contract_subcategories() {
        let draft = classify("This Employment Agreement is made between...");
        assert_eq!(draft.category, Category::Contract);
        assert_eq!(draft.subcategory.as_deref(), Some("Employment"));
        assert_eq!(draft.confidence_score, 0.90);

        assert_eq!(
            classify("Rental contract").subcategory.as_deref(),
            Some("Lease")
        );
        assert_eq!(
            classify("Contract for the purchase of goods").subcategory.as_deref(),
            Some("Sale/Purchase")
        );
        // employment outranks lease
        assert_eq!(
            classify("Employment contract with a lease clause").subcategory.as_deref(),
            Some("Employment")
        );
        assert_eq!(classify("A plain contract").subcategory, None);
    }

    #[test]
    fn test_case_record_priority_is_medium() {
        let draft = classify("Case No. 55 of 2021, judgment delivered");
        assert_eq!(draft.category, Category::CaseRecord);
        assert_eq!(draft.confidence_score, 0.80);
        assert_eq!(draft.suggested_workflow.priority, Priority::Medium);
    }

    #[test]
    fn test_audio_transcript() {
        let draft = classify("[Audio Transcription] speaker one: hello");
        assert_eq!(draft.category, Category::AudioTranscript);
        assert_eq!(draft.confidence_score, 0.95);
    }

    #[test]
    fn test_earlier_rule_wins() {
        // contains both FIR and contract keywords
        let draft = classify("Police station copy of the agreement");
        assert_eq!(draft.category, Category::Fir);
    }
}
