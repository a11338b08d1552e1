//! Risk rule engine
//!
//! Four built-in detectors run in a fixed order and their findings are
//! concatenated in that order:
//! 1. missing required sections
//! 2. ambiguous date formats
//! 3. contradictory word pairs
//! 4. vague language
//!
//! Suggestions are constant per detector, except that the missing-section
//! detector leads with the list of sections to add.

use casebrief_core::{Error, Result, RiskFlagDraft, RiskType, Severity};
use regex::Regex;
use tracing::{debug, warn};

use crate::config::RiskRulesConfig;
use crate::detector::Detector;
use crate::text::{DocumentText, KeywordSet};

const MISSING_SECTION_EXPLANATION: &str =
    "Legal documents should contain all mandatory sections for completeness and evidentiary value.";
const MISSING_SECTION_SUGGESTIONS: [&str; 2] = [
    "Ensure each section contains relevant and complete information",
    "Cross-reference with standard legal document templates",
];

const AMBIGUOUS_DATE_EXPLANATION: &str =
    "Date formats like DD/MM/YYYY vs MM/DD/YYYY can cause confusion and legal disputes.";
const AMBIGUOUS_DATE_SUGGESTIONS: [&str; 3] = [
    "Use ISO format (YYYY-MM-DD) for clarity",
    "Spell out month names (e.g., 15 January 2024)",
    "Ensure consistency throughout the document",
];

const CONTRADICTION_EXPLANATION: &str =
    "Contradictory statements can undermine the credibility of the document.";
const CONTRADICTION_SUGGESTIONS: [&str; 3] = [
    "Review context of each usage",
    "Ensure timeline consistency",
    "Clarify any apparent contradictions with additional context",
];

const VAGUE_LANGUAGE_EXPLANATION: &str = "Legal documents should be precise and definitive. \
     Vague language can create interpretation issues.";
const VAGUE_LANGUAGE_SUGGESTIONS: [&str; 3] = [
    "Replace approximate terms with specific values",
    "Use definitive language where possible",
    "Qualify uncertain statements with context",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Flags documents that never mention a required section keyword
pub struct MissingSectionDetector {
    sections: KeywordSet,
}

impl MissingSectionDetector {
    pub fn new<I, S>(sections: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            sections: KeywordSet::new(sections)?,
        })
    }
}

impl Detector for MissingSectionDetector {
    fn name(&self) -> &str {
        "missing_section"
    }

    fn detect(&self, text: &DocumentText<'_>) -> Result<Vec<RiskFlagDraft>> {
        let missing = self.sections.missing(text);
        if missing.is_empty() {
            return Ok(Vec::new());
        }

        let listed = missing.join(", ");
        let mut suggestions = vec![format!("Add the following sections: {}", listed)];
        suggestions.extend(owned(&MISSING_SECTION_SUGGESTIONS));

        Ok(vec![RiskFlagDraft {
            risk_type: RiskType::MissingSection,
            severity: Severity::High,
            description: format!("Missing required sections: {}", listed),
            affected_text: "Document structure".to_string(),
            explanation: MISSING_SECTION_EXPLANATION.to_string(),
            suggestions,
        }])
    }
}

/// Flags dates whose first two components both exceed 12
///
/// Only dates where neither leading component can be a month are reported.
/// `05/25/2024` and `25/05/2024` pass; `15/25/2024` is flagged.
pub struct AmbiguousDateDetector {
    pattern: Regex,
}

impl AmbiguousDateDetector {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::config(format!("Failed to compile date pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    fn is_ambiguous(date: &str) -> bool {
        let mut parts = date.split(|c: char| c == '/' || c == '-');
        let first = parts.next().and_then(|p| p.parse::<u32>().ok());
        let second = parts.next().and_then(|p| p.parse::<u32>().ok());
        matches!((first, second), (Some(a), Some(b)) if a > 12 && b > 12)
    }
}

impl Detector for AmbiguousDateDetector {
    fn name(&self) -> &str {
        "ambiguous_date"
    }

    fn detect(&self, text: &DocumentText<'_>) -> Result<Vec<RiskFlagDraft>> {
        let ambiguous: Vec<&str> = self
            .pattern
            .find_iter(text.raw())
            .map(|m| m.as_str())
            .filter(|date| Self::is_ambiguous(date))
            .collect();

        if ambiguous.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![RiskFlagDraft {
            risk_type: RiskType::Ambiguity,
            severity: Severity::Medium,
            description: "Ambiguous date formats detected".to_string(),
            affected_text: ambiguous.join(", "),
            explanation: AMBIGUOUS_DATE_EXPLANATION.to_string(),
            suggestions: owned(&AMBIGUOUS_DATE_SUGGESTIONS),
        }])
    }
}

struct ContradictionEntry {
    words: KeywordSet,
    severity: Severity,
}

/// Flags each word group whose members all appear in the text
pub struct ContradictionDetector {
    entries: Vec<ContradictionEntry>,
}

impl ContradictionDetector {
    pub fn new(table: &[(Vec<String>, Severity)]) -> Result<Self> {
        let entries = table
            .iter()
            .map(|(words, severity)| {
                Ok(ContradictionEntry {
                    words: KeywordSet::new(words)?,
                    severity: *severity,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }
}

impl Detector for ContradictionDetector {
    fn name(&self) -> &str {
        "contradiction"
    }

    fn detect(&self, text: &DocumentText<'_>) -> Result<Vec<RiskFlagDraft>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.words.all(text))
            .map(|entry| {
                let words = entry.words.keywords();
                RiskFlagDraft {
                    risk_type: RiskType::Contradiction,
                    severity: entry.severity,
                    description: format!(
                        "Potential contradiction with terms: {}",
                        words.join(" and ")
                    ),
                    affected_text: format!("References to: {}", words.join(", ")),
                    explanation: CONTRADICTION_EXPLANATION.to_string(),
                    suggestions: owned(&CONTRADICTION_SUGGESTIONS),
                }
            })
            .collect())
    }
}

/// Flags text that uses too many distinct hedging terms
pub struct VagueLanguageDetector {
    terms: KeywordSet,
    threshold: usize,
}

impl VagueLanguageDetector {
    pub fn new<I, S>(terms: I, threshold: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            terms: KeywordSet::new(terms)?,
            threshold,
        })
    }
}

impl Detector for VagueLanguageDetector {
    fn name(&self) -> &str {
        "vague_language"
    }

    fn detect(&self, text: &DocumentText<'_>) -> Result<Vec<RiskFlagDraft>> {
        let found = self.terms.found(text);
        if found.len() < self.threshold {
            return Ok(Vec::new());
        }

        Ok(vec![RiskFlagDraft {
            risk_type: RiskType::Ambiguity,
            severity: Severity::Medium,
            description: "Excessive use of vague or uncertain language".to_string(),
            affected_text: found.join(", "),
            explanation: VAGUE_LANGUAGE_EXPLANATION.to_string(),
            suggestions: owned(&VAGUE_LANGUAGE_SUGGESTIONS),
        }])
    }
}

/// Ordered collection of detectors
pub struct RiskEngine {
    detectors: Vec<Box<dyn Detector>>,
}

impl RiskEngine {
    /// Engine with the built-in detectors and default tables
    pub fn new() -> Result<Self> {
        Self::from_config(&RiskRulesConfig::default())
    }

    /// Engine with no detectors
    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Engine with the built-in detectors using the given tables
    pub fn from_config(config: &RiskRulesConfig) -> Result<Self> {
        let contradictions: Vec<(Vec<String>, Severity)> = config
            .contradictions
            .iter()
            .map(|spec| (spec.words.clone(), spec.severity))
            .collect();

        Ok(Self::empty()
            .with_detector(MissingSectionDetector::new(&config.required_sections)?)
            .with_detector(AmbiguousDateDetector::new(&config.date_pattern)?)
            .with_detector(ContradictionDetector::new(&contradictions)?)
            .with_detector(VagueLanguageDetector::new(
                &config.vague_terms,
                config.vague_threshold,
            )?))
    }

    /// Append a detector; it runs after all existing ones
    pub fn with_detector(mut self, detector: impl Detector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Append a boxed detector
    pub fn push_detector(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Detector names in evaluation order
    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run every detector over the text
    ///
    /// Blank text yields no findings. A detector that errors is logged and
    /// skipped; the rest still run.
    pub fn detect_risks(&self, text: &str) -> Vec<RiskFlagDraft> {
        let text = DocumentText::new(text);
        if text.is_blank() {
            return Vec::new();
        }

        let mut drafts = Vec::new();
        for detector in &self.detectors {
            match detector.detect(&text) {
                Ok(found) => {
                    debug!(detector = detector.name(), findings = found.len(), "Detector ran");
                    drafts.extend(found);
                }
                Err(e) => {
                    warn!(detector = detector.name(), error = %e, "Detector failed, skipping");
                }
            }
        }
        drafts
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new().expect("Failed to create default risk engine")
    }
}
