//! Rule configuration for the risk and category engines
//!
//! Every field has a default equal to the built-in rule tables, so an empty
//! YAML document (or no file at all) yields the standard engines.

use casebrief_core::{Category, Error, Result, Severity};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for both rule engines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub risk: RiskRulesConfig,

    #[serde(default)]
    pub category: CategoryRulesConfig,
}

impl RulesConfig {
    /// Parse rules from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse rules: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load rules from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read rules file {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.risk.validate()?;
        self.category.validate()
    }
}

/// Risk detector tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRulesConfig {
    /// Section keywords every document is expected to mention
    #[serde(default = "default_required_sections")]
    pub required_sections: Vec<String>,

    /// Regex for date-like substrings
    #[serde(default = "default_date_pattern")]
    pub date_pattern: String,

    /// Word groups that contradict each other when all appear
    #[serde(default = "default_contradictions")]
    pub contradictions: Vec<ContradictionSpec>,

    /// Terms that make statements imprecise
    #[serde(default = "default_vague_terms")]
    pub vague_terms: Vec<String>,

    /// Distinct vague terms needed before flagging
    #[serde(default = "default_vague_threshold")]
    pub vague_threshold: usize,
}

impl Default for RiskRulesConfig {
    fn default() -> Self {
        Self {
            required_sections: default_required_sections(),
            date_pattern: default_date_pattern(),
            contradictions: default_contradictions(),
            vague_terms: default_vague_terms(),
            vague_threshold: default_vague_threshold(),
        }
    }
}

impl RiskRulesConfig {
    fn validate(&self) -> Result<()> {
        if let Some(spec) = self.contradictions.iter().find(|c| c.words.is_empty()) {
            return Err(Error::config(format!(
                "contradiction entry with severity {} has no words",
                spec.severity
            )));
        }
        if self.vague_threshold == 0 {
            return Err(Error::config("vague_threshold must be at least 1"));
        }
        Ok(())
    }
}

/// One contradiction table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionSpec {
    pub words: Vec<String>,
    pub severity: Severity,
}

impl ContradictionSpec {
    pub fn new(words: &[&str], severity: Severity) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            severity,
        }
    }
}

/// Ordered category rules; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRulesConfig {
    #[serde(default = "default_category_rules")]
    pub rules: Vec<CategoryRuleSpec>,
}

impl Default for CategoryRulesConfig {
    fn default() -> Self {
        Self {
            rules: default_category_rules(),
        }
    }
}

impl CategoryRulesConfig {
    fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            if !(0.0..=1.0).contains(&rule.confidence) {
                return Err(Error::config(format!(
                    "rule for {} has confidence {} outside [0, 1]",
                    rule.category, rule.confidence
                )));
            }
        }
        Ok(())
    }
}

/// A single category rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRuleSpec {
    pub category: Category,
    pub when: PredicateSpec,
    pub confidence: f32,

    /// Subcategory used when no refinement matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Ordered refinements; the first matching one names the subcategory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refinements: Vec<SubcategorySpec>,
}

/// Subcategory refinement within a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategorySpec {
    pub label: String,
    pub when: PredicateSpec,
}

/// Keyword predicate over normalized text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PredicateSpec {
    /// At least one keyword is present
    Any { keywords: Vec<String> },

    /// Every sub-predicate holds
    All { of: Vec<PredicateSpec> },
}

impl PredicateSpec {
    pub fn any(keywords: &[&str]) -> Self {
        Self::Any {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn all(of: Vec<PredicateSpec>) -> Self {
        Self::All { of }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_required_sections() -> Vec<String> {
    strings(&["case details", "parties", "evidence", "charges", "date"])
}

/// ASCII digits and ASCII word boundaries, so dates glued to non-Latin
/// script still match and non-ASCII digits never do
fn default_date_pattern() -> String {
    r"(?-u:\b)[0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{2,4}(?-u:\b)".to_string()
}

fn default_contradictions() -> Vec<ContradictionSpec> {
    vec![
        ContradictionSpec::new(&["innocent", "guilty"], Severity::Critical),
        ContradictionSpec::new(&["before", "after"], Severity::Medium),
        ContradictionSpec::new(&["present", "absent"], Severity::Low),
    ]
}

fn default_vague_terms() -> Vec<String> {
    strings(&["approximately", "around", "possibly", "maybe", "unclear"])
}

fn default_vague_threshold() -> usize {
    3
}

fn default_category_rules() -> Vec<CategoryRuleSpec> {
    let rule = |category, when, confidence| CategoryRuleSpec {
        category,
        when,
        confidence,
        subcategory: None,
        refinements: Vec::new(),
    };

    vec![
        CategoryRuleSpec {
            subcategory: Some("Criminal".to_string()),
            ..rule(
                Category::Fir,
                PredicateSpec::any(&["first information report", "fir no", "police station"]),
                0.92,
            )
        },
        rule(
            Category::ChargeSheet,
            PredicateSpec::any(&["charge sheet", "chargesheet", "section 173"]),
            0.88,
        ),
        rule(
            Category::WitnessStatement,
            PredicateSpec::all(vec![
                PredicateSpec::any(&["witness"]),
                PredicateSpec::any(&["statement", "testimony"]),
            ]),
            0.85,
        ),
        CategoryRuleSpec {
            refinements: vec![
                SubcategorySpec {
                    label: "Employment".to_string(),
                    when: PredicateSpec::any(&["employment"]),
                },
                SubcategorySpec {
                    label: "Lease".to_string(),
                    when: PredicateSpec::any(&["lease", "rent"]),
                },
                SubcategorySpec {
                    label: "Sale/Purchase".to_string(),
                    when: PredicateSpec::any(&["sale", "purchase"]),
                },
            ],
            ..rule(
                Category::Contract,
                PredicateSpec::any(&["contract", "agreement", "parties hereby agree"]),
                0.90,
            )
        },
        rule(
            Category::CaseRecord,
            PredicateSpec::any(&["case no", "judgment", "order"]),
            0.80,
        ),
        rule(
            Category::AudioTranscript,
            PredicateSpec::any(&["[audio transcription]", "transcript of"]),
            0.95,
        ),
    ]
}
