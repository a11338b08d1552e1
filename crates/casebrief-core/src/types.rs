//! Core record types for casebrief
//!
//! Drafts are what the rule engines produce. Records are drafts after a
//! sink has assigned an id, an owning document and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Identifier of a document in the external store
pub type DocumentId = u64;

/// Estimated review time attached to engine-generated workflows
pub const DEFAULT_ESTIMATED_TIME: &str = "15-30 minutes";

/// Kind of issue a detector found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskType {
    Inconsistency,
    MissingSection,
    Ambiguity,
    Misinformation,
    Contradiction,
}

impl RiskType {
    /// Wire name of this risk type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inconsistency => "inconsistency",
            Self::MissingSection => "missing_section",
            Self::Ambiguity => "ambiguity",
            Self::Misinformation => "misinformation",
            Self::Contradiction => "contradiction",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inconsistency => "Inconsistency",
            Self::MissingSection => "Missing Section",
            Self::Ambiguity => "Ambiguity",
            Self::Misinformation => "Potential Misinformation",
            Self::Contradiction => "Contradiction",
        }
    }
}

impl fmt::Display for RiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a risk flag, ordered `Low < Medium < High < Critical`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, lowest first
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Wire name of this severity
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding produced by the risk engine, before persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFlagDraft {
    pub risk_type: RiskType,
    pub severity: Severity,
    pub description: String,

    /// Literal snippet(s) that triggered the detector, possibly comma-joined
    pub affected_text: String,

    pub explanation: String,

    /// Ordered remediation hints
    pub suggestions: Vec<String>,
}

/// A persisted risk flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFlag {
    pub id: String,
    pub document_id: DocumentId,
    pub risk_type: RiskType,
    pub severity: Severity,
    pub description: String,
    pub affected_text: String,
    pub explanation: String,
    pub suggestions: Vec<String>,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
}

impl RiskFlag {
    /// Materialize a draft as an unresolved flag
    pub fn from_draft(
        id: impl Into<String>,
        document_id: DocumentId,
        draft: RiskFlagDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            document_id,
            risk_type: draft.risk_type,
            severity: draft.severity,
            description: draft.description,
            affected_text: draft.affected_text,
            explanation: draft.explanation,
            suggestions: draft.suggestions,
            is_resolved: false,
            created_at,
        }
    }
}

/// Document type assigned by the category engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Contract,
    Fir,
    ChargeSheet,
    CaseRecord,
    WitnessStatement,
    AudioTranscript,
    Other,
}

impl Category {
    /// Wire name of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Fir => "fir",
            Self::ChargeSheet => "charge_sheet",
            Self::CaseRecord => "case_record",
            Self::WitnessStatement => "witness_statement",
            Self::AudioTranscript => "audio_transcript",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Contract => "Contract",
            Self::Fir => "FIR (First Information Report)",
            Self::ChargeSheet => "Charge Sheet",
            Self::CaseRecord => "Case Record",
            Self::WitnessStatement => "Witness Statement",
            Self::AudioTranscript => "Audio Transcript",
            Self::Other => "Other Document",
        }
    }

    /// Review steps suggested for documents of this category
    pub fn workflow_steps(&self) -> &'static [&'static str] {
        match self {
            Self::Contract => &[
                "Review terms",
                "Verify parties",
                "Check clauses",
                "Identify obligations",
            ],
            Self::Fir => &[
                "Extract incident details",
                "Identify parties",
                "List charges",
                "Timeline analysis",
            ],
            Self::ChargeSheet => &[
                "List charges",
                "Verify evidence",
                "Check legal sections",
                "Review prosecution case",
            ],
            Self::CaseRecord => &[
                "Extract case details",
                "Timeline of events",
                "List all parties",
                "Review proceedings",
            ],
            Self::WitnessStatement => &[
                "Identify witness",
                "Extract testimony",
                "Verify dates",
                "Cross-reference with case",
            ],
            Self::AudioTranscript => &[
                "Review transcription",
                "Identify speakers",
                "Extract key points",
                "Timestamp analysis",
            ],
            Self::Other => &["Manual review", "Content analysis", "Classification needed"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contract" => Ok(Self::Contract),
            "fir" => Ok(Self::Fir),
            "charge_sheet" => Ok(Self::ChargeSheet),
            "case_record" => Ok(Self::CaseRecord),
            "witness_statement" => Ok(Self::WitnessStatement),
            "audio_transcript" => Ok(Self::AudioTranscript),
            "other" => Ok(Self::Other),
            other => Err(Error::validation(format!("unknown category: {}", other))),
        }
    }
}

/// Review priority of a suggested workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Medium,
    High,
}

impl Priority {
    /// `High` above 0.8 confidence, `Medium` otherwise
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > 0.8 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

/// Review workflow attached to a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedWorkflow {
    pub steps: Vec<String>,
    pub estimated_time: String,
    pub priority: Priority,
}

impl SuggestedWorkflow {
    /// Workflow for `category` at the given confidence
    pub fn for_category(category: Category, confidence: f32) -> Self {
        Self {
            steps: category
                .workflow_steps()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            estimated_time: DEFAULT_ESTIMATED_TIME.to_string(),
            priority: Priority::from_confidence(confidence),
        }
    }
}

/// A classification produced by the category engine or a user, before persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub category: Category,

    #[serde(default)]
    pub subcategory: Option<String>,

    pub confidence_score: f32,
    pub suggested_workflow: SuggestedWorkflow,
    pub auto_detected: bool,
}

impl CategoryDraft {
    /// Engine-style draft with the category's default workflow
    pub fn detected(category: Category, subcategory: Option<String>, confidence: f32) -> Self {
        Self {
            category,
            subcategory,
            confidence_score: confidence,
            suggested_workflow: SuggestedWorkflow::for_category(category, confidence),
            auto_detected: true,
        }
    }

    /// Draft for a manual override on a document that has no category yet
    pub fn from_override(ov: CategoryOverride) -> Self {
        let suggested_workflow = ov
            .suggested_workflow
            .unwrap_or_else(|| SuggestedWorkflow::for_category(ov.category, 1.0));
        Self {
            category: ov.category,
            subcategory: ov.subcategory,
            confidence_score: 1.0,
            suggested_workflow,
            auto_detected: false,
        }
    }

    /// Check the confidence score lies in `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(Error::validation(format!(
                "confidence score {} outside [0, 1]",
                self.confidence_score
            )));
        }
        Ok(())
    }

    /// Manual classifications always carry full confidence
    pub fn normalized(mut self) -> Self {
        if !self.auto_detected {
            self.confidence_score = 1.0;
        }
        self
    }
}

/// A user's explicit category choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOverride {
    pub category: Category,

    /// Replaces the stored subcategory when present
    #[serde(default)]
    pub subcategory: Option<String>,

    /// Replaces the stored workflow when present
    #[serde(default)]
    pub suggested_workflow: Option<SuggestedWorkflow>,
}

impl CategoryOverride {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            subcategory: None,
            suggested_workflow: None,
        }
    }
}

/// The persisted category of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCategory {
    pub id: String,
    pub document_id: DocumentId,
    pub category: Category,
    pub subcategory: Option<String>,
    pub confidence_score: f32,
    pub suggested_workflow: SuggestedWorkflow,
    pub auto_detected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentCategory {
    /// Materialize a draft; manual drafts get full confidence
    pub fn from_draft(
        id: impl Into<String>,
        document_id: DocumentId,
        draft: CategoryDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let draft = draft.normalized();
        Self {
            id: id.into(),
            document_id,
            category: draft.category,
            subcategory: draft.subcategory,
            confidence_score: draft.confidence_score,
            suggested_workflow: draft.suggested_workflow,
            auto_detected: draft.auto_detected,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace contents wholesale, keeping identity and creation time
    pub fn replace_with(&mut self, draft: CategoryDraft, now: DateTime<Utc>) {
        let draft = draft.normalized();
        self.category = draft.category;
        self.subcategory = draft.subcategory;
        self.confidence_score = draft.confidence_score;
        self.suggested_workflow = draft.suggested_workflow;
        self.auto_detected = draft.auto_detected;
        self.updated_at = now;
    }

    /// Apply a manual override in place
    pub fn apply_override(&mut self, ov: CategoryOverride, now: DateTime<Utc>) {
        self.category = ov.category;
        if let Some(subcategory) = ov.subcategory {
            self.subcategory = Some(subcategory);
        }
        if let Some(workflow) = ov.suggested_workflow {
            self.suggested_workflow = workflow;
        }
        self.confidence_score = 1.0;
        self.auto_detected = false;
        self.updated_at = now;
    }
}
