//! Both rule engines behind one handle

use casebrief_core::{CategoryDraft, Result, RiskFlagDraft};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::category::CategoryEngine;
use crate::config::RulesConfig;
use crate::risk::RiskEngine;

/// Output of running both engines over one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub risks: Vec<RiskFlagDraft>,
    pub category: CategoryDraft,
}

/// Shareable risk and category engines
#[derive(Clone)]
pub struct RuleEngines {
    risk: Arc<RiskEngine>,
    category: Arc<CategoryEngine>,
}

impl RuleEngines {
    pub fn new(risk: RiskEngine, category: CategoryEngine) -> Self {
        Self {
            risk: Arc::new(risk),
            category: Arc::new(category),
        }
    }

    /// Build both engines from rule configuration
    pub fn from_config(config: &RulesConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            RiskEngine::from_config(&config.risk)?,
            CategoryEngine::from_config(&config.category)?,
        ))
    }

    pub fn risk(&self) -> &RiskEngine {
        &self.risk
    }

    pub fn category(&self) -> &CategoryEngine {
        &self.category
    }

    pub fn detect_risks(&self, text: &str) -> Vec<RiskFlagDraft> {
        self.risk.detect_risks(text)
    }

    pub fn classify(&self, text: &str) -> CategoryDraft {
        self.category.classify(text)
    }

    /// Run both engines
    pub fn analyze(&self, text: &str) -> TextAnalysis {
        TextAnalysis {
            risks: self.detect_risks(text),
            category: self.classify(text),
        }
    }
}

impl std::fmt::Debug for RuleEngines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngines")
            .field("detectors", &self.risk.detector_names())
            .field("category_rules", &self.category.rule_order())
            .finish()
    }
}
