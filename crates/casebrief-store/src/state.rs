//! In-memory record tables
//!
//! Every mutation happens in two steps: `plan_*` validates a request against
//! the current tables and describes the change as a [`JournalEntry`], then
//! [`StoreState::apply`] performs it. Planning never mutates, so a failed
//! journal write leaves the tables untouched.

use casebrief_core::{
    CategoryDraft, CategoryOverride, DocumentCategory, DocumentId, Error, Result, RiskFlag,
    RiskFlagDraft,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One committed change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JournalEntry {
    DocumentRegistered { document_id: DocumentId },
    RiskFlagsCreated { flags: Vec<RiskFlag> },
    RiskFlagResolved { id: String },
    CategoryStored { category: DocumentCategory },
}

fn risk_flag_id() -> String {
    format!("risk_{}", uuid::Uuid::new_v4())
}

fn category_id() -> String {
    format!("cat_{}", uuid::Uuid::new_v4())
}

/// Documents, flags and categories
#[derive(Debug, Default)]
pub struct StoreState {
    documents: HashSet<DocumentId>,
    flags: Vec<RiskFlag>,
    flag_index: HashMap<String, usize>,
    categories: HashMap<DocumentId, DocumentCategory>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_exists(&self, document_id: DocumentId) -> bool {
        self.documents.contains(&document_id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn flags_for(&self, document_id: DocumentId) -> Vec<RiskFlag> {
        self.flags
            .iter()
            .filter(|f| f.document_id == document_id)
            .cloned()
            .collect()
    }

    pub fn flag(&self, id: &str) -> Option<&RiskFlag> {
        self.flag_index.get(id).map(|&i| &self.flags[i])
    }

    pub fn category(&self, document_id: DocumentId) -> Option<&DocumentCategory> {
        self.categories.get(&document_id)
    }

    fn require_document(&self, document_id: DocumentId) -> Result<()> {
        if self.document_exists(document_id) {
            Ok(())
        } else {
            Err(Error::not_found("document", document_id))
        }
    }

    /// `None` when the document is already registered
    pub fn plan_register(&self, document_id: DocumentId) -> Option<JournalEntry> {
        (!self.document_exists(document_id))
            .then_some(JournalEntry::DocumentRegistered { document_id })
    }

    /// `None` for an empty batch
    pub fn plan_create_flags(
        &self,
        document_id: DocumentId,
        drafts: Vec<RiskFlagDraft>,
        now: DateTime<Utc>,
    ) -> Result<Option<JournalEntry>> {
        self.require_document(document_id)?;
        if drafts.is_empty() {
            return Ok(None);
        }

        let flags = drafts
            .into_iter()
            .map(|draft| RiskFlag::from_draft(risk_flag_id(), document_id, draft, now))
            .collect();
        Ok(Some(JournalEntry::RiskFlagsCreated { flags }))
    }

    /// `None` when the flag is already resolved
    pub fn plan_resolve(&self, id: &str) -> Result<Option<JournalEntry>> {
        let flag = self
            .flag(id)
            .ok_or_else(|| Error::not_found("risk flag", id))?;
        Ok((!flag.is_resolved).then(|| JournalEntry::RiskFlagResolved { id: id.to_string() }))
    }

    pub fn plan_upsert(
        &self,
        document_id: DocumentId,
        draft: CategoryDraft,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry> {
        self.require_document(document_id)?;
        let draft = draft.normalized();
        draft.validate()?;

        let category = match self.category(document_id) {
            Some(existing) => {
                let mut replaced = existing.clone();
                replaced.replace_with(draft, now);
                replaced
            }
            None => DocumentCategory::from_draft(category_id(), document_id, draft, now),
        };
        Ok(JournalEntry::CategoryStored { category })
    }

    pub fn plan_override(
        &self,
        document_id: DocumentId,
        ov: CategoryOverride,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry> {
        self.require_document(document_id)?;

        let category = match self.category(document_id) {
            Some(existing) => {
                let mut overridden = existing.clone();
                overridden.apply_override(ov, now);
                overridden
            }
            None => DocumentCategory::from_draft(
                category_id(),
                document_id,
                CategoryDraft::from_override(ov),
                now,
            ),
        };
        Ok(JournalEntry::CategoryStored { category })
    }

    /// Perform a planned or replayed change
    pub fn apply(&mut self, entry: &JournalEntry) {
        match entry {
            JournalEntry::DocumentRegistered { document_id } => {
                self.documents.insert(*document_id);
            }
            JournalEntry::RiskFlagsCreated { flags } => {
                for flag in flags {
                    self.documents.insert(flag.document_id);
                    self.flag_index.insert(flag.id.clone(), self.flags.len());
                    self.flags.push(flag.clone());
                }
            }
            JournalEntry::RiskFlagResolved { id } => {
                if let Some(&i) = self.flag_index.get(id) {
                    self.flags[i].is_resolved = true;
                }
            }
            JournalEntry::CategoryStored { category } => {
                self.documents.insert(category.document_id);
                self.categories
                    .insert(category.document_id, category.clone());
            }
        }
    }
}
