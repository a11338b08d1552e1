//! Record store implementing [`RecordSink`]

use async_trait::async_trait;
use casebrief_core::{
    CategoryDraft, CategoryOverride, DocumentCategory, DocumentId, Error, RecordSink, Result,
    RiskFlag, RiskFlagDraft,
};
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::journal::{FileJournal, Journal, JournalConfig, NullJournal};
use crate::state::{JournalEntry, StoreState};

struct Inner<J> {
    state: StoreState,
    journal: J,
}

impl<J: Journal> Inner<J> {
    /// Journal first, then apply; a journal failure leaves the tables as they were
    fn commit(&mut self, entry: JournalEntry) -> Result<JournalEntry> {
        self.journal.append(&entry)?;
        self.state.apply(&entry);
        Ok(entry)
    }
}

/// Record tables guarded by one lock, with every change sent to a journal
///
/// Journal appends are synchronous and run while the write lock is held, so
/// the calling task blocks for the duration of the write (and of `fsync`
/// when `sync_writes` is set). Each append is a single line; deployments
/// that need high write rates with `sync_writes` should run on the
/// multi-threaded runtime so a blocked worker does not stall the others.
pub struct RecordStore<J> {
    inner: RwLock<Inner<J>>,
}

/// Store that keeps records only in memory
pub type MemoryStore = RecordStore<NullJournal>;

/// Store backed by a JSON-lines journal file
pub type JournalStore = RecordStore<FileJournal>;

impl RecordStore<NullJournal> {
    pub fn new() -> Self {
        Self::with_journal(StoreState::new(), NullJournal)
    }
}

impl Default for RecordStore<NullJournal> {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore<FileJournal> {
    /// Open the journal and replay it
    pub fn open(config: &JournalConfig) -> Result<Self> {
        let (journal, entries) = FileJournal::open(config)?;

        let mut state = StoreState::new();
        for entry in &entries {
            state.apply(entry);
        }
        info!(
            documents = state.document_count(),
            replayed = entries.len(),
            "Record store restored from journal"
        );

        Ok(Self::with_journal(state, journal))
    }
}

impl<J: Journal> RecordStore<J> {
    pub fn with_journal(state: StoreState, journal: J) -> Self {
        Self {
            inner: RwLock::new(Inner { state, journal }),
        }
    }
}

#[async_trait]
impl<J: Journal + 'static> RecordSink for RecordStore<J> {
    async fn register_document(&self, document_id: DocumentId) -> Result<()> {
        let mut inner = self.inner.write();
        if let Some(entry) = inner.state.plan_register(document_id) {
            inner.commit(entry)?;
            debug!(document_id, "Document registered");
        }
        Ok(())
    }

    async fn document_exists(&self, document_id: DocumentId) -> Result<bool> {
        Ok(self.inner.read().state.document_exists(document_id))
    }

    async fn create_risk_flags(
        &self,
        document_id: DocumentId,
        drafts: Vec<RiskFlagDraft>,
    ) -> Result<Vec<RiskFlag>> {
        let mut inner = self.inner.write();
        match inner.state.plan_create_flags(document_id, drafts, Utc::now())? {
            Some(entry) => match inner.commit(entry)? {
                JournalEntry::RiskFlagsCreated { flags } => {
                    debug!(document_id, count = flags.len(), "Risk flags created");
                    Ok(flags)
                }
                _ => Err(Error::internal("unexpected journal entry for flag batch")),
            },
            None => Ok(Vec::new()),
        }
    }

    async fn list_risk_flags(&self, document_id: DocumentId) -> Result<Vec<RiskFlag>> {
        Ok(self.inner.read().state.flags_for(document_id))
    }

    async fn resolve_risk_flag(&self, id: &str) -> Result<RiskFlag> {
        let mut inner = self.inner.write();
        if let Some(entry) = inner.state.plan_resolve(id)? {
            inner.commit(entry)?;
            debug!(id, "Risk flag resolved");
        }
        inner
            .state
            .flag(id)
            .cloned()
            .ok_or_else(|| Error::not_found("risk flag", id))
    }

    async fn get_category(&self, document_id: DocumentId) -> Result<Option<DocumentCategory>> {
        Ok(self.inner.read().state.category(document_id).cloned())
    }

    async fn upsert_category(
        &self,
        document_id: DocumentId,
        draft: CategoryDraft,
    ) -> Result<DocumentCategory> {
        let mut inner = self.inner.write();
        let entry = inner.state.plan_upsert(document_id, draft, Utc::now())?;
        stored_category(inner.commit(entry)?)
    }

    async fn override_category(
        &self,
        document_id: DocumentId,
        ov: CategoryOverride,
    ) -> Result<DocumentCategory> {
        let mut inner = self.inner.write();
        let entry = inner.state.plan_override(document_id, ov, Utc::now())?;
        stored_category(inner.commit(entry)?)
    }
}

fn stored_category(entry: JournalEntry) -> Result<DocumentCategory> {
    match entry {
        JournalEntry::CategoryStored { category } => Ok(category),
        _ => Err(Error::internal("unexpected journal entry for category write")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebrief_core::{RiskType, Severity};

    /// A journal that refuses every write - for testing error paths
    struct FailingJournal;

    impl Journal for FailingJournal {
        fn append(&mut self, _entry: &JournalEntry) -> Result<()> {
            Err(Error::store("disk full"))
        }
    }

    #[tokio::test]
    async fn test_journal_failure_leaves_state_unchanged() {
        let mut state = StoreState::new();
        state.apply(&JournalEntry::DocumentRegistered { document_id: 1 });
        let store = RecordStore::with_journal(state, FailingJournal);

        let draft = RiskFlagDraft {
            risk_type: RiskType::Contradiction,
            severity: Severity::Low,
            description: "d".into(),
            affected_text: "a".into(),
            explanation: "e".into(),
            suggestions: vec![],
        };

        let err = store
            .create_risk_flags(1, vec![draft.clone(), draft])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert!(store.list_risk_flags(1).await.unwrap().is_empty());
        assert!(store.register_document(2).await.is_err());
        assert!(!store.document_exists(2).await.unwrap());
    }
}
