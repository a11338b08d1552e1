//! Record sink trait
//!
//! The rule engines never touch storage. Whatever persists their output
//! implements [`RecordSink`]: an HTTP client, a database, or one of the
//! stores in `casebrief-store`.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CategoryDraft, CategoryOverride, DocumentCategory, DocumentId, RiskFlag, RiskFlagDraft,
};

/// Storage for risk flags and document categories
///
/// Implementations must reject writes for documents that were never
/// registered, create flag batches all-or-nothing, and make category
/// upserts and overrides atomic per document.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Make a document known to the sink; registering twice is a no-op
    async fn register_document(&self, document_id: DocumentId) -> Result<()>;

    /// Whether the document has been registered
    async fn document_exists(&self, document_id: DocumentId) -> Result<bool>;

    /// Persist a batch of drafts as unresolved flags, in order
    async fn create_risk_flags(
        &self,
        document_id: DocumentId,
        drafts: Vec<RiskFlagDraft>,
    ) -> Result<Vec<RiskFlag>>;

    /// All flags of a document in creation order
    async fn list_risk_flags(&self, document_id: DocumentId) -> Result<Vec<RiskFlag>>;

    /// Mark a flag resolved; resolving twice returns the same record
    async fn resolve_risk_flag(&self, id: &str) -> Result<RiskFlag>;

    /// The document's category, if one has been stored
    async fn get_category(&self, document_id: DocumentId) -> Result<Option<DocumentCategory>>;

    /// Create or wholesale-replace the document's category
    async fn upsert_category(
        &self,
        document_id: DocumentId,
        draft: CategoryDraft,
    ) -> Result<DocumentCategory>;

    /// Apply a user's category choice to the document's category
    async fn override_category(
        &self,
        document_id: DocumentId,
        ov: CategoryOverride,
    ) -> Result<DocumentCategory>;
}
