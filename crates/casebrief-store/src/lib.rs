//! casebrief store
//!
//! Record sinks for risk flags and document categories.
//!
//! Provides:
//! - [`MemoryStore`] for tests and ephemeral deployments
//! - [`JournalStore`], which appends every change to a JSON-lines file and
//!   replays it on startup

pub mod journal;
pub mod state;
pub mod store;

use casebrief_core::{RecordSink, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use journal::{FileJournal, Journal, JournalConfig, NullJournal};
pub use state::{JournalEntry, StoreState};
pub use store::{JournalStore, MemoryStore, RecordStore};

/// Which record sink to run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Records live only as long as the process
    #[default]
    Memory,

    /// Records are journaled to disk
    Journal(JournalConfig),
}

/// Open the configured sink
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordSink>> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreConfig::Journal(journal) => Ok(Arc::new(JournalStore::open(journal)?)),
    }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::journal::JournalConfig;
    pub use crate::store::{JournalStore, MemoryStore};
    pub use crate::{open_store, StoreConfig};
}
