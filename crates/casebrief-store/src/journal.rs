//! Append-only journal persistence
//!
//! Provides file-based persistence for store mutations with:
//! - JSON-lines format, one committed change per line
//! - Whole-line writes so a flag batch is recorded entirely or not at all
//! - Replay on open to rebuild the in-memory tables

use casebrief_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::state::JournalEntry;

/// Destination for committed changes
pub trait Journal: Send + Sync {
    /// Durably record one change; on error nothing may be recorded
    fn append(&mut self, entry: &JournalEntry) -> Result<()>;
}

/// Journal that keeps nothing, for purely in-memory stores
#[derive(Debug, Default, Clone, Copy)]
pub struct NullJournal;

impl Journal for NullJournal {
    fn append(&mut self, _entry: &JournalEntry) -> Result<()> {
        Ok(())
    }
}

/// Configuration for journal persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Journal file location
    #[serde(default = "default_journal_path")]
    pub path: PathBuf,

    /// Call `fsync` after every append
    #[serde(default)]
    pub sync_writes: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: default_journal_path(),
            sync_writes: false,
        }
    }
}

fn default_journal_path() -> PathBuf {
    PathBuf::from("./data/casebrief.jsonl")
}

/// JSON-lines journal file
pub struct FileJournal {
    file: File,
    path: PathBuf,
    committed_len: u64,
    sync_writes: bool,
}

impl FileJournal {
    /// Open (or create) the journal and return the entries already in it
    pub fn open(config: &JournalConfig) -> Result<(Self, Vec<JournalEntry>)> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let entries = if config.path.exists() {
            read_entries(&config.path)?
        } else {
            Vec::new()
        };

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&config.path)?;
        let mut committed_len = file.metadata()?.len();

        // Terminate a torn tail so new entries start on their own line
        if committed_len > 0 && !ends_with_newline(&mut file, committed_len)? {
            file.write_all(b"\n")?;
            committed_len += 1;
        }

        info!(
            path = %config.path.display(),
            entries = entries.len(),
            "Opened record journal"
        );

        Ok((
            Self {
                file,
                path: config.path.clone(),
                committed_len,
                sync_writes: config.sync_writes,
            },
            entries,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.file.write_all(line)?;
        self.file.flush()?;
        if self.sync_writes {
            self.file.sync_data()?;
        }
        Ok(())
    }
}

impl Journal for FileJournal {
    fn append(&mut self, entry: &JournalEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        if let Err(e) = self.write_line(&line) {
            // Drop any partial line so the next append starts clean
            if let Err(truncate_err) = self.file.set_len(self.committed_len) {
                warn!("Failed to truncate journal after write error: {}", truncate_err);
            }
            return Err(Error::store(format!(
                "Failed to append to journal {}: {}",
                self.path.display(),
                e
            )));
        }

        self.committed_len += line.len() as u64;
        debug!(bytes = line.len(), "Journal entry appended");
        Ok(())
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Read every well-formed entry; malformed or undecodable lines are skipped
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();

    // Split on raw bytes: a torn tail may cut a multi-byte character
    for (number, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<JournalEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(line = number + 1, "Skipping malformed journal entry: {}", e);
                continue;
            }
        }
    }

    Ok(entries)
}
