use anyhow::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use contactx_core::Contact;

/// A committed write, one JSON object per line.
///
/// Every variant carries the full post-write record, so replay is a plain
/// insert-or-replace in log order and never re-runs scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WalRecord {
    Submitted { contact: Contact },
    Invalidated { contact: Contact },
    Updated { contact: Contact },
}

impl WalRecord {
    #[inline]
    #[must_use]
    pub fn contact(&self) -> &Contact {
        match self {
            WalRecord::Submitted { contact }
            | WalRecord::Invalidated { contact }
            | WalRecord::Updated { contact } => contact,
        }
    }

    #[inline]
    #[must_use]
    pub fn into_contact(self) -> Contact {
        match self {
            WalRecord::Submitted { contact }
            | WalRecord::Invalidated { contact }
            | WalRecord::Updated { contact } => contact,
        }
    }
}

/// Write-Ahead Log for durability between snapshots
/// Inspired by Redis AOF (Append Only File) patterns
pub struct WriteAheadLog {
    file: Arc<Mutex<BufWriter<File>>>,
    raw_file: Arc<Mutex<File>>, // For fsync and truncation
    path: PathBuf,
}

impl WriteAheadLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        // Clone the file for fsync operations (Redis pattern)
        let raw_file = file.try_clone()?;

        Ok(Self {
            file: Arc::new(Mutex::new(BufWriter::new(file))),
            raw_file: Arc::new(Mutex::new(raw_file)),
            path,
        })
    }

    /// Append a record to the WAL
    #[inline]
    pub fn append(&self, record: &WalRecord) -> Result<()> {
        let data = serde_json::to_vec(record)?;
        let mut writer = self.file.lock();
        writer.write_all(&data)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Sync WAL to disk (like Redis fsync)
    /// Uses sync_data() which is equivalent to fdatasync on Unix
    #[inline]
    pub fn sync(&self) -> Result<()> {
        let mut writer = self.file.lock();
        writer.flush()?;

        let raw = self.raw_file.lock();
        raw.sync_data()?;
        Ok(())
    }

    /// Read back every record appended since the last truncation.
    ///
    /// A torn trailing line (crash mid-append) is skipped with a warning;
    /// everything before it replays.
    pub fn replay(&self) -> Result<Vec<WalRecord>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(error = %e, "skipping malformed WAL line");
                }
            }
        }
        Ok(records)
    }

    /// Drop all records, done after their state is captured in a snapshot.
    pub fn truncate(&self) -> Result<()> {
        let mut writer = self.file.lock();
        writer.flush()?;

        let raw = self.raw_file.lock();
        raw.set_len(0)?;
        raw.sync_all()?;
        Ok(())
    }
}
