// Snapshot support for persistence across restarts
use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior::AllowOverwrite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use contactx_core::Contact;

const SNAPSHOT_FILENAME: &str = "contacts.snapshot";

/// Full registry state, bincode-encoded on disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub contacts: Vec<Contact>,
    pub saved_at: DateTime<Utc>,
}

/// Reads and writes the single registry snapshot file. Writes go through a
/// temp file and an atomic rename, so a crash mid-save leaves the previous
/// snapshot intact.
#[derive(Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            path: data_dir.join(SNAPSHOT_FILENAME),
        })
    }

    pub fn save(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        let data = bincode::serialize(snapshot).context("serializing snapshot")?;
        AtomicFile::new(&self.path, AllowOverwrite)
            .write(|f| f.write_all(&data))
            .with_context(|| format!("writing snapshot to {:?}", self.path))?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<RegistrySnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path)?;
        let snapshot = bincode::deserialize(&data)
            .with_context(|| format!("decoding snapshot at {:?}", self.path))?;
        Ok(Some(snapshot))
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
