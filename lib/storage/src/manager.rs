use contactx_core::{
    Contact, ContactCandidate, ContactId, ContactPatch, ContactRegistry, Error, Result,
    SubmitOutcome,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::snapshot::{RegistrySnapshot, SnapshotStore};
use crate::wal::{WalRecord, WriteAheadLog};

const SAVE_INTERVAL: Duration = Duration::from_secs(300);

/// Owns the registry and its durability.
///
/// Startup loads the last snapshot and replays the write-ahead log on top of
/// it; every accepted write appends to the log, and a periodic snapshot
/// truncates it again.
pub struct StorageManager {
    registry: Arc<ContactRegistry>,
    data_dir: PathBuf,
    wal: Arc<WriteAheadLog>,
    snapshots: SnapshotStore,
    save_interval: Duration,
}

impl StorageManager {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let snapshots = SnapshotStore::new(&data_dir)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        let wal = Arc::new(
            WriteAheadLog::new(data_dir.join("wal.log"))
                .map_err(|e| Error::Storage(e.to_string()))?,
        );

        let registry = Arc::new(ContactRegistry::new());

        if let Some(snapshot) = snapshots
            .load()
            .map_err(|e| Error::Persistence(e.to_string()))?
        {
            info!(contacts = snapshot.contacts.len(), "loading snapshot from disk");
            for contact in snapshot.contacts {
                registry.restore(contact);
            }
        }

        let replayed = wal.replay().map_err(|e| Error::Storage(e.to_string()))?;
        if !replayed.is_empty() {
            info!(records = replayed.len(), "replaying write-ahead log");
            for record in replayed {
                registry.restore(record.into_contact());
            }
        }

        let manager = Self {
            registry,
            data_dir,
            wal,
            snapshots,
            save_interval: SAVE_INTERVAL,
        };

        manager.start_background_save();

        Ok(manager)
    }

    /// Start background save thread
    fn start_background_save(&self) {
        let registry = self.registry.clone();
        let snapshots = self.snapshots.clone();
        let wal = self.wal.clone();
        let interval = self.save_interval;

        std::thread::spawn(move || loop {
            std::thread::sleep(interval);

            if let Err(e) = write_snapshot(&registry, &snapshots, &wal) {
                warn!(error = %e, "background save failed");
            }
        });
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ContactRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Score and store a candidate, logging accepted rows to the WAL.
    ///
    /// An `AlreadyExisted` outcome wrote nothing, so nothing is logged.
    pub fn submit(&self, candidate: ContactCandidate) -> Result<SubmitOutcome> {
        let outcome = self.registry.submit(candidate)?;
        if let SubmitOutcome::Created(contact) = &outcome {
            self.log_write(WalRecord::Submitted {
                contact: contact.clone(),
            })?;
        }
        Ok(outcome)
    }

    pub fn invalidate(&self, id: ContactId, reason: &str) -> Result<Contact> {
        let contact = self.registry.invalidate(id, reason)?;
        self.log_write(WalRecord::Invalidated {
            contact: contact.clone(),
        })?;
        Ok(contact)
    }

    pub fn update(&self, id: ContactId, patch: ContactPatch) -> Result<Contact> {
        let contact = self.registry.update(id, patch)?;
        self.log_write(WalRecord::Updated {
            contact: contact.clone(),
        })?;
        Ok(contact)
    }

    fn log_write(&self, record: WalRecord) -> Result<()> {
        self.wal
            .append(&record)
            .and_then(|()| self.wal.sync())
            .map_err(|e| Error::Storage(e.to_string()))
    }

    /// Write a fresh snapshot and truncate the WAL.
    pub fn save(&self) -> Result<()> {
        write_snapshot(&self.registry, &self.snapshots, &self.wal)
            .map_err(|e| Error::Persistence(e.to_string()))
    }
}

fn write_snapshot(
    registry: &ContactRegistry,
    snapshots: &SnapshotStore,
    wal: &WriteAheadLog,
) -> anyhow::Result<()> {
    let snapshot = RegistrySnapshot {
        contacts: registry.iter(),
        saved_at: chrono::Utc::now(),
    };
    snapshots.save(&snapshot)?;
    wal.truncate()?;
    Ok(())
}
