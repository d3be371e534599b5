use chrono::Utc;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::LedgerError,
};

use super::{MemoryLedgerStore, Result, StoreData};

const SNAPSHOT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DEFAULT_FILE_STEM: &str = "ledger";
const DEFAULT_RETENTION: usize = 5;

/// Persists a whole store as one pretty-printed JSON document.
///
/// Every save copies the previous file into a sibling `backups` directory and
/// keeps the newest `retention` copies.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStorage {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonSnapshotStorage {
    pub fn new(path: impl Into<PathBuf>, retention: Option<usize>) -> Self {
        let path = path.into();
        let backups_dir = path
            .parent()
            .map(|parent| parent.join("backups"))
            .unwrap_or_else(|| PathBuf::from("backups"));
        Self {
            path,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        }
    }

    /// Storage at `<base>/snapshots/ledger.json`.
    pub fn in_base_dir(base: &Path) -> Self {
        Self::new(
            PathResolver::snapshot_dir_in(base)
                .join(format!("{DEFAULT_FILE_STEM}.{SNAPSHOT_EXTENSION}")),
            None,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document; a missing file is an empty store.
    pub fn load(&self) -> Result<StoreData> {
        if !self.path.exists() {
            return Ok(StoreData::default());
        }
        load_data_from_path(&self.path)
    }

    pub fn save(&self, data: &StoreData) -> Result<()> {
        self.backup_existing_file()?;
        save_data_to_path(data, &self.path)
    }

    pub fn load_store(&self) -> Result<MemoryLedgerStore> {
        Ok(MemoryLedgerStore::from_data(self.load()?))
    }

    pub fn save_store(&self, store: &MemoryLedgerStore) -> Result<()> {
        self.save(&store.export()?)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    /// Copies a backup over the live file and returns its contents.
    pub fn restore(&self, backup_name: &str) -> Result<StoreData> {
        let backup = self.backups_dir.join(backup_name);
        if !backup.exists() {
            return Err(LedgerError::not_found("Backup", backup_name));
        }
        let data = load_data_from_path(&backup)?;
        save_data_to_path(&data, &self.path)?;
        info!(backup = backup_name, "restored ledger snapshot");
        Ok(data)
    }

    fn backup_existing_file(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        ensure_dir(&self.backups_dir)?;
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(DEFAULT_FILE_STEM);
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let backup = self
            .backups_dir
            .join(format!("{stem}_{timestamp}.{SNAPSHOT_EXTENSION}"));
        fs::copy(&self.path, &backup)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for name in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(name));
        }
        Ok(())
    }
}

pub fn save_data_to_path(data: &StoreData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    write_atomic(path, &json)
}

pub fn load_data_from_path(path: &Path) -> Result<StoreData> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
