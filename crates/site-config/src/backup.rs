//! Labeled snapshots kept beside the two slots.
//!
//! Backups are one JSON array under the backups key, newest first and capped
//! at [`crate::StoreOptions::backup_limit`]; the oldest entries fall off
//! silently. Nothing is backed up automatically.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::schema::SiteConfig;
use crate::store::{ConfigStore, Mode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEntry {
    pub id: String,
    /// RFC 3339 UTC timestamp
    #[serde(default)]
    pub created_at: String,
    /// Slot the snapshot was taken from
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub snapshot: SiteConfig,
}

impl ConfigStore {
    /// Stored backups, newest first. An unreadable list is empty.
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>> {
        Ok(self
            .raw_backups()?
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect())
    }

    /// Snapshot the currently stored document of `mode`.
    pub fn create_backup(&self, mode: Mode, label: impl Into<String>) -> Result<BackupEntry> {
        let snapshot = self.load_config(mode)?;
        let entry = BackupEntry {
            id: format!("backup-{}", Uuid::now_v7()),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            mode,
            label: label.into(),
            snapshot,
        };

        let mut backups = self.raw_backups()?;
        backups.insert(0, serde_json::to_value(&entry)?);
        backups.truncate(self.options.backup_limit);
        self.write(&self.options.backups_key, &backups)?;
        Ok(entry)
    }

    /// Remove the backup with `id`; unknown ids are ignored.
    pub fn delete_backup(&self, id: &str) -> Result<()> {
        let mut backups = self.raw_backups()?;
        backups.retain(|entry| entry.get("id").and_then(Value::as_str) != Some(id));
        self.write(&self.options.backups_key, &backups)
    }

    /// Save the snapshot of backup `id` into the slot of `mode`, which may
    /// differ from the slot it was taken from.
    pub fn restore_backup(&self, id: &str, mode: Mode) -> Result<()> {
        let entry = self
            .list_backups()?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| StoreError::BackupNotFound { id: id.to_string() })?;
        self.save_config(&entry.snapshot, mode)
    }

    /// Stored list as written. Rewrites go through this so entries this
    /// build cannot decode are carried along untouched.
    fn raw_backups(&self) -> Result<Vec<Value>> {
        match self.read_json(&self.options.backups_key)? {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Ok(Vec::new()),
        }
    }
}
