//! Persistence store: two document slots (`draft`, `live`) and the legacy
//! fallback, all in one [`KeyValueStorage`].
//!
//! Consistency across tabs is last-writer-wins. Every mutation is announced
//! on the change channel; listeners reload instead of applying deltas.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::channel::{Broadcaster, ChangeChannel, ChangeKind, ChangeMessage, DEFAULT_CHANNEL_NAME};
use crate::error::{Result, StorageError, StoreError};
use crate::migrate::migrate_config;
use crate::schema::SiteConfig;
use crate::storage::KeyValueStorage;

pub const STORAGE_KEY_LIVE: &str = "siteConfig.v2";
pub const STORAGE_KEY_DRAFT: &str = "siteConfig.v2.draft";
pub const STORAGE_KEY_BACKUPS: &str = "siteConfig.v2.backups";
pub const LEGACY_STORAGE_KEYS: [&str; 1] = ["siteConfig.v1"];
pub const DEFAULT_BACKUP_LIMIT: usize = 30;

/// Which document slot an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Working copy edited by the admin
    #[default]
    Draft,
    /// Published copy read by the public renderer
    Live,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode {0:?} (expected draft or live)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "live" => Ok(Self::Live),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Storage layout and limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreOptions {
    pub live_key: String,
    pub draft_key: String,
    pub backups_key: String,
    /// Older keys consulted, in order, when the live slot is empty
    pub legacy_keys: Vec<String>,
    pub channel_name: String,
    pub backup_limit: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            live_key: STORAGE_KEY_LIVE.to_string(),
            draft_key: STORAGE_KEY_DRAFT.to_string(),
            backups_key: STORAGE_KEY_BACKUPS.to_string(),
            legacy_keys: LEGACY_STORAGE_KEYS.iter().map(|k| k.to_string()).collect(),
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            backup_limit: DEFAULT_BACKUP_LIMIT,
        }
    }
}

impl StoreOptions {
    /// Read options from a JSON file; absent fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(StorageError::Io)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn key(&self, mode: Mode) -> &str {
        match mode {
            Mode::Draft => &self.draft_key,
            Mode::Live => &self.live_key,
        }
    }
}

/// Handle onto the configuration slots of one origin. Cheap to clone; every
/// clone shares the storage and channel.
#[derive(Clone)]
pub struct ConfigStore {
    pub(crate) storage: Arc<dyn KeyValueStorage>,
    pub(crate) broadcaster: Broadcaster,
    pub(crate) options: Arc<StoreOptions>,
}

impl ConfigStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, channel: Arc<dyn ChangeChannel>) -> Self {
        Self::with_options(storage, channel, StoreOptions::default())
    }

    pub fn with_options(
        storage: Arc<dyn KeyValueStorage>,
        channel: Arc<dyn ChangeChannel>,
        options: StoreOptions,
    ) -> Self {
        Self {
            storage,
            broadcaster: Broadcaster::new(channel),
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn storage_key(&self, mode: Mode) -> &str {
        self.options.key(mode)
    }

    /// Load the document of `mode`.
    ///
    /// An empty draft slot is seeded with a copy of live. An empty live slot
    /// falls back to the first parsable legacy key, which is migrated and
    /// written into live. With nothing stored anywhere the defaults are
    /// returned.
    pub fn load_config(&self, mode: Mode) -> Result<SiteConfig> {
        let key = self.storage_key(mode);
        if let Some(raw) = self.read_json(key)? {
            return Ok(migrate_config(&raw));
        }

        match mode {
            Mode::Draft => {
                let live = self.load_config(Mode::Live)?;
                self.write(key, &live)?;
                Ok(live)
            }
            Mode::Live => {
                for legacy in &self.options.legacy_keys {
                    if let Some(raw) = self.read_json(legacy)? {
                        let migrated = migrate_config(&raw);
                        self.write(key, &migrated)?;
                        return Ok(migrated);
                    }
                }
                Ok(SiteConfig::default())
            }
        }
    }

    /// Migrate `config` and write it into the slot of `mode`.
    pub fn save_config(&self, config: &SiteConfig, mode: Mode) -> Result<()> {
        self.save_value(&serde_json::to_value(config)?, mode)
            .map(|_| ())
    }

    /// Migrate arbitrary JSON (an import, a restored snapshot) and write it
    /// into the slot of `mode`. Returns the document actually stored.
    pub fn save_value(&self, raw: &Value, mode: Mode) -> Result<SiteConfig> {
        let key = self.storage_key(mode);
        let migrated = migrate_config(raw);
        self.write(key, &migrated)?;
        self.broadcaster
            .broadcast(ChangeMessage::new(ChangeKind::ConfigUpdated, key));
        Ok(migrated)
    }

    /// Clear the slot of `mode`. Clearing live also clears the legacy keys.
    pub fn reset_config(&self, mode: Mode) -> Result<()> {
        let key = self.storage_key(mode);
        self.storage.remove_item(key)?;
        if mode == Mode::Live {
            for legacy in &self.options.legacy_keys {
                self.storage.remove_item(legacy)?;
            }
        }
        self.broadcaster
            .broadcast(ChangeMessage::new(ChangeKind::ConfigReset, key));
        Ok(())
    }

    /// Copy draft over live. Draft is left untouched and the previous live
    /// document is not backed up.
    pub fn publish_draft(&self) -> Result<()> {
        let draft = self.load_config(Mode::Draft)?;
        self.save_config(&draft, Mode::Live)?;
        self.broadcaster.broadcast(ChangeMessage::new(
            ChangeKind::ConfigPublished,
            self.storage_key(Mode::Live),
        ));
        Ok(())
    }

    /// Stored JSON under `key`. Unparsable or falsy content reads as absent.
    pub(crate) fn read_json(&self, key: &str) -> Result<Option<Value>> {
        let Some(raw) = self.storage.get_item(key)? else {
            return Ok(None);
        };
        Ok(serde_json::from_str::<Value>(&raw)
            .ok()
            .filter(is_truthy))
    }

    pub(crate) fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.storage.set_item(key, &encoded).map_err(StoreError::from)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::NoopChannel;
    use crate::storage::MemoryOrigin;
    use serde_json::json;

    fn store() -> (MemoryOrigin, ConfigStore) {
        let origin = MemoryOrigin::new();
        let store = ConfigStore::new(Arc::new(origin.open_tab()), Arc::new(NoopChannel));
        (origin, store)
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Draft".parse::<Mode>(), Ok(Mode::Draft));
        assert_eq!(" live ".parse::<Mode>(), Ok(Mode::Live));
        assert!("staging".parse::<Mode>().is_err());
        assert_eq!(Mode::Live.to_string(), "live");
    }

    #[test]
    fn options_fill_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"liveKey":"site.live","backupLimit":5}"#).unwrap();

        let options = StoreOptions::load(&path).unwrap();
        assert_eq!(options.key(Mode::Live), "site.live");
        assert_eq!(options.key(Mode::Draft), STORAGE_KEY_DRAFT);
        assert_eq!(options.backup_limit, 5);
        assert_eq!(options.legacy_keys, vec!["siteConfig.v1".to_string()]);
    }

    #[test]
    fn empty_storage_loads_defaults_without_writing_live() {
        let (origin, store) = store();
        assert_eq!(store.load_config(Mode::Live).unwrap(), SiteConfig::default());
        assert!(origin.snapshot().is_empty());
    }

    #[test]
    fn unparsable_and_falsy_slots_read_as_absent() {
        let (origin, store) = store();
        let tab = origin.open_tab();
        tab.set_item(STORAGE_KEY_LIVE, "{not json").unwrap();
        assert_eq!(store.load_config(Mode::Live).unwrap(), SiteConfig::default());

        tab.set_item(STORAGE_KEY_LIVE, "null").unwrap();
        tab.set_item("siteConfig.v1", r#"{"brand":{"logoText":"V1"}}"#).unwrap();
        assert_eq!(store.load_config(Mode::Live).unwrap().brand.logo_text, "V1");
    }

    #[test]
    fn saving_repairs_malformed_input() {
        let (origin, store) = store();
        let stored = store
            .save_value(&json!({"schemaVersion": 2, "brand": "oops", "activeThemeId": "ghost"}), Mode::Live)
            .unwrap();

        assert_eq!(stored.brand, SiteConfig::default().brand);
        assert_eq!(stored.active_theme_id, "default");
        let raw = origin.snapshot().remove(STORAGE_KEY_LIVE).unwrap();
        let reread: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(reread["brand"]["logoText"], "CM");
    }

    #[test]
    fn reset_live_clears_legacy_keys_too() {
        let (origin, store) = store();
        let tab = origin.open_tab();
        tab.set_item("siteConfig.v1", "{}").unwrap();
        store.save_config(&SiteConfig::default(), Mode::Live).unwrap();
        store.save_config(&SiteConfig::default(), Mode::Draft).unwrap();

        store.reset_config(Mode::Draft).unwrap();
        assert!(origin.snapshot().contains_key("siteConfig.v1"));

        store.reset_config(Mode::Live).unwrap();
        assert!(origin.snapshot().is_empty());
    }
}
