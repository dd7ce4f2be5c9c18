//! Versioned configuration store for a static site builder.
//!
//! The whole site (brand, pages, menu, theme presets, media, projects) is one
//! JSON document kept in same-origin key-value storage under two slots:
//! `draft`, edited by the admin, and `live`, read by the public renderer.
//!
//! The crate is organized into several modules:
//!
//! - `schema` / `defaults` - typed document and its default value
//! - `migrate` - total upgrade of any stored JSON to the current schema
//! - `storage` - key-value backends (in-memory origin with tabs, directory)
//! - `channel` - cross-tab change notifications
//! - `store` - load/save/reset/publish over the two slots
//! - `backup` - labeled snapshots, newest first, capped
//! - `subscription` - reload-on-change listeners
//! - `theme` - active theme resolution and CSS variables
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use site_config::{ConfigStore, MemoryOrigin, Mode};
//!
//! let origin = MemoryOrigin::new();
//! let store = ConfigStore::new(Arc::new(origin.open_tab()), Arc::new(origin.channel("site-config")));
//!
//! let mut draft = store.load_config(Mode::Draft)?;
//! draft.brand.site_title = "Portfolio".to_string();
//! store.save_config(&draft, Mode::Draft)?;
//! store.publish_draft()?;
//! # Ok::<(), site_config::StoreError>(())
//! ```

pub mod backup;
pub mod channel;
pub mod defaults;
pub mod error;
pub mod migrate;
pub mod schema;
pub mod storage;
pub mod store;
pub mod subscription;
pub mod theme;

pub use backup::BackupEntry;
pub use channel::{
    Broadcaster, ChangeChannel, ChangeKind, ChangeListener, ChangeMessage, DEFAULT_CHANNEL_NAME,
    LocalChannel, NoopChannel, Posted,
};
pub use defaults::{builtin_theme_presets, default_theme};
pub use error::{ChannelError, Result, StorageError, StoreError};
pub use migrate::{MIGRATED_THEME_ID, migrate_config, normalize};
pub use schema::*;
pub use storage::{
    FileStorage, KeyValueStorage, MemoryOrigin, MemoryStorage, StorageEvent, StorageEvents,
    StorageResult, TabId,
};
pub use store::{
    ConfigStore, DEFAULT_BACKUP_LIMIT, LEGACY_STORAGE_KEYS, Mode, ParseModeError, STORAGE_KEY_BACKUPS,
    STORAGE_KEY_DRAFT, STORAGE_KEY_LIVE, StoreOptions,
};
pub use subscription::Subscription;
pub use theme::{StyleSink, active_theme, apply_theme, css_variables};
