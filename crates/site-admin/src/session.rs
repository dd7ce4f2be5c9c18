//! Admin editing session over one document slot.
//!
//! The session owns the working copy, its undo history and the save status
//! shown to the user. Edits arrive through [`AdminSession::set_config`] and
//! are written by [`AdminSession::save_now`] or by the debounced autosave.
//! Documents adopted from another tab or replayed by undo/redo never enter
//! the history.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use site_config::{BackupEntry, ConfigStore, Mode, SiteConfig, StoreError, Subscription, migrate_config};
use tracing::{debug, info, warn};

use crate::autosave::Debouncer;
use crate::error::{EditError, Result, SessionError};
use crate::history::History;

/// Save status of the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum SaveState {
    /// Nothing loaded yet
    #[default]
    Idle,
    /// Edited since the last write
    Unsaved,
    Saving,
    Saved,
    /// Replaced by a change from another tab
    Synced,
    /// The last write failed; see `last_error`
    Error,
}

/// Status panel of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub mode: Mode,
    pub storage_key: String,
    pub save_state: SaveState,
    /// RFC 3339 time of the last successful write
    pub last_saved: Option<String>,
    pub last_error: Option<String>,
}

/// Where a new working copy came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeOrigin {
    /// Another tab, an import or a restore
    Remote,
    /// Undo or redo
    Replay,
}

struct SessionState {
    config: SiteConfig,
    history: History<SiteConfig>,
    diagnostics: Diagnostics,
}

struct Shared {
    store: ConfigStore,
    mode: Mode,
    state: Mutex<SessionState>,
    autosave: Mutex<Option<Debouncer>>,
    sync: Mutex<Option<Subscription>>,
}

/// Shared handle onto an editing session. Clones refer to the same session.
#[derive(Clone)]
pub struct AdminSession {
    shared: Arc<Shared>,
}

impl AdminSession {
    /// Load the document of `mode` and start editing it.
    pub fn open(store: ConfigStore, mode: Mode) -> Result<Self> {
        let config = store.load_config(mode)?;
        let diagnostics = Diagnostics {
            mode,
            storage_key: store.storage_key(mode).to_string(),
            save_state: SaveState::Saved,
            last_saved: None,
            last_error: None,
        };
        debug!(%mode, key = %diagnostics.storage_key, "admin session opened");

        Ok(Self {
            shared: Arc::new(Shared {
                store,
                mode,
                state: Mutex::new(SessionState {
                    config,
                    history: History::new(),
                    diagnostics,
                }),
                autosave: Mutex::new(None),
                sync: Mutex::new(None),
            }),
        })
    }

    pub fn mode(&self) -> Mode {
        self.shared.mode
    }

    pub fn store(&self) -> &ConfigStore {
        &self.shared.store
    }

    /// Copy of the working document.
    pub fn config(&self) -> SiteConfig {
        self.shared.state.lock().config.clone()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.shared.state.lock().diagnostics.clone()
    }

    pub fn can_undo(&self) -> bool {
        self.shared.state.lock().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.shared.state.lock().history.can_redo()
    }

    /// Undo and redo depth.
    pub fn history_depth(&self) -> (usize, usize) {
        self.shared.state.lock().history.depth()
    }

    /// Adopt a user edit: the previous document is pushed onto the undo
    /// stack, redo is cleared, and an autosave is scheduled.
    pub fn set_config(&self, next: SiteConfig) {
        {
            let mut guard = self.shared.state.lock();
            let state = &mut *guard;
            let previous = std::mem::replace(&mut state.config, next);
            state.history.record(previous);
            state.diagnostics.save_state = SaveState::Unsaved;
        }
        self.schedule_autosave();
    }

    /// Apply an editor function to the working document as one user edit.
    /// `edit` must not call back into the session.
    pub fn edit<F>(&self, edit: F) -> std::result::Result<(), EditError>
    where
        F: FnOnce(&SiteConfig) -> std::result::Result<SiteConfig, EditError>,
    {
        {
            let mut guard = self.shared.state.lock();
            let state = &mut *guard;
            let next = edit(&state.config)?;
            let previous = std::mem::replace(&mut state.config, next);
            state.history.record(previous);
            state.diagnostics.save_state = SaveState::Unsaved;
        }
        self.schedule_autosave();
        Ok(())
    }

    /// Step back one edit and write the result. Returns `false` when there
    /// is nothing to undo.
    pub fn undo(&self) -> Result<bool> {
        self.replay(|history, current| history.undo(current))
    }

    /// Step forward one undone edit and write the result.
    pub fn redo(&self) -> Result<bool> {
        self.replay(|history, current| history.redo(current))
    }

    fn replay<F>(&self, step: F) -> Result<bool>
    where
        F: FnOnce(&mut History<SiteConfig>, &SiteConfig) -> Option<SiteConfig>,
    {
        // A pending autosave would write the document being replaced.
        self.cancel_autosave();

        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        let Some(next) = step(&mut state.history, &state.config) else {
            return Ok(false);
        };
        self.adopt(state, next, ChangeOrigin::Replay);
        self.write(state)?;
        Ok(true)
    }

    /// Adopt a document written by another tab. Ignored only while an
    /// autosave is pending, since that write lands last and wins. Without
    /// one, unsaved local edits give way to the stored copy.
    pub fn apply_remote(&self, next: SiteConfig) {
        if self.autosave_pending() {
            debug!("remote change ignored, autosave pending");
            return;
        }
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        if state.config == next {
            return;
        }
        self.adopt(state, next, ChangeOrigin::Remote);
        state.diagnostics.last_error = None;
        state.diagnostics.save_state = SaveState::Synced;
        debug!(key = %state.diagnostics.storage_key, "updated from another tab");
    }

    /// Write the working document now, cancelling any pending autosave.
    pub fn save_now(&self) -> Result<()> {
        self.cancel_autosave();
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let mut guard = self.shared.state.lock();
        self.write(&mut guard)
    }

    /// Clear the slot and reload it (a cleared draft is reseeded from live).
    /// The working copy then matches the slot, so nothing is left to save.
    pub fn reset(&self) -> Result<()> {
        self.cancel_autosave();
        let store = &self.shared.store;
        store.reset_config(self.shared.mode)?;
        let config = store.load_config(self.shared.mode)?;

        let mut state = self.shared.state.lock();
        state.config = config;
        state.diagnostics.last_error = None;
        state.diagnostics.save_state = SaveState::Saved;
        info!(mode = %self.shared.mode, "reset to defaults");
        Ok(())
    }

    /// Copy the stored draft over live. Unsaved draft edits are written first.
    pub fn publish(&self) -> Result<()> {
        if self.shared.mode == Mode::Draft
            && self.diagnostics().save_state == SaveState::Unsaved
        {
            self.save_now()?;
        }
        self.shared.store.publish_draft()?;
        info!("published draft to live");
        Ok(())
    }

    pub fn create_backup(&self, mode: Mode, label: &str) -> Result<BackupEntry> {
        let entry = self.shared.store.create_backup(mode, label)?;
        info!(id = %entry.id, %mode, label, "backup created");
        Ok(entry)
    }

    /// Restore backup `id` into the slot of `mode`. Restoring into this
    /// session's slot also replaces the working document.
    pub fn restore_backup(&self, id: &str, mode: Mode) -> Result<()> {
        self.shared.store.restore_backup(id, mode)?;
        info!(id, %mode, "backup restored");
        if mode == self.shared.mode {
            self.cancel_autosave();
            let config = self.shared.store.load_config(mode)?;
            let mut guard = self.shared.state.lock();
            self.adopt(&mut guard, config, ChangeOrigin::Remote);
            guard.diagnostics.save_state = SaveState::Saved;
        }
        Ok(())
    }

    /// Store JSON text into the slot of `mode`. Text that does not parse, or
    /// parses to an empty value, fails with `invalid-json` and changes nothing.
    pub fn import_json(&self, text: &str, mode: Mode) -> Result<SiteConfig> {
        let raw = parse_json(text)?;
        let stored = self.shared.store.save_value(&raw, mode)?;
        info!(%mode, "imported configuration");
        if mode == self.shared.mode {
            self.cancel_autosave();
            let mut guard = self.shared.state.lock();
            self.adopt(&mut guard, stored.clone(), ChangeOrigin::Remote);
            guard.diagnostics.save_state = SaveState::Saved;
        }
        Ok(stored)
    }

    /// Replace the working document with JSON text as a user edit.
    pub fn apply_json(&self, text: &str) -> Result<()> {
        let raw = parse_json(text)?;
        self.set_config(migrate_config(&raw));
        Ok(())
    }

    /// Pretty JSON of the document stored in the slot of `mode`.
    pub fn export_json(&self, mode: Mode) -> Result<String> {
        let config = self.shared.store.load_config(mode)?;
        to_pretty_json(&config)
    }

    /// Pretty JSON of the working document.
    pub fn current_json(&self) -> Result<String> {
        to_pretty_json(&self.config())
    }

    /// Follow changes made by other tabs. Replaces an earlier subscription.
    pub fn attach_sync(&self) -> bool {
        let weak = Arc::downgrade(&self.shared);
        let subscription = self.shared.store.subscribe(self.shared.mode, move |config| {
            if let Some(session) = upgrade(&weak) {
                session.apply_remote(config);
            }
        });
        let active = subscription.is_active();
        *self.shared.sync.lock() = Some(subscription);
        active
    }

    pub fn detach_sync(&self) {
        if let Some(subscription) = self.shared.sync.lock().take() {
            subscription.unsubscribe();
        }
    }

    /// Write the working document `delay` after the last edit.
    pub fn enable_autosave(&self, delay: Duration) {
        *self.shared.autosave.lock() = Some(Debouncer::new(delay));
    }

    pub fn disable_autosave(&self) {
        self.shared.autosave.lock().take();
    }

    fn schedule_autosave(&self) {
        let weak = Arc::downgrade(&self.shared);
        let autosave = self.shared.autosave.lock();
        let Some(debouncer) = autosave.as_ref() else {
            return;
        };
        debouncer.schedule(async move {
            let Some(session) = upgrade(&weak) else {
                return;
            };
            match session.flush() {
                Ok(()) => debug!("autosaved"),
                Err(err) => debug!(%err, "autosave failed"),
            }
        });
    }

    fn autosave_pending(&self) -> bool {
        self.shared
            .autosave
            .lock()
            .as_ref()
            .is_some_and(Debouncer::is_pending)
    }

    fn cancel_autosave(&self) {
        if let Some(debouncer) = self.shared.autosave.lock().as_ref() {
            debouncer.cancel();
        }
    }

    fn adopt(&self, state: &mut SessionState, next: SiteConfig, origin: ChangeOrigin) {
        debug!(?origin, "working copy replaced");
        state.config = next;
    }

    fn write(&self, state: &mut SessionState) -> Result<()> {
        state.diagnostics.save_state = SaveState::Saving;
        match self.shared.store.save_config(&state.config, self.shared.mode) {
            Ok(()) => {
                state.diagnostics.last_saved =
                    Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
                state.diagnostics.last_error = None;
                state.diagnostics.save_state = SaveState::Saved;
                Ok(())
            }
            Err(err) => {
                warn!(%err, key = %state.diagnostics.storage_key, "save failed");
                state.diagnostics.last_error = Some(err.to_string());
                state.diagnostics.save_state = SaveState::Error;
                Err(err.into())
            }
        }
    }
}

fn upgrade(weak: &Weak<Shared>) -> Option<AdminSession> {
    weak.upgrade().map(|shared| AdminSession { shared })
}

/// Parse user supplied JSON. `null`, `false`, `0` and `""` carry no document
/// and are rejected like unparsable text.
fn parse_json(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).map_err(|_| SessionError::InvalidJson)?;
    let empty = match &value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    if empty {
        return Err(SessionError::InvalidJson);
    }
    Ok(value)
}

fn to_pretty_json(config: &SiteConfig) -> Result<String> {
    serde_json::to_string_pretty(config).map_err(|err| StoreError::from(err).into())
}
