//! Editing session behavior against an in-memory origin.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use site_admin::editors::{pages, projects};
use site_admin::{AdminSession, EditError, HISTORY_LIMIT, SaveState, SessionError};
use site_config::{
    ConfigStore, DEFAULT_CHANNEL_NAME, MemoryOrigin, Mode, NoopChannel, STORAGE_KEY_DRAFT,
    SiteConfig, StorageError, StoreError,
};

fn session_on(origin: &MemoryOrigin) -> AdminSession {
    let store = ConfigStore::new(Arc::new(origin.open_tab()), Arc::new(NoopChannel));
    AdminSession::open(store, Mode::Draft).unwrap()
}

fn synced_session(origin: &MemoryOrigin) -> AdminSession {
    let store = ConfigStore::new(
        Arc::new(origin.open_tab()),
        Arc::new(origin.channel(DEFAULT_CHANNEL_NAME)),
    );
    AdminSession::open(store, Mode::Draft).unwrap()
}

fn titled(config: &SiteConfig, title: &str) -> SiteConfig {
    let mut next = config.clone();
    next.brand.site_title = title.to_string();
    next
}

fn stored_draft(origin: &MemoryOrigin) -> SiteConfig {
    serde_json::from_str(&origin.snapshot()[STORAGE_KEY_DRAFT]).unwrap()
}

#[test]
fn history_is_bounded() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);

    for n in 0..60 {
        session.set_config(titled(&session.config(), &format!("edit {n}")));
    }
    assert_eq!(session.history_depth(), (HISTORY_LIMIT, 0));

    for _ in 0..HISTORY_LIMIT {
        assert!(session.undo().unwrap());
    }
    assert_eq!(session.config().brand.site_title, "edit 9");
    assert!(!session.undo().unwrap());
    assert_eq!(session.config().brand.site_title, "edit 9");
    assert_eq!(session.history_depth(), (0, HISTORY_LIMIT));
}

#[test]
fn new_edit_after_undo_clears_redo() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);
    session.set_config(titled(&session.config(), "one"));
    session.set_config(titled(&session.config(), "two"));

    assert!(session.undo().unwrap());
    assert!(session.can_redo());

    session.set_config(titled(&session.config(), "three"));
    assert!(!session.can_redo());
    assert!(!session.redo().unwrap());
    assert_eq!(session.config().brand.site_title, "three");
}

#[test]
fn undo_and_redo_persist_without_recording() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);
    session.set_config(titled(&session.config(), "first"));
    session.save_now().unwrap();
    session.set_config(titled(&session.config(), "second"));
    assert_eq!(session.diagnostics().save_state, SaveState::Unsaved);

    assert!(session.undo().unwrap());
    assert_eq!(stored_draft(&origin).brand.site_title, "first");
    assert_eq!(session.history_depth(), (1, 1));
    assert_eq!(session.diagnostics().save_state, SaveState::Saved);

    assert!(session.redo().unwrap());
    assert_eq!(stored_draft(&origin).brand.site_title, "second");
    assert_eq!(session.history_depth(), (2, 0));
}

#[test]
fn edits_go_through_editors() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);

    assert_eq!(
        session.edit(|config| pages::delete_page(config, "home")),
        Err(EditError::HomePageProtected)
    );
    assert_eq!(session.history_depth(), (0, 0));

    session.edit(|config| Ok(projects::add_project(config))).unwrap();
    assert_eq!(session.history_depth(), (1, 0));
    assert_eq!(session.config().projects.last().unwrap().title, "Untitled");
}

#[test]
fn failed_save_keeps_working_copy() {
    let origin = MemoryOrigin::with_quota(48 * 1024);
    let session = session_on(&origin);
    session.save_now().unwrap();

    let mut huge = session.config();
    huge.media.avatar_data_url = "A".repeat(64 * 1024);
    session.set_config(huge.clone());

    let err = session.save_now().unwrap_err();
    assert!(matches!(
        err,
        SessionError::Store(StoreError::Storage(StorageError::QuotaExceeded { .. }))
    ));
    let diagnostics = session.diagnostics();
    assert_eq!(diagnostics.save_state, SaveState::Error);
    assert!(diagnostics.last_error.unwrap().contains("quota"));
    assert_eq!(session.config(), huge);
}

#[test]
fn invalid_import_changes_nothing() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);
    session.save_now().unwrap();
    let before = origin.snapshot();

    for text in ["{oops", "null", ""] {
        let err = session.import_json(text, Mode::Draft).unwrap_err();
        assert_eq!(err.to_string(), "invalid-json");
    }
    assert_eq!(origin.snapshot(), before);
    assert_eq!(session.history_depth(), (0, 0));
}

#[test]
fn import_into_own_slot_replaces_working_copy() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);

    let stored = session
        .import_json(r#"{"schemaVersion":2,"brand":{"logoText":"IMP"}}"#, Mode::Draft)
        .unwrap();
    assert_eq!(stored.brand.logo_text, "IMP");
    assert_eq!(session.config(), stored);
    assert_eq!(stored_draft(&origin), stored);

    let live = session
        .import_json(r#"{"schemaVersion":2,"brand":{"logoText":"LIVE"}}"#, Mode::Live)
        .unwrap();
    assert_eq!(live.brand.logo_text, "LIVE");
    assert_eq!(session.config().brand.logo_text, "IMP");

    let exported: SiteConfig =
        serde_json::from_str(&session.export_json(Mode::Live).unwrap()).unwrap();
    assert_eq!(exported, live);
}

#[test]
fn publish_writes_unsaved_draft_first() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);
    session.set_config(titled(&session.config(), "Ready"));

    session.publish().unwrap();
    assert_eq!(session.diagnostics().save_state, SaveState::Saved);
    assert_eq!(
        session.store().load_config(Mode::Live).unwrap().brand.site_title,
        "Ready"
    );
}

#[test]
fn restore_into_own_slot_reloads() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);
    session.set_config(titled(&session.config(), "v1"));
    session.save_now().unwrap();
    let backup = session.create_backup(Mode::Draft, "Draft").unwrap();

    session.set_config(titled(&session.config(), "v2"));
    session.save_now().unwrap();

    session.restore_backup(&backup.id, Mode::Draft).unwrap();
    assert_eq!(session.config().brand.site_title, "v1");
    assert!(matches!(
        session.restore_backup("backup-gone", Mode::Draft),
        Err(SessionError::Store(StoreError::BackupNotFound { .. }))
    ));
}

#[test]
fn reset_reseeds_draft_from_live() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);
    session
        .store()
        .save_config(&titled(&SiteConfig::default(), "Live site"), Mode::Live)
        .unwrap();
    session.set_config(titled(&session.config(), "scratch"));
    session.save_now().unwrap();

    session.reset().unwrap();
    assert_eq!(session.config().brand.site_title, "Live site");
    assert_eq!(stored_draft(&origin).brand.site_title, "Live site");
    assert_eq!(session.diagnostics().save_state, SaveState::Saved);
}

#[tokio::test(start_paused = true)]
async fn autosave_coalesces_rapid_edits() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);
    session.enable_autosave(Duration::from_millis(350));

    for n in 0..5 {
        session.set_config(titled(&session.config(), &format!("typing {n}")));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_ne!(stored_draft(&origin).brand.site_title, "typing 4");
    assert_eq!(session.diagnostics().save_state, SaveState::Unsaved);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(stored_draft(&origin).brand.site_title, "typing 4");
    let diagnostics = session.diagnostics();
    assert_eq!(diagnostics.save_state, SaveState::Saved);
    assert!(diagnostics.last_saved.is_some());
}

#[tokio::test(start_paused = true)]
async fn undo_cancels_pending_autosave() {
    let origin = MemoryOrigin::new();
    let session = session_on(&origin);
    session.enable_autosave(Duration::from_millis(350));

    session.set_config(titled(&session.config(), "doomed"));
    assert!(session.undo().unwrap());
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_ne!(stored_draft(&origin).brand.site_title, "doomed");
}

async fn wait_for(session: &AdminSession, title: &str) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while session.config().brand.site_title != title {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn sync_adopts_other_tab_without_history() {
    let origin = MemoryOrigin::new();
    let editor = synced_session(&origin);
    let viewer = synced_session(&origin);
    assert!(viewer.attach_sync());

    editor.set_config(titled(&editor.config(), "From editor"));
    editor.save_now().unwrap();

    wait_for(&viewer, "From editor").await;
    assert_eq!(viewer.diagnostics().save_state, SaveState::Synced);
    assert_eq!(viewer.history_depth(), (0, 0));

    viewer.detach_sync();
    editor.set_config(titled(&editor.config(), "Unseen"));
    editor.save_now().unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(viewer.config().brand.site_title, "From editor");
}

#[tokio::test]
async fn sync_defers_to_pending_autosave() {
    let origin = MemoryOrigin::new();
    let editor = synced_session(&origin);
    let viewer = synced_session(&origin);
    viewer.attach_sync();
    viewer.enable_autosave(Duration::from_secs(60));

    viewer.set_config(titled(&viewer.config(), "Local"));
    editor.set_config(titled(&editor.config(), "Remote"));
    editor.save_now().unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(viewer.config().brand.site_title, "Local");
    assert_eq!(viewer.diagnostics().save_state, SaveState::Unsaved);
}

#[tokio::test]
async fn sync_follows_other_tab_after_reset() {
    let origin = MemoryOrigin::new();
    let editor = synced_session(&origin);
    let viewer = synced_session(&origin);
    viewer.attach_sync();
    viewer.enable_autosave(Duration::from_millis(350));

    viewer.reset().unwrap();
    assert_eq!(viewer.diagnostics().save_state, SaveState::Saved);

    editor.set_config(titled(&editor.config(), "Other tab"));
    editor.save_now().unwrap();
    wait_for(&viewer, "Other tab").await;

    viewer.publish().unwrap();
    assert_eq!(stored_draft(&origin).brand.site_title, "Other tab");
    assert_eq!(
        viewer.store().load_config(Mode::Live).unwrap().brand.site_title,
        "Other tab"
    );
}

#[tokio::test]
async fn unsaved_edits_without_autosave_yield_to_other_tab() {
    let origin = MemoryOrigin::new();
    let editor = synced_session(&origin);
    let viewer = synced_session(&origin);
    viewer.attach_sync();

    viewer.set_config(titled(&viewer.config(), "Stale local"));
    editor.set_config(titled(&editor.config(), "Newer remote"));
    editor.save_now().unwrap();

    wait_for(&viewer, "Newer remote").await;
    assert_eq!(viewer.diagnostics().save_state, SaveState::Synced);

    viewer.publish().unwrap();
    assert_eq!(stored_draft(&origin).brand.site_title, "Newer remote");
}

#[tokio::test]
async fn own_saves_do_not_revert_later_edits() {
    let origin = MemoryOrigin::new();
    let session = synced_session(&origin);
    session.attach_sync();

    session.set_config(titled(&session.config(), "saved"));
    session.save_now().unwrap();
    session.set_config(titled(&session.config(), "typed after save"));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(session.config().brand.site_title, "typed after save");
    assert_eq!(session.diagnostics().save_state, SaveState::Unsaved);
}
