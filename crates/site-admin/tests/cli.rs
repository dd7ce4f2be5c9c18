use std::path::Path;

use clap::Parser;
use pretty_assertions::assert_eq;
use site_admin::cli::{Cli, open_store, run};
use site_config::{CURRENT_SCHEMA_VERSION, MIGRATED_THEME_ID, Mode, SiteConfig};

async fn site_admin(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    let store_dir = dir.to_string_lossy().into_owned();
    let argv = ["site-admin", "--store-dir", store_dir.as_str()]
        .into_iter()
        .chain(args.iter().copied());
    run(Cli::try_parse_from(argv)?).await
}

fn draft(dir: &Path) -> SiteConfig {
    open_store(dir, None).unwrap().load_config(Mode::Draft).unwrap()
}

#[tokio::test]
async fn page_add_then_delete() {
    let dir = tempfile::tempdir().unwrap();
    site_admin(dir.path(), &["page", "add", "About Us"]).await.unwrap();

    let config = draft(dir.path());
    let page = config.page_by_slug("about-us").unwrap().clone();
    assert_eq!(page.title, "About Us");

    let err = site_admin(dir.path(), &["page", "delete", "home"]).await.unwrap_err();
    assert_eq!(err.to_string(), "home-page-protected");

    site_admin(dir.path(), &["page", "delete", &page.id]).await.unwrap();
    assert!(draft(dir.path()).page(&page.id).is_none());
}

#[tokio::test]
async fn backups_and_publish() {
    let dir = tempfile::tempdir().unwrap();
    site_admin(dir.path(), &["theme", "noir"]).await.unwrap();
    site_admin(dir.path(), &["backup", "create"]).await.unwrap();
    site_admin(dir.path(), &["backup", "list"]).await.unwrap();

    let store = open_store(dir.path(), None).unwrap();
    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].label, "Draft");
    assert_eq!(backups[0].snapshot.active_theme_id, "noir");

    site_admin(dir.path(), &["publish"]).await.unwrap();
    assert_eq!(store.load_config(Mode::Live).unwrap().active_theme_id, "noir");

    site_admin(dir.path(), &["theme", "aurora"]).await.unwrap();
    site_admin(dir.path(), &["backup", "restore", &backups[0].id])
        .await
        .unwrap();
    assert_eq!(draft(dir.path()).active_theme_id, "noir");

    let err = site_admin(dir.path(), &["backup", "restore", "backup-missing"])
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("backup-not-found"));
}

#[tokio::test]
async fn theme_colors_and_unknown_preset() {
    let dir = tempfile::tempdir().unwrap();
    site_admin(dir.path(), &["theme", "--set", "electric=#ff00ff"])
        .await
        .unwrap();
    let config = draft(dir.path());
    assert_eq!(
        config.theme_presets[&config.active_theme_id].theme["electric"],
        "#ff00ff"
    );

    assert!(site_admin(dir.path(), &["theme", "--set", "nonsense"]).await.is_err());
    assert!(site_admin(dir.path(), &["theme", "ghost"]).await.is_err());
}

#[tokio::test]
async fn import_export_roundtrip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    std::fs::write(&input, r#"{"schemaVersion":2,"brand":{"siteTitle":"Imported"}}"#).unwrap();

    let store_dir = dir.path().join("store");
    site_admin(&store_dir, &["import", input.to_str().unwrap(), "--mode", "live"])
        .await
        .unwrap();
    site_admin(&store_dir, &["export", "--mode", "live", "-o", output.to_str().unwrap()])
        .await
        .unwrap();

    let exported: SiteConfig =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(exported.brand.site_title, "Imported");

    std::fs::write(&input, "null").unwrap();
    let err = site_admin(&store_dir, &["import", input.to_str().unwrap()])
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("invalid-json"));
}

#[tokio::test]
async fn migrate_runs_without_a_store() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = dir.path().join("legacy.json");
    let output = dir.path().join("migrated.json");
    std::fs::write(
        &legacy,
        r##"{"brand":{"logoText":"OLD"},"theme":{"electric":"#abcdef"}}"##,
    )
    .unwrap();

    let store_dir = dir.path().join("never-created");
    site_admin(
        &store_dir,
        &["migrate", legacy.to_str().unwrap(), "-o", output.to_str().unwrap()],
    )
    .await
    .unwrap();
    assert!(!store_dir.exists());

    let migrated: SiteConfig =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(migrated.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(migrated.brand.logo_text, "OLD");
    assert_eq!(migrated.active_theme_id, MIGRATED_THEME_ID);
}

#[tokio::test]
async fn media_upload_sets_logo() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("logo.png");
    std::fs::write(&file, [0x89, b'P', b'N', b'G']).unwrap();

    let store_dir = dir.path().join("store");
    site_admin(&store_dir, &["media", "add", file.to_str().unwrap(), "--logo"])
        .await
        .unwrap();

    let config = draft(&store_dir);
    assert_eq!(config.media_library.len(), 1);
    assert_eq!(config.media_library[0].mime_type, "image/png");
    assert_eq!(config.media.logo_data_url, config.media_library[0].data_url);
}

#[tokio::test]
async fn seo_points_at_library_assets() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("card.png");
    std::fs::write(&file, [0x89, b'P', b'N', b'G']).unwrap();
    let store_dir = dir.path().join("store");
    site_admin(&store_dir, &["media", "add", file.to_str().unwrap()])
        .await
        .unwrap();
    let asset_id = draft(&store_dir).media_library[0].id.clone();

    site_admin(
        &store_dir,
        &["seo", "--title", "Portfolio", "--og-image", &asset_id],
    )
    .await
    .unwrap();
    let config = draft(&store_dir);
    assert_eq!(config.seo.meta_title, "Portfolio");
    assert_eq!(config.seo.og_image_asset_id, asset_id);

    let err = site_admin(&store_dir, &["seo", "--favicon", "asset-missing"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("asset-missing"));

    site_admin(&store_dir, &["seo", "--og-image", ""]).await.unwrap();
    assert!(draft(&store_dir).seo.og_image_asset_id.is_empty());
}
