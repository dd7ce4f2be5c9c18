//! `site-admin` command line over a directory-backed store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use site_config::{ConfigStore, FileStorage, Mode, NoopChannel, SiteConfig, StoreOptions, migrate_config};

use crate::editors::seo::{SeoAsset, SeoUpdate};
use crate::editors::{layout, media, pages, seo, theme};
use crate::session::AdminSession;

#[derive(Parser, Debug)]
#[command(
    name = "site-admin",
    about = "Edit, publish and back up a site configuration store",
    version
)]
pub struct Cli {
    /// Directory holding the store (one JSON file per key)
    #[arg(long, env = "SITE_CONFIG_DIR", default_value = ".site-config", global = true)]
    pub store_dir: PathBuf,

    /// JSON file overriding storage keys and the backup limit
    #[arg(long, global = true)]
    pub options: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize a slot, or print it as JSON
    Show {
        #[arg(long, default_value = "draft")]
        mode: Mode,
        #[arg(long)]
        json: bool,
    },

    /// Import a JSON document into a slot
    Import {
        file: PathBuf,
        #[arg(long, default_value = "draft")]
        mode: Mode,
    },

    /// Export a slot as JSON
    Export {
        #[arg(long, default_value = "draft")]
        mode: Mode,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear a slot (clearing live also clears legacy keys)
    Reset {
        #[arg(long, default_value = "draft")]
        mode: Mode,
    },

    /// Copy draft over live
    Publish,

    /// Upgrade a JSON file to the current schema without touching the store
    Migrate {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List theme presets, or select one and set colors
    Theme {
        /// Preset to activate
        id: Option<String>,
        /// Color of the active preset, as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        colors: Vec<String>,
        #[arg(long, default_value = "draft")]
        mode: Mode,
    },

    /// Set search and social metadata
    Seo {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Media asset id of the Open Graph image ("" clears it)
        #[arg(long)]
        og_image: Option<String>,
        /// Media asset id of the favicon ("" clears it)
        #[arg(long)]
        favicon: Option<String>,
        #[arg(long, default_value = "draft")]
        mode: Mode,
    },

    /// Manage backups
    Backup {
        #[command(subcommand)]
        command: BackupCommand,
    },

    /// Add or delete pages
    Page {
        #[command(subcommand)]
        command: PageCommand,
    },

    /// Manage the media library
    Media {
        #[command(subcommand)]
        command: MediaCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// List backups, newest first
    List,
    /// Snapshot a slot
    Create {
        #[arg(long, default_value = "draft")]
        mode: Mode,
        #[arg(long, default_value = "")]
        label: String,
    },
    /// Delete a backup
    Delete { id: String },
    /// Restore a backup into a slot
    Restore {
        id: String,
        #[arg(long, default_value = "draft")]
        mode: Mode,
    },
}

#[derive(Subcommand, Debug)]
pub enum PageCommand {
    /// Add a block page
    Add {
        title: String,
        #[arg(long, default_value = "draft")]
        mode: Mode,
    },
    /// Delete a page (the home page is protected)
    Delete {
        id: String,
        #[arg(long, default_value = "draft")]
        mode: Mode,
    },
}

#[derive(Subcommand, Debug)]
pub enum MediaCommand {
    /// Upload a file into the library
    Add {
        path: PathBuf,
        #[arg(long, default_value = "draft")]
        mode: Mode,
        /// Also use the file as the site logo
        #[arg(long)]
        logo: bool,
        /// Also use the file as the avatar
        #[arg(long)]
        avatar: bool,
    },
}

/// Store over `dir`, with options from `options` when given.
pub fn open_store(dir: &Path, options: Option<&Path>) -> anyhow::Result<ConfigStore> {
    let storage = FileStorage::open(dir)
        .with_context(|| format!("failed to open store at {}", dir.display()))?;
    let options = match options {
        Some(path) => StoreOptions::load(path)
            .with_context(|| format!("failed to read options from {}", path.display()))?,
        None => StoreOptions::default(),
    };
    Ok(ConfigStore::with_options(
        Arc::new(storage),
        Arc::new(NoopChannel),
        options,
    ))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = || open_store(&cli.store_dir, cli.options.as_deref());
    match cli.command {
        Command::Show { mode, json } => {
            let session = AdminSession::open(store()?, mode)?;
            if json {
                println!("{}", session.current_json()?);
            } else {
                print_summary(mode, &session.config());
            }
        }
        Command::Import { file, mode } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let session = AdminSession::open(store()?, mode)?;
            session
                .import_json(&text, mode)
                .with_context(|| format!("failed to import {}", file.display()))?;
            println!("Imported into {mode}.");
        }
        Command::Export { mode, output } => {
            let session = AdminSession::open(store()?, mode)?;
            emit(&session.export_json(mode)?, output.as_deref())?;
        }
        Command::Reset { mode } => {
            let session = AdminSession::open(store()?, mode)?;
            session.reset()?;
            println!("Reset {mode} to defaults.");
        }
        Command::Publish => {
            AdminSession::open(store()?, Mode::Draft)?.publish()?;
            println!("Published to live.");
        }
        Command::Migrate { file, output } => {
            // Offline: the store directory is never created.
            let raw = read_json_file(&file)?;
            let migrated = serde_json::to_string_pretty(&migrate_config(&raw))?;
            emit(&migrated, output.as_deref())?;
        }
        Command::Theme { id, colors, mode } => {
            let session = AdminSession::open(store()?, mode)?;
            if id.is_none() && colors.is_empty() {
                print_themes(&session.config());
                return Ok(());
            }
            if let Some(id) = id {
                session.edit(|config| theme::select_theme(config, &id))?;
            }
            for pair in &colors {
                let Some((key, value)) = pair.split_once('=') else {
                    bail!("expected KEY=VALUE, got {pair:?}");
                };
                session.edit(|config| Ok(theme::set_theme_color(config, key.trim(), value.trim())))?;
            }
            session.save_now()?;
            println!("Theme updated.");
        }
        Command::Seo {
            title,
            description,
            og_image,
            favicon,
            mode,
        } => {
            let session = AdminSession::open(store()?, mode)?;
            session.edit(|config| {
                let update = SeoUpdate {
                    meta_title: title,
                    meta_description: description,
                };
                let mut next = seo::set_seo(config, update);
                for (slot, id) in [(SeoAsset::OgImage, og_image), (SeoAsset::Favicon, favicon)] {
                    if let Some(id) = id {
                        let id = id.trim();
                        next = seo::set_seo_asset(&next, slot, (!id.is_empty()).then_some(id))?;
                    }
                }
                Ok(next)
            })?;
            session.save_now()?;
            println!("SEO updated.");
        }
        Command::Backup { command } => run_backup(store()?, command)?,
        Command::Page { command } => run_page(store()?, command)?,
        Command::Media { command } => run_media(store()?, command).await?,
    }
    Ok(())
}

fn run_backup(store: ConfigStore, command: BackupCommand) -> anyhow::Result<()> {
    match command {
        BackupCommand::List => {
            let backups = store.list_backups()?;
            if backups.is_empty() {
                println!("No backups.");
            }
            for entry in backups {
                println!("{}  {}  {:<5}  {}", entry.id, entry.created_at, entry.mode, entry.label);
            }
        }
        BackupCommand::Create { mode, label } => {
            let session = AdminSession::open(store, mode)?;
            let label = if label.is_empty() {
                capitalize(mode.as_str())
            } else {
                label
            };
            let entry = session.create_backup(mode, &label)?;
            println!("Created {}.", entry.id);
        }
        BackupCommand::Delete { id } => {
            store.delete_backup(&id)?;
            println!("Backup deleted.");
        }
        BackupCommand::Restore { id, mode } => {
            let session = AdminSession::open(store, mode)?;
            session
                .restore_backup(&id, mode)
                .with_context(|| format!("failed to restore {id}"))?;
            println!("Restored into {mode}.");
        }
    }
    Ok(())
}

fn run_page(store: ConfigStore, command: PageCommand) -> anyhow::Result<()> {
    match command {
        PageCommand::Add { title, mode } => {
            let session = AdminSession::open(store, mode)?;
            let mut added = String::new();
            session.edit(|config| {
                let (next, id) = pages::add_page(config, &title);
                added = id;
                Ok(next)
            })?;
            session.save_now()?;
            let config = session.config();
            let slug = config.page(&added).map(|page| page.slug.as_str()).unwrap_or_default();
            println!("Added page {added} (/{slug}).");
        }
        PageCommand::Delete { id, mode } => {
            let session = AdminSession::open(store, mode)?;
            session.edit(|config| pages::delete_page(config, &id))?;
            session.save_now()?;
            println!("Page deleted.");
        }
    }
    Ok(())
}

async fn run_media(store: ConfigStore, command: MediaCommand) -> anyhow::Result<()> {
    match command {
        MediaCommand::Add {
            path,
            mode,
            logo,
            avatar,
        } => {
            let asset = media::read_asset(&path).await?;
            if media::is_large(asset.size) {
                eprintln!("File is larger than 5MB, may affect performance.");
            }
            let id = asset.id.clone();
            let summary = format!("{} ({})", asset.name, media::format_bytes(asset.size));

            let session = AdminSession::open(store, mode)?;
            session.edit(|config| {
                let mut next = media::add_asset(config, asset);
                if logo {
                    next = media::use_as_logo(&next, &id)?;
                }
                if avatar {
                    next = media::use_as_avatar(&next, &id)?;
                }
                Ok(next)
            })?;
            session.save_now()?;
            println!("Uploaded {summary} as {id}.");
        }
    }
    Ok(())
}

fn print_summary(mode: Mode, config: &SiteConfig) {
    println!("{} [{mode}]", config.brand.site_title);
    println!("schema v{}, theme {}", config.schema_version, config.active_theme_id);

    println!("\nPages:");
    for page in &config.pages {
        println!(
            "  {:<24} /{:<20} {:?} ({} blocks)",
            page.id,
            page.slug,
            page.template,
            page.blocks.len()
        );
    }

    println!("\nMenu:");
    for item in &config.menu.primary {
        println!("  {}", item.label());
    }

    println!("\nHome sections:");
    for section in &config.home_layout.sections {
        let state = if section.enabled { "enabled" } else { "disabled" };
        println!("  {:<14} {state}", layout::section_label(&section.id));
    }

    let visible = config.projects.iter().filter(|project| !project.hidden).count();
    println!("\nProjects: {} ({visible} visible)", config.projects.len());

    let seo_image = seo::seo_asset(config, SeoAsset::OgImage).map_or("(none)", |asset| asset.name.as_str());
    println!("SEO: {:?}, image {seo_image}", config.seo.meta_title);

    println!("Media: {} assets", config.media_library.len());
    for asset in &config.media_library {
        println!(
            "  {}  {}  {} • {}",
            asset.id,
            asset.name,
            media::format_bytes(asset.size),
            asset.mime_type
        );
    }
}

fn print_themes(config: &SiteConfig) {
    for (id, preset) in &config.theme_presets {
        let marker = if *id == config.active_theme_id { "*" } else { " " };
        println!("{marker} {id:<12} {}", preset.name);
    }
}

fn read_json_file(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    // Unparsable input migrates to the default document.
    Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::Null))
}

fn emit(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
