//! Theme preset selection and color edits.

use site_config::{DEFAULT_THEME_ID, SiteConfig, ThemePreset, default_theme};
use uuid::Uuid;

use crate::error::EditError;

/// Make preset `id` the active one.
pub fn select_theme(config: &SiteConfig, id: &str) -> Result<SiteConfig, EditError> {
    if !config.theme_presets.contains_key(id) {
        return Err(EditError::ThemeNotFound(id.to_string()));
    }
    let mut next = config.clone();
    next.active_theme_id = id.to_string();
    Ok(next)
}

/// Set one color of the active preset.
pub fn set_theme_color(config: &SiteConfig, key: &str, value: &str) -> SiteConfig {
    let mut next = config.clone();
    let id = next.active_theme_id.clone();
    next.theme_presets
        .entry(id.clone())
        .or_insert_with(|| ThemePreset {
            name: id,
            theme: Default::default(),
        })
        .theme
        .insert(key.to_string(), value.to_string());
    next
}

/// Copy the active preset into a new `custom-*` preset and activate it.
pub fn duplicate_theme(config: &SiteConfig) -> (SiteConfig, String) {
    let theme = match config.active_preset() {
        Some(preset) => preset.theme.clone(),
        None => config
            .theme_presets
            .get(DEFAULT_THEME_ID)
            .map(|preset| preset.theme.clone())
            .unwrap_or_else(default_theme),
    };
    let id = format!("custom-{}", Uuid::now_v7());

    let mut next = config.clone();
    next.theme_presets.insert(
        id.clone(),
        ThemePreset {
            name: "Custom Copy".to_string(),
            theme,
        },
    );
    next.active_theme_id = id.clone();
    (next, id)
}
