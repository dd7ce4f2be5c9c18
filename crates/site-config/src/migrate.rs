//! Upgrades arbitrary stored JSON to the current schema.
//!
//! [`migrate_config`] is total: anything that is not a JSON object yields the
//! default document, and every section of the output is populated.

use std::collections::BTreeMap;
use std::mem::discriminant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

use crate::defaults::{builtin_theme_presets, default_theme};
use crate::schema::lenient;
use crate::schema::*;

/// Id of the preset synthesized from a schema v1 flat `theme`.
pub const MIGRATED_THEME_ID: &str = "migrated";

/// Upgrade `raw` to a current-schema document.
pub fn migrate_config(raw: &Value) -> SiteConfig {
    let Value::Object(fields) = raw else {
        return SiteConfig::default();
    };

    let version = fields
        .get("schemaVersion")
        .and_then(Value::as_f64)
        .unwrap_or(1.0);

    if version >= f64::from(CURRENT_SCHEMA_VERSION) {
        return normalize(raw);
    }

    if version == 1.0 {
        return normalize(&Value::Object(upgrade_v1(fields)));
    }

    // No intermediate versions were ever written; anything else is only normalized.
    normalize(raw)
}

/// Schema 1 kept a single flat `theme` object and had no presets.
fn upgrade_v1(fields: &Map<String, Value>) -> Map<String, Value> {
    let mut upgraded = fields.clone();
    upgraded.insert("schemaVersion".to_string(), json!(2));

    if !upgraded.get("themePresets").is_some_and(Value::is_object) {
        let theme = match upgraded.get("theme") {
            Some(Value::Object(legacy)) => lenient::entries_of::<String>(legacy),
            _ => default_theme(),
        };
        let mut presets = builtin_theme_presets();
        presets.insert(
            MIGRATED_THEME_ID.to_string(),
            ThemePreset {
                name: "Migrated".to_string(),
                theme,
            },
        );
        upgraded.insert("themePresets".to_string(), presets_value(&presets));
        upgraded.insert("activeThemeId".to_string(), json!(MIGRATED_THEME_ID));
    }

    if !upgraded.get("activeThemeId").is_some_and(Value::is_string) {
        upgraded.insert("activeThemeId".to_string(), json!(DEFAULT_THEME_ID));
    }
    if !upgraded.get("media").is_some_and(Value::is_object) {
        upgraded.insert("media".to_string(), json!({"logoDataUrl": "", "avatarDataUrl": ""}));
    }
    upgraded
}

fn presets_value(presets: &BTreeMap<String, ThemePreset>) -> Value {
    Value::Object(
        presets
            .iter()
            .map(|(id, preset)| {
                (
                    id.clone(),
                    json!({"name": preset.name, "theme": preset.theme}),
                )
            })
            .collect(),
    )
}

/// Fill-in-defaults pass: start from the default document and take each
/// section from `raw` only when it has the expected shape.
pub fn normalize(raw: &Value) -> SiteConfig {
    let mut config = SiteConfig::default();
    let Value::Object(fields) = raw else {
        return config;
    };

    config.brand = section(fields.get("brand"), config.brand);
    config.pages = list(fields.get("pages"), config.pages);
    config.menu = section(fields.get("menu"), config.menu);
    config.hero = section(fields.get("hero"), config.hero);
    config.contact = section(fields.get("contact"), config.contact);
    config.about_card = section(fields.get("aboutCard"), config.about_card);
    config.capabilities = section(fields.get("capabilities"), config.capabilities);
    config.footer = section(fields.get("footer"), config.footer);
    if let Some(Value::Object(social)) = fields.get("social") {
        config.social.extend(lenient::entries_of::<String>(social));
    }

    if let Some(Value::Object(presets)) = fields.get("themePresets") {
        let objects: Map<String, Value> = presets
            .iter()
            .filter(|(_, preset)| preset.is_object())
            .map(|(id, preset)| (id.clone(), preset.clone()))
            .collect();
        let decoded = lenient::entries_of::<ThemePreset>(&objects);
        if !decoded.is_empty() {
            config.theme_presets = decoded;
        }
    }
    config.active_theme_id = match fields.get("activeThemeId") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => DEFAULT_THEME_ID.to_string(),
    };

    config.media = section(fields.get("media"), config.media);
    config.media_library = list(fields.get("mediaLibrary"), config.media_library);
    config.seo = section(fields.get("seo"), config.seo);
    config.home_layout = section(fields.get("homeLayout"), config.home_layout);
    config.elements = list(fields.get("elements"), config.elements);
    config.projects = list(fields.get("projects"), config.projects);

    config.normalized()
}

impl SiteConfig {
    /// Re-apply the document-level invariants: current schema version and an
    /// `activeThemeId` that names an existing preset.
    pub fn normalized(mut self) -> Self {
        self.schema_version = CURRENT_SCHEMA_VERSION;
        if !self.theme_presets.contains_key(&self.active_theme_id) {
            self.active_theme_id = DEFAULT_THEME_ID.to_string();
        }
        if !self.theme_presets.contains_key(DEFAULT_THEME_ID) {
            let builtin = builtin_theme_presets().remove(DEFAULT_THEME_ID);
            if let Some(preset) = builtin {
                self.theme_presets.insert(DEFAULT_THEME_ID.to_string(), preset);
            }
        }
        self
    }
}

impl<'de> Deserialize<'de> for SiteConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(migrate_config(&raw))
    }
}

/// Shallow merge of an object section over its default. Keys the default
/// knows are only taken when their JSON kind matches.
fn section<T>(raw: Option<&Value>, fallback: T) -> T
where
    T: Serialize + DeserializeOwned,
{
    let Some(Value::Object(candidate)) = raw else {
        return fallback;
    };
    let mut accepted = candidate.clone();
    if let Ok(Value::Object(reference)) = serde_json::to_value(&fallback) {
        accepted.retain(|key, value| {
            reference
                .get(key)
                .is_none_or(|expected| discriminant(expected) == discriminant(value))
        });
    }
    // Missing keys are filled from the section's `Default`, which is the
    // same value as `fallback`.
    T::deserialize(Value::Object(accepted)).unwrap_or(fallback)
}

fn list<T>(raw: Option<&Value>, fallback: Vec<T>) -> Vec<T>
where
    T: DeserializeOwned,
{
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => fallback,
    }
}
