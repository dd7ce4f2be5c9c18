//! Active theme resolution and its CSS custom properties.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::defaults::default_theme;
use crate::schema::{SiteConfig, Theme};

/// Fallback for `--water-deep`, which no preset defines.
pub const WATER_DEEP_FALLBACK: &str = "#0077be";

/// CSS property and the theme key it is read from.
const CSS_PROPERTIES: [(&str, &str); 12] = [
    ("--electric", "electric"),
    ("--electric-light", "electricLight"),
    ("--fire", "fire"),
    ("--fire-light", "fireLight"),
    ("--water", "water"),
    ("--water-light", "waterLight"),
    ("--water-deep", "waterDeep"),
    ("--alien", "alien"),
    ("--alien-light", "alienLight"),
    ("--alien-accent", "alienAccent"),
    ("--cyan", "cyan"),
    ("--dark-bg", "darkBg"),
];

/// Theme of the active preset, or the built-in default theme.
pub fn active_theme(config: &SiteConfig) -> Cow<'_, Theme> {
    match config.active_preset() {
        Some(preset) => Cow::Borrowed(&preset.theme),
        None => Cow::Owned(default_theme()),
    }
}

/// CSS custom properties for the active theme. Blank colors are skipped.
pub fn css_variables(config: &SiteConfig) -> Vec<(&'static str, String)> {
    let theme = active_theme(config);
    CSS_PROPERTIES
        .iter()
        .filter_map(|&(property, key)| {
            let value = match theme.get(key).map(String::as_str) {
                Some(color) if !color.trim().is_empty() => color,
                _ if key == "waterDeep" => WATER_DEEP_FALLBACK,
                _ => return None,
            };
            Some((property, value.to_string()))
        })
        .collect()
}

/// Target of [`apply_theme`], e.g. a document root style.
pub trait StyleSink {
    fn set_property(&mut self, name: &str, value: &str);
}

impl StyleSink for BTreeMap<String, String> {
    fn set_property(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

/// Write every CSS variable of the active theme into `sink`.
pub fn apply_theme(config: &SiteConfig, sink: &mut impl StyleSink) {
    for (name, value) in css_variables(config) {
        sink.set_property(name, &value);
    }
}
