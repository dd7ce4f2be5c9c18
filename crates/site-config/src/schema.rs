//! Typed shape of the site configuration document.
//!
//! Every section decodes leniently: a field of the wrong type falls back to
//! its empty value and list elements that cannot be decoded are dropped, so a
//! stored document never fails to load. Defaults live in [`crate::defaults`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Schema version written by this crate.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Id of the preset that always exists after normalization.
pub const DEFAULT_THEME_ID: &str = "default";

/// Id of the page the admin layer refuses to delete.
pub const HOME_PAGE_ID: &str = "home";

/// Color key to CSS color string.
pub type Theme = BTreeMap<String, String>;

/// The whole configuration document consumed by the renderer.
///
/// Decoding goes through [`crate::migrate_config`], so any JSON value
/// deserializes into a fully populated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub schema_version: u32,
    pub brand: Brand,
    pub pages: Vec<Page>,
    pub menu: Menu,
    pub hero: Hero,
    pub contact: Contact,
    pub about_card: AboutCard,
    pub capabilities: Capabilities,
    pub footer: Footer,
    pub social: BTreeMap<String, String>,
    pub theme_presets: BTreeMap<String, ThemePreset>,
    pub active_theme_id: String,
    pub media: Media,
    pub media_library: Vec<MediaAsset>,
    pub seo: Seo,
    pub home_layout: HomeLayout,
    pub elements: Vec<String>,
    pub projects: Vec<Project>,
}

impl SiteConfig {
    /// Preset referenced by `activeThemeId`, if present.
    pub fn active_preset(&self) -> Option<&ThemePreset> {
        self.theme_presets.get(&self.active_theme_id)
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == id)
    }

    /// Page addressed by `slug`, compared case-insensitively like the router does.
    pub fn page_by_slug(&self, slug: &str) -> Option<&Page> {
        self.pages
            .iter()
            .find(|page| page.slug.eq_ignore_ascii_case(slug))
    }

    pub fn asset(&self, id: &str) -> Option<&MediaAsset> {
        self.media_library.iter().find(|asset| asset.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Brand {
    #[serde(deserialize_with = "lenient::value")]
    pub logo_text: String,
    #[serde(deserialize_with = "lenient::value")]
    pub site_title: String,
}

/// Page template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PageTemplate {
    /// Fixed home layout driven by `homeLayout`
    Home,
    /// Free-form list of blocks
    #[default]
    Blocks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    #[serde(deserialize_with = "lenient::value")]
    pub id: String,
    #[serde(deserialize_with = "lenient::value")]
    pub slug: String,
    #[serde(deserialize_with = "lenient::value")]
    pub title: String,
    #[serde(deserialize_with = "lenient::value")]
    pub template: PageTemplate,
    #[serde(deserialize_with = "lenient::list")]
    pub blocks: Vec<Block>,
}

/// Content block of a `blocks` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    RichText {
        #[serde(default, deserialize_with = "lenient::value")]
        html: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Menu {
    #[serde(deserialize_with = "lenient::list")]
    pub primary: Vec<MenuItem>,
}

/// Navigation entry, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MenuItem {
    /// Link to a page by slug
    Page {
        #[serde(default, deserialize_with = "lenient::value")]
        slug: String,
        #[serde(default, deserialize_with = "lenient::value")]
        label: String,
    },
    /// In-page anchor such as `#projects`
    Anchor {
        #[serde(default, deserialize_with = "lenient::value")]
        href: String,
        #[serde(default, deserialize_with = "lenient::value")]
        label: String,
    },
    /// External URL
    Url {
        #[serde(default, deserialize_with = "lenient::value")]
        href: String,
        #[serde(default, deserialize_with = "lenient::value")]
        label: String,
    },
}

impl MenuItem {
    pub fn label(&self) -> &str {
        match self {
            Self::Page { label, .. } | Self::Anchor { label, .. } | Self::Url { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    #[serde(deserialize_with = "lenient::value")]
    pub headline: String,
    #[serde(deserialize_with = "lenient::value")]
    pub typing_text: String,
    #[serde(deserialize_with = "lenient::value")]
    pub description: String,
    #[serde(deserialize_with = "lenient::value")]
    pub cta_text: String,
    #[serde(deserialize_with = "lenient::value")]
    pub cta_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(deserialize_with = "lenient::value")]
    pub title: String,
    #[serde(deserialize_with = "lenient::value")]
    pub subtitle: String,
    #[serde(deserialize_with = "lenient::value")]
    pub email: String,
    #[serde(deserialize_with = "lenient::value")]
    pub cta_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutCard {
    #[serde(deserialize_with = "lenient::value")]
    pub base: String,
    #[serde(deserialize_with = "lenient::value")]
    pub title: String,
    #[serde(deserialize_with = "lenient::value")]
    pub meta: String,
    #[serde(deserialize_with = "lenient::value")]
    pub body: String,
    #[serde(deserialize_with = "lenient::value")]
    pub description: String,
    #[serde(deserialize_with = "lenient::list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Highlight {
    #[serde(deserialize_with = "lenient::value")]
    pub label: String,
    #[serde(deserialize_with = "lenient::value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capabilities {
    #[serde(deserialize_with = "lenient::value")]
    pub title: String,
    #[serde(deserialize_with = "lenient::value")]
    pub subtitle: String,
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<Capability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Capability {
    #[serde(deserialize_with = "lenient::value")]
    pub label: String,
    #[serde(deserialize_with = "lenient::value")]
    pub icon: String,
    #[serde(deserialize_with = "lenient::value")]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Footer {
    #[serde(deserialize_with = "lenient::value")]
    pub text: String,
}

/// Named color theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePreset {
    #[serde(deserialize_with = "lenient::value")]
    pub name: String,
    #[serde(deserialize_with = "lenient::map")]
    pub theme: Theme,
}

/// Images embedded as data URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Media {
    #[serde(deserialize_with = "lenient::value")]
    pub logo_data_url: String,
    #[serde(deserialize_with = "lenient::value")]
    pub avatar_data_url: String,
}

/// Uploaded file kept in the media library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaAsset {
    #[serde(deserialize_with = "lenient::value")]
    pub id: String,
    #[serde(deserialize_with = "lenient::value")]
    pub name: String,
    /// MIME type
    #[serde(rename = "type", deserialize_with = "lenient::value")]
    pub mime_type: String,
    /// Size in bytes
    #[serde(deserialize_with = "lenient::value")]
    pub size: u64,
    #[serde(deserialize_with = "lenient::value")]
    pub data_url: String,
    #[serde(deserialize_with = "lenient::value")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Seo {
    #[serde(deserialize_with = "lenient::value")]
    pub meta_title: String,
    #[serde(deserialize_with = "lenient::value")]
    pub meta_description: String,
    /// Media library id used as the Open Graph image
    #[serde(deserialize_with = "lenient::value")]
    pub og_image_asset_id: String,
    #[serde(deserialize_with = "lenient::value")]
    pub favicon_asset_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeLayout {
    #[serde(deserialize_with = "lenient::list")]
    pub sections: Vec<HomeSection>,
}

/// One toggleable section of the home template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeSection {
    #[serde(deserialize_with = "lenient::value")]
    pub id: String,
    #[serde(deserialize_with = "lenient::value")]
    pub enabled: bool,
}

/// Portfolio card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "lenient::value")]
    pub category: String,
    #[serde(deserialize_with = "lenient::value")]
    pub app_type: String,
    #[serde(deserialize_with = "lenient::value")]
    pub title: String,
    #[serde(deserialize_with = "lenient::value")]
    pub description: String,
    #[serde(deserialize_with = "lenient::list")]
    pub tags: Vec<String>,
    /// Element the card is styled after (`electric`, `fire`, ...)
    #[serde(deserialize_with = "lenient::value")]
    pub base: String,
    #[serde(deserialize_with = "lenient::list")]
    pub links: Vec<ProjectLink>,
    #[serde(deserialize_with = "lenient::value")]
    pub featured_image: String,
    #[serde(deserialize_with = "lenient::value")]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectLink {
    #[serde(deserialize_with = "lenient::value")]
    pub label: String,
    #[serde(deserialize_with = "lenient::value")]
    pub href: String,
}

/// Field decoders that never reject a document.
pub(crate) mod lenient {
    use std::collections::BTreeMap;

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Decode `T`, or `T::default()` when the stored value has the wrong shape.
    pub fn value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(T::deserialize(raw).unwrap_or_default())
    }

    /// Decode an array, dropping elements that do not fit `T`.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Decode an object, dropping entries that do not fit `T`.
    pub fn map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(entries) => entries_of(&entries),
            _ => BTreeMap::new(),
        })
    }

    pub fn entries_of<T: DeserializeOwned>(
        entries: &serde_json::Map<String, Value>,
    ) -> BTreeMap<String, T> {
        entries
            .iter()
            .filter_map(|(key, value)| {
                T::deserialize(value)
                    .ok()
                    .map(|decoded| (key.clone(), decoded))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrong_scalar_types_decode_to_empty_values() {
        let page: Page = serde_json::from_value(json!({
            "id": "about",
            "slug": 7,
            "template": "gallery",
            "blocks": [{"type": "richText", "html": "<p>x</p>"}, {"type": "video"}, 3]
        }))
        .unwrap();

        assert_eq!(page.id, "about");
        assert_eq!(page.slug, "");
        assert_eq!(page.template, PageTemplate::Blocks);
        assert_eq!(
            page.blocks,
            vec![Block::RichText {
                html: "<p>x</p>".to_string()
            }]
        );
    }

    #[test]
    fn menu_items_are_tagged_by_type() {
        let menu: Menu = serde_json::from_value(json!({
            "primary": [
                {"type": "page", "slug": "about", "label": "About"},
                {"type": "anchor", "href": "#contact", "label": "Contact"},
                {"type": "carousel"}
            ]
        }))
        .unwrap();

        assert_eq!(menu.primary.len(), 2);
        assert_eq!(menu.primary[1].label(), "Contact");
        let encoded = serde_json::to_value(&menu.primary[0]).unwrap();
        assert_eq!(encoded["type"], "page");
        assert_eq!(encoded["slug"], "about");
    }

    #[test]
    fn media_asset_uses_wire_names() {
        let asset = MediaAsset {
            id: "asset-1".to_string(),
            mime_type: "image/png".to_string(),
            size: 12,
            ..MediaAsset::default()
        };
        let encoded = serde_json::to_value(&asset).unwrap();
        assert_eq!(encoded["type"], "image/png");
        assert_eq!(encoded["dataUrl"], "");
        assert_eq!(encoded["createdAt"], "");
    }

    #[test]
    fn theme_drops_non_string_colors() {
        let preset: ThemePreset = serde_json::from_value(json!({
            "name": "Odd",
            "theme": {"electric": "#111111", "colors": {"fire": {"text": "#fff"}}}
        }))
        .unwrap();

        assert_eq!(preset.theme.len(), 1);
        assert_eq!(preset.theme["electric"], "#111111");
    }
}
