//! Search and social metadata.

use clap::ValueEnum;
use site_config::{MediaAsset, SiteConfig};

use super::media::find_asset;
use crate::error::EditError;

/// Text fields to change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoUpdate {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

pub fn set_seo(config: &SiteConfig, update: SeoUpdate) -> SiteConfig {
    let mut next = config.clone();
    if let Some(title) = update.meta_title {
        next.seo.meta_title = title;
    }
    if let Some(description) = update.meta_description {
        next.seo.meta_description = description;
    }
    next
}

/// Image slot of the SEO section that points into the media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeoAsset {
    OgImage,
    Favicon,
}

/// Point `slot` at library asset `asset_id`, or clear it with `None`.
pub fn set_seo_asset(
    config: &SiteConfig,
    slot: SeoAsset,
    asset_id: Option<&str>,
) -> Result<SiteConfig, EditError> {
    let id = match asset_id {
        Some(id) => find_asset(config, id)?.id.clone(),
        None => String::new(),
    };
    let mut next = config.clone();
    match slot {
        SeoAsset::OgImage => next.seo.og_image_asset_id = id,
        SeoAsset::Favicon => next.seo.favicon_asset_id = id,
    }
    Ok(next)
}

/// Asset currently selected for `slot`. An id no longer in the library
/// resolves to nothing.
pub fn seo_asset(config: &SiteConfig, slot: SeoAsset) -> Option<&MediaAsset> {
    let id = match slot {
        SeoAsset::OgImage => &config.seo.og_image_asset_id,
        SeoAsset::Favicon => &config.seo.favicon_asset_id,
    };
    if id.is_empty() {
        return None;
    }
    config.asset(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editors::media::{add_asset, remove_asset};

    fn with_asset(id: &str) -> SiteConfig {
        add_asset(
            &SiteConfig::default(),
            MediaAsset {
                id: id.to_string(),
                name: "card.png".to_string(),
                ..MediaAsset::default()
            },
        )
    }

    #[test]
    fn text_fields_update_independently() {
        let config = set_seo(
            &SiteConfig::default(),
            SeoUpdate {
                meta_title: Some("Portfolio".to_string()),
                ..SeoUpdate::default()
            },
        );
        let config = set_seo(
            &config,
            SeoUpdate {
                meta_description: Some("Work and writing".to_string()),
                ..SeoUpdate::default()
            },
        );
        assert_eq!(config.seo.meta_title, "Portfolio");
        assert_eq!(config.seo.meta_description, "Work and writing");
    }

    #[test]
    fn asset_slots_must_reference_the_library() {
        let config = with_asset("asset-1");
        let config = set_seo_asset(&config, SeoAsset::OgImage, Some("asset-1")).unwrap();
        let config = set_seo_asset(&config, SeoAsset::Favicon, Some("asset-1")).unwrap();
        assert_eq!(config.seo.og_image_asset_id, "asset-1");
        assert_eq!(seo_asset(&config, SeoAsset::Favicon).map(|a| a.name.as_str()), Some("card.png"));

        assert_eq!(
            set_seo_asset(&config, SeoAsset::Favicon, Some("asset-9")),
            Err(EditError::AssetNotFound("asset-9".to_string()))
        );

        let cleared = set_seo_asset(&config, SeoAsset::OgImage, None).unwrap();
        assert!(cleared.seo.og_image_asset_id.is_empty());
        assert!(seo_asset(&cleared, SeoAsset::OgImage).is_none());
    }

    #[test]
    fn removed_asset_no_longer_resolves() {
        let config = set_seo_asset(&with_asset("asset-1"), SeoAsset::OgImage, Some("asset-1")).unwrap();
        let config = remove_asset(&config, "asset-1");
        assert_eq!(config.seo.og_image_asset_id, "asset-1");
        assert!(seo_asset(&config, SeoAsset::OgImage).is_none());
    }
}
