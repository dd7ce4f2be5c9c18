//! Media library: uploaded files embedded as data URLs.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{SecondsFormat, Utc};
use site_config::{MediaAsset, SiteConfig};
use uuid::Uuid;

use crate::error::{EditError, MediaError};

/// Uploads above this size are accepted with a warning.
pub const LARGE_ASSET_BYTES: u64 = 5 * 1024 * 1024;

/// Read `path` into a new library asset.
pub async fn read_asset(path: &Path) -> Result<MediaAsset, MediaError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| MediaError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let size = bytes.len() as u64;
    if is_large(size) {
        tracing::warn!(
            path = %path.display(),
            size = %format_bytes(size),
            "file is larger than 5MB, may affect performance"
        );
    }

    let mime_type = mime_type_for(path);
    Ok(MediaAsset {
        id: format!("asset-{}", Uuid::now_v7()),
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        mime_type: mime_type.to_string(),
        size,
        data_url: format!("data:{mime_type};base64,{}", STANDARD.encode(&bytes)),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub fn is_large(size: u64) -> bool {
    size > LARGE_ASSET_BYTES
}

/// MIME type guessed from the file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Put `asset` at the front of the library.
pub fn add_asset(config: &SiteConfig, asset: MediaAsset) -> SiteConfig {
    let mut next = config.clone();
    next.media_library.insert(0, asset);
    next
}

pub fn use_as_logo(config: &SiteConfig, asset_id: &str) -> Result<SiteConfig, EditError> {
    let data_url = asset_data_url(config, asset_id)?;
    let mut next = config.clone();
    next.media.logo_data_url = data_url;
    Ok(next)
}

pub fn use_as_avatar(config: &SiteConfig, asset_id: &str) -> Result<SiteConfig, EditError> {
    let data_url = asset_data_url(config, asset_id)?;
    let mut next = config.clone();
    next.media.avatar_data_url = data_url;
    Ok(next)
}

/// Drop asset `asset_id` from the library. Logo and avatar keep their copy.
pub fn remove_asset(config: &SiteConfig, asset_id: &str) -> SiteConfig {
    let mut next = config.clone();
    next.media_library.retain(|asset| asset.id != asset_id);
    next
}

/// Library asset `asset_id`, or `AssetNotFound`.
pub(crate) fn find_asset<'a>(
    config: &'a SiteConfig,
    asset_id: &str,
) -> Result<&'a MediaAsset, EditError> {
    config
        .asset(asset_id)
        .ok_or_else(|| EditError::AssetNotFound(asset_id.to_string()))
}

fn asset_data_url(config: &SiteConfig, asset_id: &str) -> Result<String, EditError> {
    find_asset(config, asset_id).map(|asset| asset.data_url.clone())
}

/// Human readable size: `0 B`, `512 B`, `1.5 KB`, `5.0 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
