//! Home page section order and visibility.

use site_config::SiteConfig;

use super::{Direction, move_item};
use crate::error::EditError;

/// Flip `enabled` of the home section `id`.
pub fn toggle_section(config: &SiteConfig, id: &str) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    let section = next
        .home_layout
        .sections
        .iter_mut()
        .find(|section| section.id == id)
        .ok_or_else(|| EditError::SectionNotFound(id.to_string()))?;
    section.enabled = !section.enabled;
    Ok(next)
}

pub fn move_section(
    config: &SiteConfig,
    index: usize,
    direction: Direction,
) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    move_item(&mut next.home_layout.sections, index, direction)?;
    Ok(next)
}

/// Display name of a home section.
pub fn section_label(id: &str) -> &str {
    match id {
        "hero" => "Hero",
        "capabilities" => "Capabilities",
        "projects" => "Projects",
        "contact" => "Contact",
        "footer" => "Footer",
        other => other,
    }
}
