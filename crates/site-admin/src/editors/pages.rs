//! Pages and their content blocks.

use site_config::{Block, HOME_PAGE_ID, Page, PageTemplate, SiteConfig};
use uuid::Uuid;

use super::{Direction, check_index, move_item};
use crate::error::EditError;

const MAX_SLUG_LEN: usize = 60;
const FALLBACK_SLUG: &str = "page";
const NEW_BLOCK_HTML: &str = "<h2>Section</h2><p>New content…</p>";

/// URL-safe slug: lowercase ASCII letters and digits, other runs collapsed to
/// `-`, no leading or trailing dash, at most 60 characters.
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in raw.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug.chars().take(MAX_SLUG_LEN).collect()
}

/// Slug for `desired` that no other page uses (compared case-insensitively):
/// `base`, then `base-2`, `base-3`, ... The page `current_id` is ignored so a
/// page can keep its own slug.
pub fn ensure_unique_slug(pages: &[Page], desired: &str, current_id: Option<&str>) -> String {
    let base = match slugify(desired) {
        slug if slug.is_empty() => FALLBACK_SLUG.to_string(),
        slug => slug,
    };
    let taken = |candidate: &str| {
        pages
            .iter()
            .filter(|page| Some(page.id.as_str()) != current_id)
            .any(|page| page.slug.eq_ignore_ascii_case(candidate))
    };

    let mut slug = base.clone();
    let mut n = 2;
    while taken(&slug) {
        slug = format!("{base}-{n}");
        n += 1;
    }
    slug
}

/// Append a block-template page titled `title`. Returns the new document and
/// the page id.
pub fn add_page(config: &SiteConfig, title: &str) -> (SiteConfig, String) {
    let title = match title.trim() {
        "" => "New Page",
        trimmed => trimmed,
    };
    let id = format!("page-{}", Uuid::now_v7());
    let slug = ensure_unique_slug(&config.pages, title, Some(&id));

    let mut next = config.clone();
    next.pages.push(Page {
        id: id.clone(),
        slug,
        title: title.to_string(),
        template: PageTemplate::Blocks,
        blocks: vec![Block::RichText {
            html: format!("<h2>{}</h2><p>Edit me.</p>", escape_html(title)),
        }],
    });
    (next, id)
}

/// Fields of a page to change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageUpdate {
    pub title: Option<String>,
    /// Made unique among the other pages before it is stored
    pub slug: Option<String>,
    pub template: Option<PageTemplate>,
}

pub fn update_page(config: &SiteConfig, id: &str, update: PageUpdate) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    let slug = update
        .slug
        .map(|desired| ensure_unique_slug(&config.pages, &desired, Some(id)));
    let page = page_mut(&mut next, id)?;
    if let Some(title) = update.title {
        page.title = title;
    }
    if let Some(slug) = slug {
        page.slug = slug;
    }
    if let Some(template) = update.template {
        page.template = template;
    }
    Ok(next)
}

/// Remove page `id`. The home page is refused.
pub fn delete_page(config: &SiteConfig, id: &str) -> Result<SiteConfig, EditError> {
    if id == HOME_PAGE_ID {
        return Err(EditError::HomePageProtected);
    }
    if config.page(id).is_none() {
        return Err(EditError::PageNotFound(id.to_string()));
    }
    let mut next = config.clone();
    next.pages.retain(|page| page.id != id);
    Ok(next)
}

/// Append an empty rich text block. Home-template pages are refused.
pub fn add_block(config: &SiteConfig, page_id: &str) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    let page = page_mut(&mut next, page_id)?;
    if page.template == PageTemplate::Home {
        return Err(EditError::HomeTemplateHasNoBlocks);
    }
    page.blocks.push(Block::RichText {
        html: NEW_BLOCK_HTML.to_string(),
    });
    Ok(next)
}

pub fn update_block(
    config: &SiteConfig,
    page_id: &str,
    index: usize,
    html: &str,
) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    let page = page_mut(&mut next, page_id)?;
    check_index(&page.blocks, index)?;
    page.blocks[index] = Block::RichText {
        html: html.to_string(),
    };
    Ok(next)
}

pub fn move_block(
    config: &SiteConfig,
    page_id: &str,
    index: usize,
    direction: Direction,
) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    move_item(&mut page_mut(&mut next, page_id)?.blocks, index, direction)?;
    Ok(next)
}

pub fn remove_block(config: &SiteConfig, page_id: &str, index: usize) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    let page = page_mut(&mut next, page_id)?;
    check_index(&page.blocks, index)?;
    page.blocks.remove(index);
    Ok(next)
}

fn page_mut<'a>(config: &'a mut SiteConfig, id: &str) -> Result<&'a mut Page, EditError> {
    config
        .pages
        .iter_mut()
        .find(|page| page.id == id)
        .ok_or_else(|| EditError::PageNotFound(id.to_string()))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
