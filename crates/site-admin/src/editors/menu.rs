//! Primary navigation menu.

use site_config::{MenuItem, SiteConfig};

use super::pages::slugify;
use super::{Direction, check_index, move_item};
use crate::error::EditError;

/// Append a link to the home page.
pub fn add_menu_item(config: &SiteConfig) -> SiteConfig {
    let mut next = config.clone();
    next.menu.primary.push(MenuItem::Page {
        slug: "home".to_string(),
        label: "Home".to_string(),
    });
    next
}

/// Replace entry `index` with `item`, filling blank fields the way the menu
/// form does: page slugs are slugified, empty labels and targets get
/// placeholders.
pub fn replace_menu_item(
    config: &SiteConfig,
    index: usize,
    item: MenuItem,
) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    check_index(&next.menu.primary, index)?;
    next.menu.primary[index] = tidy(item);
    Ok(next)
}

pub fn move_menu_item(
    config: &SiteConfig,
    index: usize,
    direction: Direction,
) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    move_item(&mut next.menu.primary, index, direction)?;
    Ok(next)
}

pub fn remove_menu_item(config: &SiteConfig, index: usize) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    check_index(&next.menu.primary, index)?;
    next.menu.primary.remove(index);
    Ok(next)
}

fn tidy(item: MenuItem) -> MenuItem {
    fn or(value: String, fallback: &str) -> String {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value
        }
    }

    match item {
        MenuItem::Page { slug, label } => MenuItem::Page {
            slug: or(slugify(&or(slug, "home")), "home"),
            label: or(label, "Page"),
        },
        MenuItem::Anchor { href, label } => MenuItem::Anchor {
            href: or(href, "#"),
            label: or(label, "Anchor"),
        },
        MenuItem::Url { href, label } => MenuItem::Url {
            href: or(href, "https://"),
            label: or(label, "Link"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_items_link_home() {
        let config = SiteConfig::default();
        let next = add_menu_item(&config);
        assert_eq!(next.menu.primary.len(), config.menu.primary.len() + 1);
        assert_eq!(next.menu.primary.last().map(MenuItem::label), Some("Home"));
    }

    #[test]
    fn replaced_items_get_placeholders() {
        let config = SiteConfig::default();
        let next = replace_menu_item(
            &config,
            0,
            MenuItem::Page {
                slug: "Case Studies!".to_string(),
                label: String::new(),
            },
        )
        .unwrap();
        assert_eq!(
            next.menu.primary[0],
            MenuItem::Page {
                slug: "case-studies".to_string(),
                label: "Page".to_string()
            }
        );

        let next = replace_menu_item(
            &next,
            1,
            MenuItem::Url {
                href: String::new(),
                label: String::new(),
            },
        )
        .unwrap();
        assert_eq!(
            next.menu.primary[1],
            MenuItem::Url {
                href: "https://".to_string(),
                label: "Link".to_string()
            }
        );
        assert!(replace_menu_item(&next, 99, MenuItem::Page { slug: String::new(), label: String::new() }).is_err());
    }

    #[test]
    fn move_and_remove() {
        let config = SiteConfig::default();
        let next = move_menu_item(&config, 0, Direction::Down).unwrap();
        assert_eq!(next.menu.primary[1].label(), "Home");
        let next = remove_menu_item(&next, 1).unwrap();
        assert!(next.menu.primary.iter().all(|item| item.label() != "Home"));
    }
}
