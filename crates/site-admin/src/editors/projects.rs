//! Portfolio project cards.

use site_config::{Project, SiteConfig};

use super::{Direction, check_index, move_item};
use crate::error::EditError;

/// Card appended by [`add_project`].
pub fn new_project() -> Project {
    Project {
        category: "New".to_string(),
        title: "Untitled".to_string(),
        base: "electric".to_string(),
        ..Project::default()
    }
}

pub fn add_project(config: &SiteConfig) -> SiteConfig {
    let mut next = config.clone();
    next.projects.push(new_project());
    next
}

pub fn replace_project(
    config: &SiteConfig,
    index: usize,
    project: Project,
) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    check_index(&next.projects, index)?;
    next.projects[index] = project;
    Ok(next)
}

pub fn move_project(
    config: &SiteConfig,
    index: usize,
    direction: Direction,
) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    move_item(&mut next.projects, index, direction)?;
    Ok(next)
}

pub fn remove_project(config: &SiteConfig, index: usize) -> Result<SiteConfig, EditError> {
    let mut next = config.clone();
    check_index(&next.projects, index)?;
    next.projects.remove(index);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_defaults() {
        let next = add_project(&SiteConfig::default());
        let added = next.projects.last().unwrap();
        assert_eq!(added.title, "Untitled");
        assert_eq!(added.category, "New");
        assert_eq!(added.base, "electric");
        assert!(added.links.is_empty());
        assert!(!added.hidden);
    }

    #[test]
    fn reorder_replace_remove() {
        let config = SiteConfig::default();
        let first = config.projects[0].clone();
        let second = config.projects[1].clone();

        let next = move_project(&config, 1, Direction::Up).unwrap();
        assert_eq!(next.projects[0], second);
        assert_eq!(next.projects[1], first);

        let hidden = Project {
            hidden: true,
            ..first.clone()
        };
        let next = replace_project(&next, 1, hidden).unwrap();
        assert!(next.projects[1].hidden);

        let next = remove_project(&next, 0).unwrap();
        assert_eq!(next.projects.len(), config.projects.len() - 1);
        assert_eq!(
            remove_project(&next, 100),
            Err(EditError::IndexOutOfRange {
                index: 100,
                len: next.projects.len()
            })
        );
    }
}
