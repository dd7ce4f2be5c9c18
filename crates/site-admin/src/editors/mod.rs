//! Copy-on-write edits of a [`site_config::SiteConfig`].
//!
//! Every function takes the current document by reference and returns a new
//! one for [`crate::AdminSession::set_config`]; a rejected edit returns an
//! [`EditError`] and leaves nothing changed.

pub mod layout;
pub mod media;
pub mod menu;
pub mod pages;
pub mod projects;
pub mod seo;
pub mod theme;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Direction of a one-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Swap `items[index]` with its neighbour. Moving past either end is a no-op.
pub(crate) fn move_item<T>(
    items: &mut [T],
    index: usize,
    direction: Direction,
) -> Result<(), EditError> {
    check_index(items, index)?;
    match direction {
        Direction::Up if index > 0 => items.swap(index - 1, index),
        Direction::Down if index + 1 < items.len() => items.swap(index, index + 1),
        _ => {}
    }
    Ok(())
}

pub(crate) fn check_index<T>(items: &[T], index: usize) -> Result<(), EditError> {
    if index < items.len() {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange {
            index,
            len: items.len(),
        })
    }
}
