//! Admin layer for the site configuration store.
//!
//! - `session` - working copy, undo/redo, autosave, cross-tab sync
//! - `history` - bounded undo/redo stacks
//! - `autosave` - trailing-edge debounce
//! - `editors` - copy-on-write edits of pages, menu, layout, projects, media and theme
//! - `cli` - the `site-admin` command line

pub mod autosave;
pub mod cli;
pub mod editors;
pub mod error;
pub mod history;
pub mod session;

pub use autosave::{DEFAULT_AUTOSAVE_DELAY, Debouncer};
pub use editors::Direction;
pub use error::{EditError, MediaError, Result, SessionError};
pub use history::{HISTORY_LIMIT, History};
pub use session::{AdminSession, Diagnostics, SaveState};
