//! Error types for the admin layer.

use std::path::PathBuf;

use site_config::StoreError;
use thiserror::Error;

/// Rejected document edits. The document is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The home page cannot be deleted.
    #[error("home-page-protected")]
    HomePageProtected,

    /// Pages using the home template have no blocks.
    #[error("home-template-has-no-blocks")]
    HomeTemplateHasNoBlocks,

    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("home section not found: {0}")]
    SectionNotFound(String),

    #[error("theme preset not found: {0}")]
    ThemeNotFound(String),

    #[error("media asset not found: {0}")]
    AssetNotFound(String),

    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failures turning an uploaded file into a media asset.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("asset-read-failed: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by [`crate::AdminSession`].
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Imported text is not JSON (or is a JSON value that carries nothing).
    #[error("invalid-json")]
    InvalidJson,

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
