//! Error types for the configuration store.

use thiserror::Error;

/// Failures of the underlying key-value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The write would exceed the storage quota.
    #[error("storage quota exceeded writing {key} ({needed} bytes, {quota} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// Storage is disabled in this environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the cross-tab change channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("change channel unsupported")]
    Unsupported,

    #[error("change channel closed")]
    Closed,
}

/// Errors surfaced by [`crate::ConfigStore`] operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing a slot failed. Never retried.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A document or backup list could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// `restore_backup` was given an id that is not in the backup list.
    #[error("backup-not-found")]
    BackupNotFound { id: String },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
