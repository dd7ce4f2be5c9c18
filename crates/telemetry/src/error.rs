use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("unknown log format {0:?} (expected json or pretty)")]
    InvalidFormat(String),

    /// A global subscriber was already installed.
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
