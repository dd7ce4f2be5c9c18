//! Bunyan-style JSON output.

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};

/// One JSON object per event on stderr, carrying span fields.
pub struct JsonLayer;

impl JsonLayer {
    /// Storage layer (collects span fields) and the formatter that prints
    /// them, tagged with `name`.
    pub fn layers(name: &str) -> (JsonStorageLayer, BunyanFormattingLayer<fn() -> std::io::Stderr>) {
        let writer: fn() -> std::io::Stderr = std::io::stderr;
        (
            JsonStorageLayer,
            BunyanFormattingLayer::new(name.to_string(), writer),
        )
    }
}
