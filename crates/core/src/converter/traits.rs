//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ToolError;

/// A stream selector plus the fields to report for it, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamQuery {
    /// ffprobe stream specifier, e.g. `v:0`.
    pub selector: &'static str,
    /// Stream entries, printed one per line in this order.
    pub fields: &'static [&'static str],
}

impl StreamQuery {
    /// First visual stream: codec type, width, height.
    pub const COVER: Self = Self {
        selector: "v:0",
        fields: &["codec_type", "width", "height"],
    };

    /// First audio stream: sample rate.
    pub const SAMPLE_RATE: Self = Self {
        selector: "a:0",
        fields: &["sample_rate"],
    };

    /// First audio stream: codec name.
    pub const AUDIO_CODEC: Self = Self {
        selector: "a:0",
        fields: &["codec_name"],
    };

    /// Value for `-show_entries`.
    pub fn show_entries(&self) -> String {
        format!("stream={}", self.fields.join(","))
    }
}

/// Reports stream metadata for a file.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns the name of this prober implementation.
    fn name(&self) -> &str;

    /// Returns the requested fields as plain-text lines.
    ///
    /// A file with no matching stream yields fewer lines than fields
    /// requested; that is not an error.
    async fn probe(&self, path: &Path, query: &StreamQuery) -> Result<Vec<String>, ToolError>;
}

/// Performs an encode described by a full argument list.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Program path, used when rendering commands for logs and dry runs.
    fn program(&self) -> &Path;

    /// Runs the tool to completion.
    async fn run(&self, args: &[String]) -> Result<(), ToolError>;
}
