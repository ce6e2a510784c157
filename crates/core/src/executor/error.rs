//! Error types for the executor module.

use std::path::PathBuf;
use thiserror::Error;

use crate::converter::ToolError;

/// Errors that can occur while executing a conversion job.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The transcoder reported an error.
    #[error("Conversion of {source_path} failed: {error}")]
    ConversionFailed {
        source_path: PathBuf,
        command: String,
        #[source]
        error: ToolError,
    },

    /// The transcoder exited cleanly but left no output behind.
    #[error("Conversion of {source_path} produced no output at {output}")]
    OutputMissing {
        source_path: PathBuf,
        output: PathBuf,
        command: String,
    },

    /// The converted source could not be removed.
    #[error("Failed to delete source file: {path}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The staged output could not be moved over the original.
    #[error("Failed to replace {original} with {staged}")]
    ReplaceFailed {
        staged: PathBuf,
        original: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl ExecuteError {
    /// The attempted command line, for failures of the tool itself.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::ConversionFailed { command, .. } | Self::OutputMissing { command, .. } => {
                Some(command)
            }
            Self::DeleteFailed { .. } | Self::ReplaceFailed { .. } => None,
        }
    }

    /// Whether the encode itself failed, as opposed to the file move after it.
    pub fn is_conversion_failure(&self) -> bool {
        self.command().is_some()
    }
}
