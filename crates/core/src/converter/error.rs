//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by an external tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool binary not found.
    #[error("{tool} not found at path: {path}")]
    NotFound { tool: &'static str, path: PathBuf },

    /// Tool ran and exited unsuccessfully.
    #[error("{command} exited with code {code:?}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// I/O error while spawning or talking to the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Creates a failure from an exit code and raw stderr bytes.
    pub fn failed(command: impl Into<String>, code: Option<i32>, stderr: &[u8]) -> Self {
        let stderr = String::from_utf8_lossy(stderr).trim().to_string();
        Self::Failed {
            command: command.into(),
            code,
            stderr: if stderr.is_empty() { None } else { Some(stderr) },
        }
    }

    /// Maps a spawn error, turning `NotFound` into [`ToolError::NotFound`].
    pub fn from_spawn(tool: &'static str, path: &std::path::Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                tool,
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(e)
        }
    }

    /// Captured stderr, if the tool produced any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_failed_trims_stderr() {
        let err = ToolError::failed("ffmpeg -i x", Some(1), b"  boom \n");
        assert_eq!(err.stderr(), Some("boom"));
        assert!(err.to_string().contains("ffmpeg -i x"));
    }

    #[test]
    fn test_failed_empty_stderr_is_none() {
        let err = ToolError::failed("ffprobe", Some(1), b"\n");
        assert_eq!(err.stderr(), None);
    }

    #[test]
    fn test_from_spawn_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ToolError::from_spawn("ffmpeg", Path::new("/bin/ffmpeg"), io);
        assert!(matches!(err, ToolError::NotFound { tool: "ffmpeg", .. }));
    }

    #[test]
    fn test_from_spawn_other_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = ToolError::from_spawn("ffmpeg", Path::new("/bin/ffmpeg"), io);
        assert!(matches!(err, ToolError::Io(_)));
    }
}
