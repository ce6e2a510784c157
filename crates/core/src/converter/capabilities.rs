//! External tool availability detection.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::ToolsConfig;

/// Tools detected on the system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCapabilities {
    /// `ffmpeg` answers `-version`
    pub ffmpeg: bool,
    /// `ffprobe` answers `-version`
    pub ffprobe: bool,
    /// `fpcalc` answers `-version`
    pub fpcalc: bool,
}

impl ToolCapabilities {
    /// Detect available tools by asking each for its version.
    pub async fn detect(config: &ToolsConfig) -> Self {
        Self {
            ffmpeg: Self::answers(&config.ffmpeg_path, "-version").await,
            ffprobe: Self::answers(&config.ffprobe_path, "-version").await,
            fpcalc: Self::answers(&config.fpcalc_path, "-version").await,
        }
    }

    async fn answers(program: &Path, flag: &str) -> bool {
        Command::new(program)
            .arg(flag)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Whether both FFmpeg tools needed for a real run are present.
    pub fn can_transcode(&self) -> bool {
        self.ffmpeg && self.ffprobe
    }

    /// Names of required tools that were not found.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.ffmpeg {
            missing.push("ffmpeg");
        }
        if !self.ffprobe {
            missing.push("ffprobe");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_capabilities() {
        let caps = ToolCapabilities::default();
        assert!(!caps.can_transcode());
        assert_eq!(caps.missing(), vec!["ffmpeg", "ffprobe"]);
    }

    #[test]
    fn test_fpcalc_is_optional() {
        let caps = ToolCapabilities {
            ffmpeg: true,
            ffprobe: true,
            fpcalc: false,
        };
        assert!(caps.can_transcode());
        assert!(caps.missing().is_empty());
    }

    #[tokio::test]
    async fn test_detect_missing_tools() {
        let config = ToolsConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe_path: PathBuf::from("/nonexistent/ffprobe"),
            fpcalc_path: PathBuf::from("/nonexistent/fpcalc"),
            ffmpeg_log_level: "error".to_string(),
        };
        let caps = ToolCapabilities::detect(&config).await;
        assert!(!caps.ffmpeg);
        assert!(!caps.ffprobe);
        assert!(!caps.fpcalc);
    }
}
