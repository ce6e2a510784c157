//! Chromaprint `fpcalc` fingerprinter.

use async_trait::async_trait;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::warn;

use super::traits::Fingerprinter;

/// Runs `fpcalc <file>` and reads its `FINGERPRINT=` line.
pub struct FpcalcFingerprinter {
    path: PathBuf,
    fingerprint_regex: Option<Regex>,
}

impl FpcalcFingerprinter {
    /// Creates a fingerprinter running the binary at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fingerprint_regex: Regex::new(r"(?m)^FINGERPRINT=(\S+)\s*$").ok(),
        }
    }

    fn parse_output(&self, stdout: &str) -> Option<String> {
        let re = self.fingerprint_regex.as_ref()?;
        re.captures(stdout)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait]
impl Fingerprinter for FpcalcFingerprinter {
    fn name(&self) -> &str {
        "fpcalc"
    }

    async fn fingerprint(&self, path: &Path) -> Option<String> {
        let output = Command::new(&self.path)
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(o) if o.status.success() => o,
            Ok(o) => {
                warn!(
                    "fpcalc exited with {:?} for {:?}, skipping fingerprint",
                    o.status.code(),
                    path
                );
                return None;
            }
            Err(e) => {
                warn!("Failed to run fpcalc for {:?}: {}", path, e);
                return None;
            }
        };

        let fingerprint = self.parse_output(&String::from_utf8_lossy(&output.stdout));
        if fingerprint.is_none() {
            warn!("No fingerprint in fpcalc output for {:?}", path);
        }
        fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output() {
        let fp = FpcalcFingerprinter::new("fpcalc");
        let stdout = "DURATION=215\nFINGERPRINT=AQADtEmUaEmSRBGO\n";
        assert_eq!(fp.parse_output(stdout), Some("AQADtEmUaEmSRBGO".to_string()));
    }

    #[test]
    fn test_parse_output_windows_newlines() {
        let fp = FpcalcFingerprinter::new("fpcalc");
        let stdout = "DURATION=215\r\nFINGERPRINT=AQAD\r\n";
        assert_eq!(fp.parse_output(stdout), Some("AQAD".to_string()));
    }

    #[test]
    fn test_parse_output_missing() {
        let fp = FpcalcFingerprinter::new("fpcalc");
        assert_eq!(fp.parse_output("ERROR: unable to open file\n"), None);
    }

    #[tokio::test]
    async fn test_missing_binary_returns_none() {
        let fp = FpcalcFingerprinter::new("/nonexistent/fpcalc");
        assert_eq!(fp.fingerprint(Path::new("/m/a.flac")).await, None);
    }
}
