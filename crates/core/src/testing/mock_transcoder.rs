//! Mock transcoder for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{ToolError, Transcoder};
use crate::cover::is_image_path;

use super::MockProber;

/// A recorded transcoder invocation for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedInvocation {
    /// Full argument list, output path last.
    pub args: Vec<String>,
    /// Whether the invocation reported success.
    pub success: bool,
}

impl RecordedInvocation {
    /// The output path (last argument).
    pub fn output(&self) -> Option<PathBuf> {
        self.args.last().map(PathBuf::from)
    }

    /// Paths passed with `-i`, in order.
    pub fn inputs(&self) -> Vec<PathBuf> {
        self.args
            .windows(2)
            .filter(|w| w[0] == "-i")
            .map(|w| PathBuf::from(&w[1]))
            .collect()
    }

    /// Whether `flag` is immediately followed by `value`.
    pub fn has_pair(&self, flag: &str, value: &str) -> bool {
        self.args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    /// Whether any argument equals `arg`.
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

/// Mock implementation of the Transcoder trait.
///
/// Provides controllable behavior for testing:
/// - Track invocations for assertions
/// - Write the output file on success so existence checks pass
/// - Simulate failures, or a zero exit that leaves no output behind
/// - Leave a truncated output behind when failing
/// - Report written images back through a linked [`MockProber`]
#[derive(Debug, Clone, Default)]
pub struct MockTranscoder {
    invocations: Arc<RwLock<Vec<RecordedInvocation>>>,
    /// If set, the next invocation will fail with this error.
    next_error: Arc<RwLock<Option<ToolError>>>,
    /// Invocations mentioning any of these substrings fail.
    fail_matching: Arc<RwLock<Vec<String>>>,
    /// Report success without writing the output.
    skip_output: Arc<RwLock<bool>>,
    /// Write an empty output before reporting a failure.
    partial_on_failure: Arc<RwLock<bool>>,
    /// Prober told about written images, with the size to report.
    image_prober: Option<(MockProber, u32)>,
}

impl MockTranscoder {
    /// Create a new mock transcoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every image this mock writes to `prober` as `size`x`size`.
    pub fn with_prober(mut self, prober: MockProber, size: u32) -> Self {
        self.image_prober = Some((prober, size));
        self
    }

    /// Get all recorded invocations.
    pub async fn recorded_invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.read().await.clone()
    }

    /// Get the number of invocations performed.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Invocations whose output is an image (cover resizes).
    pub async fn image_invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations
            .read()
            .await
            .iter()
            .filter(|inv| inv.output().is_some_and(|o| is_image_path(&o)))
            .cloned()
            .collect()
    }

    /// Invocations whose output is not an image (audio encodes).
    pub async fn audio_invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations
            .read()
            .await
            .iter()
            .filter(|inv| inv.output().is_some_and(|o| !is_image_path(&o)))
            .cloned()
            .collect()
    }

    /// Clear recorded invocations.
    pub async fn clear_recorded(&self) {
        self.invocations.write().await.clear();
    }

    /// Configure the next invocation to fail with the given error.
    pub async fn set_next_error(&self, error: ToolError) {
        *self.next_error.write().await = Some(error);
    }

    /// Fail every invocation whose arguments contain `needle`.
    pub async fn fail_when_args_contain(&self, needle: impl Into<String>) {
        self.fail_matching.write().await.push(needle.into());
    }

    /// Exit successfully without producing output.
    pub async fn set_skip_output(&self, skip: bool) {
        *self.skip_output.write().await = skip;
    }

    /// Leave an empty output file behind on every failure.
    pub async fn set_partial_output_on_failure(&self, partial: bool) {
        *self.partial_on_failure.write().await = partial;
    }

    async fn take_error(&self, args: &[String]) -> Option<ToolError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Some(err);
        }
        let matching = self.fail_matching.read().await;
        let hit = matching
            .iter()
            .any(|needle| args.iter().any(|a| a.contains(needle.as_str())));
        if hit {
            Some(ToolError::failed(
                format!("ffmpeg {}", args.join(" ")),
                Some(1),
                b"Conversion failed!",
            ))
        } else {
            None
        }
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    fn program(&self) -> &Path {
        Path::new("ffmpeg")
    }

    async fn run(&self, args: &[String]) -> Result<(), ToolError> {
        if let Some(err) = self.take_error(args).await {
            self.invocations.write().await.push(RecordedInvocation {
                args: args.to_vec(),
                success: false,
            });
            if *self.partial_on_failure.read().await {
                if let Some(output) = args.last() {
                    tokio::fs::write(output, b"").await?;
                }
            }
            return Err(err);
        }

        self.invocations.write().await.push(RecordedInvocation {
            args: args.to_vec(),
            success: true,
        });

        if *self.skip_output.read().await {
            return Ok(());
        }

        if let Some(output) = args.last().map(PathBuf::from) {
            tokio::fs::write(&output, b"transcoded").await?;
            if let Some((prober, size)) = &self.image_prober {
                if is_image_path(&output) {
                    prober.set_cover(&output, *size, *size).await;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_writes_output_and_records() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a.m4a");
        let transcoder = MockTranscoder::new();

        transcoder
            .run(&args(&["-i", "/m/a.flac", out.to_str().unwrap()]))
            .await
            .unwrap();

        assert!(out.exists());
        let recorded = transcoder.recorded_invocations().await;
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].success);
        assert_eq!(recorded[0].inputs(), vec![PathBuf::from("/m/a.flac")]);
        assert_eq!(recorded[0].output(), Some(out));
    }

    #[tokio::test]
    async fn test_error_injection() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a.m4a");
        let transcoder = MockTranscoder::new();
        transcoder
            .set_next_error(ToolError::failed("ffmpeg", Some(1), b"boom"))
            .await;

        let result = transcoder.run(&args(&["-i", "x", out.to_str().unwrap()])).await;
        assert!(result.is_err());
        assert!(!out.exists());

        // Error should be consumed, invocation recorded as failed
        let recorded = transcoder.recorded_invocations().await;
        assert!(!recorded[0].success);
        transcoder
            .run(&args(&["-i", "x", out.to_str().unwrap()]))
            .await
            .unwrap();
        assert!(out.exists());
    }

    #[tokio::test]
    async fn test_fail_matching() {
        let dir = TempDir::new().unwrap();
        let transcoder = MockTranscoder::new();
        transcoder.fail_when_args_contain("bad.flac").await;

        let bad = dir.path().join("bad.m4a");
        let good = dir.path().join("good.m4a");
        assert!(transcoder
            .run(&args(&["-i", "/m/bad.flac", bad.to_str().unwrap()]))
            .await
            .is_err());
        assert!(transcoder
            .run(&args(&["-i", "/m/good.flac", good.to_str().unwrap()]))
            .await
            .is_ok());
        assert!(!bad.exists());
        assert!(good.exists());
    }

    #[tokio::test]
    async fn test_skip_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a.m4a");
        let transcoder = MockTranscoder::new();
        transcoder.set_skip_output(true).await;

        transcoder
            .run(&args(&["-i", "x", out.to_str().unwrap()]))
            .await
            .unwrap();
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_written_image_reported_to_prober() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("cover-resized.jpg");
        let prober = MockProber::new();
        let transcoder = MockTranscoder::new().with_prober(prober.clone(), 600);

        transcoder
            .run(&args(&["-i", "/m/cover.jpg", out.to_str().unwrap()]))
            .await
            .unwrap();

        assert_eq!(transcoder.image_invocations().await.len(), 1);
        assert!(transcoder.audio_invocations().await.is_empty());
        let lines = crate::converter::Prober::probe(
            &prober,
            &out,
            &crate::converter::StreamQuery::COVER,
        )
        .await
        .unwrap();
        assert_eq!(lines, vec!["video", "600", "600"]);
    }
}
