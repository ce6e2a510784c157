//! Mock prober for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{Prober, StreamQuery, ToolError};

/// A recorded probe call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedProbe {
    pub path: PathBuf,
    pub query: StreamQuery,
}

/// Mock implementation of the Prober trait.
///
/// Answers are scripted per path and query. Unscripted queries answer with
/// no lines, which is what `ffprobe` prints for a file lacking the stream.
#[derive(Debug, Clone, Default)]
pub struct MockProber {
    answers: Arc<RwLock<HashMap<(PathBuf, StreamQuery), Vec<String>>>>,
    failing: Arc<RwLock<HashSet<PathBuf>>>,
    calls: Arc<RwLock<Vec<RecordedProbe>>>,
}

impl MockProber {
    /// Create a new mock prober.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the raw lines returned for a path and query.
    pub async fn set_lines(&self, path: impl AsRef<Path>, query: StreamQuery, lines: Vec<&str>) {
        self.answers.write().await.insert(
            (path.as_ref().to_path_buf(), query),
            lines.into_iter().map(str::to_string).collect(),
        );
    }

    /// Script a visual stream of the given size.
    pub async fn set_cover(&self, path: impl AsRef<Path>, width: u32, height: u32) {
        let (w, h) = (width.to_string(), height.to_string());
        self.set_lines(path, StreamQuery::COVER, vec!["video", w.as_str(), h.as_str()])
            .await;
    }

    /// Script the first audio stream's sample rate.
    pub async fn set_sample_rate(&self, path: impl AsRef<Path>, rate: u32) {
        let rate = rate.to_string();
        self.set_lines(path, StreamQuery::SAMPLE_RATE, vec![rate.as_str()])
            .await;
    }

    /// Script the first audio stream's codec name.
    pub async fn set_audio_codec(&self, path: impl AsRef<Path>, codec: &str) {
        self.set_lines(path, StreamQuery::AUDIO_CODEC, vec![codec])
            .await;
    }

    /// Make every probe of `path` fail as if the tool exited non-zero.
    pub async fn fail_path(&self, path: impl AsRef<Path>) {
        self.failing
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Get all recorded probe calls.
    pub async fn recorded_probes(&self) -> Vec<RecordedProbe> {
        self.calls.read().await.clone()
    }

    /// Get the number of probe calls made.
    pub async fn probe_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Clear recorded probe calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }
}

#[async_trait]
impl Prober for MockProber {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path, query: &StreamQuery) -> Result<Vec<String>, ToolError> {
        self.calls.write().await.push(RecordedProbe {
            path: path.to_path_buf(),
            query: *query,
        });

        if self.failing.read().await.contains(path) {
            return Err(ToolError::failed(
                format!("ffprobe {}", path.display()),
                Some(1),
                b"Invalid data found when processing input",
            ));
        }

        Ok(self
            .answers
            .read()
            .await
            .get(&(path.to_path_buf(), *query))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answer() {
        let prober = MockProber::new();
        prober.set_cover("/m/cover.jpg", 800, 600).await;

        let lines = prober
            .probe(Path::new("/m/cover.jpg"), &StreamQuery::COVER)
            .await
            .unwrap();
        assert_eq!(lines, vec!["video", "800", "600"]);
    }

    #[tokio::test]
    async fn test_unscripted_answer_is_empty() {
        let prober = MockProber::new();
        let lines = prober
            .probe(Path::new("/m/a.flac"), &StreamQuery::SAMPLE_RATE)
            .await
            .unwrap();
        assert!(lines.is_empty());
        assert_eq!(prober.probe_count().await, 1);
    }

    #[tokio::test]
    async fn test_failing_path() {
        let prober = MockProber::new();
        prober.set_sample_rate("/m/a.flac", 44100).await;
        prober.fail_path("/m/a.flac").await;

        let result = prober
            .probe(Path::new("/m/a.flac"), &StreamQuery::SAMPLE_RATE)
            .await;
        assert!(matches!(result, Err(ToolError::Failed { .. })));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let prober = MockProber::new();
        let clone = prober.clone();
        clone.set_sample_rate("/m/a.flac", 96000).await;

        let lines = prober
            .probe(Path::new("/m/a.flac"), &StreamQuery::SAMPLE_RATE)
            .await
            .unwrap();
        assert_eq!(lines, vec!["96000"]);
        assert_eq!(clone.recorded_probes().await.len(), 1);
    }
}
