//! Per-format processing policy.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::converter::{Prober, Transcoder};
use crate::cover::CoverCache;
use crate::executor::{ExecuteError, Executor};
use crate::fingerprint::Fingerprinter;
use crate::library::{classify, ClassifyError, MediaFile};
use crate::planner::{Plan, PlanError, SkipReason, TrackState, TranscodePlanner};
use crate::probe::ProbeAdapter;

use super::types::{FileOutcome, RunReport};

/// Stem suffix of portable-audio staging files.
pub const STAGING_SUFFIX: &str = "-temp";

/// Extension of every converted or normalized output.
const OUTPUT_EXTENSION: &str = "m4a";

/// Errors that can occur during a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The library could not be walked. Fatal to the run.
    #[error(transparent)]
    Traversal(#[from] ClassifyError),

    /// Planning a track failed.
    #[error("Planning {path} failed: {source}")]
    Plan {
        path: PathBuf,
        #[source]
        source: PlanError,
    },

    /// Executing a track's job failed.
    #[error("Processing {path} failed: {source}")]
    Execute {
        path: PathBuf,
        #[source]
        source: ExecuteError,
    },
}

/// Drives a run over the configured library.
pub struct Driver {
    config: Config,
    adapter: ProbeAdapter,
    planner: TranscodePlanner,
    executor: Executor,
}

impl Driver {
    /// Wires the collaborators for a run with `config`.
    pub fn new(
        config: Config,
        prober: Arc<dyn Prober>,
        transcoder: Arc<dyn Transcoder>,
        fingerprinter: Arc<dyn Fingerprinter>,
    ) -> Self {
        let adapter = ProbeAdapter::new(prober, config.cover.size, config.audio.max_sample_rate);
        let cache = CoverCache::new(&config, transcoder.clone());
        let planner = TranscodePlanner::new(&config, adapter.clone(), cache, fingerprinter);
        let executor = Executor::new(&config, transcoder);

        Self {
            config,
            adapter,
            planner,
            executor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classifies the library, then processes lossless tracks followed by
    /// portable ones, one at a time.
    ///
    /// Only a traversal failure is returned as an error. Per-file failures are
    /// logged and counted in the report.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let root = &self.config.library.root;
        if self.config.run.dry_run {
            info!("Dry run over {:?}: commands are printed, nothing is changed", root);
        } else {
            info!("Normalizing library at {:?}", root);
        }

        let library = classify(root)?;
        let mut report = RunReport::for_library(&library);

        let total = library.lossless.len();
        for (i, path) in library.lossless.iter().enumerate() {
            info!("[{}/{}] {:?}", i + 1, total, path);
            let result = self.process_lossless(path).await;
            Self::tally(&mut report, result);
        }

        let total = library.portable.len();
        for (i, path) in library.portable.iter().enumerate() {
            info!("[{}/{}] {:?}", i + 1, total, path);
            let result = self.process_portable(path).await;
            Self::tally(&mut report, result);
        }

        info!(
            "Run complete: {} converted, {} replaced, {} skipped, {} failed",
            report.converted, report.replaced, report.skipped, report.failed
        );
        Ok(report)
    }

    fn tally(report: &mut RunReport, result: Result<FileOutcome, PipelineError>) {
        match result {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                error!("{}", e);
                report.record_failure();
            }
        }
    }

    /// Converts one lossless track. Cover art is attached when one is found
    /// but never required.
    pub async fn process_lossless(&self, path: &Path) -> Result<FileOutcome, PipelineError> {
        let track = MediaFile::new(path);
        let output = track.sibling_with("", OUTPUT_EXTENSION);
        if !self.config.run.delete_source_on_success && exists(&output).await {
            info!("Already converted to {:?}, skipping {:?}", output, path);
            return Ok(FileOutcome::Skipped(SkipReason::AlreadyConverted));
        }

        let state = self.probe(&track).await;

        let planned = match self.plan(&track, &state, output).await? {
            Plan::Convert(planned) => planned,
            Plan::Skip(reason) => return Ok(FileOutcome::Skipped(reason)),
        };

        let execution = self
            .executor
            .execute_lossless(&planned.job)
            .await
            .map_err(|source| PipelineError::Execute {
                path: path.to_path_buf(),
                source,
            })?;

        if execution.dry_run {
            let mut commands = planned.dry_run_commands;
            commands.push(execution.command);
            return Ok(FileOutcome::Planned { commands });
        }

        Ok(FileOutcome::Converted {
            resized_cover: planned.resized_cover,
            source_deleted: execution.source_deleted,
        })
    }

    /// Normalizes one portable track in place, unless it is already compliant.
    pub async fn process_portable(&self, path: &Path) -> Result<FileOutcome, PipelineError> {
        let track = MediaFile::new(path);
        if let Some(original) = Self::staged_original(path) {
            if exists(&original).await {
                warn!("Skipping leftover staging file {:?} of {:?}", path, original);
                return Ok(FileOutcome::Skipped(SkipReason::StagingArtifact));
            }
        }

        let state = self.probe(&track).await;
        if state.is_compliant() {
            info!("Already compliant, skipping {:?}", path);
            return Ok(FileOutcome::Skipped(SkipReason::AlreadyCompliant));
        }

        let output = track.sibling_with(STAGING_SUFFIX, OUTPUT_EXTENSION);
        let planned = match self.plan(&track, &state, output).await? {
            Plan::Convert(planned) => planned,
            Plan::Skip(reason) => return Ok(FileOutcome::Skipped(reason)),
        };

        let execution = self
            .executor
            .execute_portable(&planned.job)
            .await
            .map_err(|source| PipelineError::Execute {
                path: path.to_path_buf(),
                source,
            })?;

        if execution.dry_run {
            let mut commands = planned.dry_run_commands;
            commands.push(execution.command);
            return Ok(FileOutcome::Planned { commands });
        }

        Ok(FileOutcome::Replaced {
            resized_cover: planned.resized_cover,
        })
    }

    async fn probe(&self, track: &MediaFile) -> TrackState {
        TrackState {
            cover: self.adapter.probe_cover_art(&track.path).await,
            sample_rate: self.adapter.probe_sample_rate(&track.path).await,
        }
    }

    async fn plan(
        &self,
        track: &MediaFile,
        state: &TrackState,
        output: PathBuf,
    ) -> Result<Plan, PipelineError> {
        self.planner
            .plan(track, state, output)
            .await
            .map_err(|source| PipelineError::Plan {
                path: track.path.clone(),
                source,
            })
    }

    /// The file `path` would replace if it is a staging file.
    fn staged_original(path: &Path) -> Option<PathBuf> {
        let stem = path.file_stem()?.to_str()?;
        let original = stem.strip_suffix(STAGING_SUFFIX)?;
        if original.is_empty() {
            return None;
        }
        let name = format!("{}.{}", original, OUTPUT_EXTENSION);
        Some(path.with_file_name(name))
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::NoopFingerprinter;
    use crate::testing::fixtures::touch;
    use crate::testing::{MockProber, MockTranscoder};
    use tempfile::TempDir;

    fn driver(root: &Path, prober: &MockProber, transcoder: &MockTranscoder) -> Driver {
        let mut config = Config::for_root(root);
        config.cover.settle_timeout_ms = 20;
        config.cover.settle_poll_ms = 5;
        Driver::new(
            config,
            Arc::new(prober.clone()),
            Arc::new(transcoder.clone()),
            Arc::new(NoopFingerprinter),
        )
    }

    #[test]
    fn test_staged_original() {
        assert_eq!(
            Driver::staged_original(Path::new("/m/a/x-temp.m4a")),
            Some(PathBuf::from("/m/a/x.m4a"))
        );
        assert_eq!(Driver::staged_original(Path::new("/m/a/x.m4a")), None);
        assert_eq!(Driver::staged_original(Path::new("/m/a/-temp.m4a")), None);
    }

    #[tokio::test]
    async fn test_lossless_without_cover_still_converts() {
        let dir = TempDir::new().unwrap();
        let source = touch(dir.path(), "album/a.flac");
        let prober = MockProber::new();
        let transcoder = MockTranscoder::new();

        let outcome = driver(dir.path(), &prober, &transcoder)
            .process_lossless(&source)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Converted {
                resized_cover: false,
                source_deleted: true
            }
        );
        assert!(dir.path().join("album/a.m4a").exists());
    }

    #[tokio::test]
    async fn test_portable_without_cover_is_skipped() {
        let dir = TempDir::new().unwrap();
        let source = touch(dir.path(), "album/x.m4a");
        let prober = MockProber::new();
        prober.set_sample_rate(&source, 96000).await;
        let transcoder = MockTranscoder::new();

        let outcome = driver(dir.path(), &prober, &transcoder)
            .process_portable(&source)
            .await
            .unwrap();

        assert_eq!(outcome, FileOutcome::Skipped(SkipReason::NoCoverSource));
        assert_eq!(transcoder.invocation_count().await, 0);
    }

    #[tokio::test]
    async fn test_staging_leftover_never_probed() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "album/x.m4a");
        let leftover = touch(dir.path(), "album/x-temp.m4a");
        let prober = MockProber::new();
        let transcoder = MockTranscoder::new();

        let outcome = driver(dir.path(), &prober, &transcoder)
            .process_portable(&leftover)
            .await
            .unwrap();

        assert_eq!(outcome, FileOutcome::Skipped(SkipReason::StagingArtifact));
        assert_eq!(prober.probe_count().await, 0);
    }

    #[tokio::test]
    async fn test_temp_suffix_without_original_is_a_track() {
        let dir = TempDir::new().unwrap();
        let track = touch(dir.path(), "album/live-temp.m4a");
        let prober = MockProber::new();
        prober.set_cover(&track, 600, 600).await;
        prober.set_sample_rate(&track, 44100).await;
        let transcoder = MockTranscoder::new();

        let outcome = driver(dir.path(), &prober, &transcoder)
            .process_portable(&track)
            .await
            .unwrap();

        assert_eq!(outcome, FileOutcome::Skipped(SkipReason::AlreadyCompliant));
        assert_eq!(prober.probe_count().await, 2);
    }

    #[tokio::test]
    async fn test_kept_source_with_output_is_skipped() {
        let dir = TempDir::new().unwrap();
        let source = touch(dir.path(), "album/a.flac");
        touch(dir.path(), "album/a.m4a");
        let prober = MockProber::new();
        let transcoder = MockTranscoder::new();
        let mut config = Config::for_root(dir.path());
        config.run.delete_source_on_success = false;
        let driver = Driver::new(
            config,
            Arc::new(prober.clone()),
            Arc::new(transcoder.clone()),
            Arc::new(NoopFingerprinter),
        );

        let outcome = driver.process_lossless(&source).await.unwrap();

        assert_eq!(outcome, FileOutcome::Skipped(SkipReason::AlreadyConverted));
        assert_eq!(prober.probe_count().await, 0);
        assert_eq!(transcoder.invocation_count().await, 0);
    }

    #[tokio::test]
    async fn test_unreadable_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let prober = MockProber::new();
        let transcoder = MockTranscoder::new();

        let result = driver(&dir.path().join("missing"), &prober, &transcoder)
            .run()
            .await;
        assert!(matches!(result, Err(PipelineError::Traversal(_))));
    }
}
