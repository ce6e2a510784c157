//! Per-album resized cover.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::converter::{render_command, ToolError, Transcoder};

/// Errors that can occur while writing the resized cover.
#[derive(Debug, Error)]
pub enum CoverCacheError {
    /// The resize invocation failed.
    #[error("Cover resize from {source_path} failed: {error}")]
    ResizeFailed {
        source_path: PathBuf,
        command: String,
        #[source]
        error: ToolError,
    },

    /// The tool reported success but the file never appeared.
    #[error("Resized cover {path} did not appear within {waited_ms} ms")]
    NotMaterialized { path: PathBuf, waited_ms: u64 },
}

/// FFmpeg filter that fits an image inside a `size` square and pads it to
/// exactly `size`x`size`, centered, keeping the aspect ratio.
pub fn square_filter(size: u32) -> String {
    format!(
        "scale={s}:{s}:force_original_aspect_ratio=decrease,pad={s}:{s}:(ow-iw)/2:(oh-ih)/2",
        s = size
    )
}

/// A resized cover ready to attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedCover {
    pub path: PathBuf,
    /// The file was written by this call.
    pub written: bool,
    /// Set in dry-run mode, where the command was printed instead of run.
    pub dry_run_command: Option<String>,
}

/// Writes the album's resized cover.
pub struct CoverCache {
    transcoder: Arc<dyn Transcoder>,
    size: u32,
    file_name: String,
    log_level: String,
    settle_timeout: Duration,
    settle_poll: Duration,
    dry_run: bool,
    /// Cache paths already printed during a dry run.
    planned: Mutex<HashSet<PathBuf>>,
}

impl CoverCache {
    /// Creates a cover cache from the run configuration.
    pub fn new(config: &Config, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            transcoder,
            size: config.cover.size,
            file_name: config.cover.cache_file_name.clone(),
            log_level: config.tools.ffmpeg_log_level.clone(),
            settle_timeout: Duration::from_millis(config.cover.settle_timeout_ms),
            settle_poll: Duration::from_millis(config.cover.settle_poll_ms.max(1)),
            dry_run: config.run.dry_run,
            planned: Mutex::new(HashSet::new()),
        }
    }

    /// Where the resized cover for `album_dir` lives.
    pub fn cache_path(&self, album_dir: &Path) -> PathBuf {
        album_dir.join(&self.file_name)
    }

    /// Builds the resize invocation. `source` may be a track with an attached
    /// picture or an image; either way its first visual stream is used.
    pub fn build_args(&self, source: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            self.log_level.clone(),
            "-i".to_string(),
            source.to_string_lossy().to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-an".to_string(),
            "-vf".to_string(),
            square_filter(self.size),
            "-frames:v".to_string(),
            "1".to_string(),
            "-update".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Resizes `source` into the cache file of `album_dir`.
    ///
    /// On success the cache file exists. A tool that exits cleanly without
    /// producing it is given `settle_timeout` before this counts as failure.
    /// On failure whatever the tool left at the cache path is removed.
    ///
    /// In dry-run mode the command is printed once per album directory.
    pub async fn materialize(
        &self,
        source: &Path,
        album_dir: &Path,
    ) -> Result<MaterializedCover, CoverCacheError> {
        let path = self.cache_path(album_dir);
        let args = self.build_args(source, &path);
        let command = render_command(self.transcoder.program(), &args);

        if self.dry_run {
            if !self.planned.lock().await.insert(path.clone()) {
                debug!("[dry run] {:?} already planned", path);
                return Ok(MaterializedCover {
                    path,
                    written: false,
                    dry_run_command: None,
                });
            }
            info!("[dry run] {}", command);
            println!("{}", command);
            return Ok(MaterializedCover {
                path,
                written: false,
                dry_run_command: Some(command),
            });
        }

        info!("Resizing cover from {:?} into {:?}", source, path);
        if let Err(error) = self.transcoder.run(&args).await {
            warn!("Cover resize failed: {}", command);
            discard(&path).await;
            return Err(CoverCacheError::ResizeFailed {
                source_path: source.to_path_buf(),
                command,
                error,
            });
        }

        if let Err(e) = self.wait_for(&path).await {
            discard(&path).await;
            return Err(e);
        }

        Ok(MaterializedCover {
            path,
            written: true,
            dry_run_command: None,
        })
    }

    async fn wait_for(&self, path: &Path) -> Result<(), CoverCacheError> {
        let start = Instant::now();
        loop {
            if tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Ok(());
            }
            if start.elapsed() >= self.settle_timeout {
                return Err(CoverCacheError::NotMaterialized {
                    path: path.to_path_buf(),
                    waited_ms: start.elapsed().as_millis() as u64,
                });
            }
            tokio::time::sleep(self.settle_poll).await;
        }
    }
}

/// Removes a cache file that cannot be trusted.
pub(crate) async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("Removed unusable cover {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove unusable cover {:?}: {}", path, e),
    }
}
