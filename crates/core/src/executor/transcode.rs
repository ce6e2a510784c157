//! FFmpeg invocation for planned jobs.

use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{Config, PortableCodec};
use crate::converter::{render_command, Transcoder};
use crate::cover::{square_filter, CoverSource};
use crate::planner::{AudioEncoding, ConversionJob, ConversionOutcome};

use super::error::ExecuteError;

/// What executing a job did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Rendered command line.
    pub command: String,
    pub outcome: ConversionOutcome,
    /// The command was printed, not run.
    pub dry_run: bool,
    /// The lossless source was removed.
    pub source_deleted: bool,
    /// The original portable file was replaced by the staged output.
    pub replaced: bool,
}

impl Execution {
    fn printed(command: String) -> Self {
        Self {
            command,
            outcome: ConversionOutcome::default(),
            dry_run: true,
            source_deleted: false,
            replaced: false,
        }
    }

    fn completed(command: String) -> Self {
        Self {
            command,
            outcome: ConversionOutcome {
                succeeded: true,
                output_exists: true,
            },
            dry_run: false,
            source_deleted: false,
            replaced: false,
        }
    }
}

/// Runs conversion jobs through a [`Transcoder`].
pub struct Executor {
    transcoder: Arc<dyn Transcoder>,
    cover_size: u32,
    aac_bitrate_kbps: u32,
    log_level: String,
    dry_run: bool,
    delete_source: bool,
}

impl Executor {
    pub fn new(config: &Config, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            transcoder,
            cover_size: config.cover.size,
            aac_bitrate_kbps: config.audio.aac_bitrate_kbps,
            log_level: config.tools.ffmpeg_log_level.clone(),
            dry_run: config.run.dry_run,
            delete_source: config.run.delete_source_on_success,
        }
    }

    /// Builds the full transcoder argument list for `job`, output path last.
    pub fn build_args(&self, job: &ConversionJob) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            self.log_level.clone(),
            "-i".into(),
            job.source.to_string_lossy().to_string(),
        ];

        if let Some(cover) = job.cover_source.secondary_input() {
            args.push("-i".into());
            args.push(cover.to_string_lossy().to_string());
        }

        args.push("-map".into());
        args.push("0:a:0".into());
        match &job.cover_source {
            CoverSource::EmbeddedStreamCopy => {
                args.push("-map".into());
                args.push("0:v:0".into());
            }
            CoverSource::ExternalImage(_) | CoverSource::CachedResizedImage(_) => {
                args.push("-map".into());
                args.push("1:v:0".into());
            }
            CoverSource::None => {}
        }

        args.push("-c:a".into());
        match job.audio {
            AudioEncoding::Copy => args.push("copy".into()),
            AudioEncoding::Encode(codec) => {
                args.push(codec.ffmpeg_codec().into());
                if codec == PortableCodec::Aac {
                    args.push("-b:a".into());
                    args.push(format!("{}k", self.aac_bitrate_kbps));
                }
            }
        }

        if let Some(rate) = job.sample_rate.target() {
            args.push("-ar".into());
            args.push(rate.to_string());
        }

        if job.cover_source.is_some() {
            if job.needs_resize {
                args.push("-c:v".into());
                args.push("mjpeg".into());
                args.push("-vf".into());
                args.push(square_filter(self.cover_size));
            } else {
                args.push("-c:v".into());
                args.push("copy".into());
            }
            args.push("-disposition:v:0".into());
            args.push("attached_pic".into());
        }

        if job.preserve_metadata {
            args.push("-map_metadata".into());
            args.push("0".into());
        }

        if let Some(fingerprint) = &job.fingerprint_tag {
            args.push("-metadata".into());
            args.push(format!("ACOUSTID_FINGERPRINT={}", fingerprint));
            args.push("-movflags".into());
            args.push("+use_metadata_tags".into());
        }

        args.push(job.output_path.to_string_lossy().to_string());
        args
    }

    /// Converts a lossless track into its sibling output, then deletes the
    /// source if configured to and the output is on disk.
    pub async fn execute_lossless(&self, job: &ConversionJob) -> Result<Execution, ExecuteError> {
        let args = self.build_args(job);
        let command = render_command(self.transcoder.program(), &args);

        if self.dry_run {
            return Ok(Self::print(command));
        }

        info!("Converting {:?} -> {:?}", job.source, job.output_path);
        if let Err(error) = self.transcoder.run(&args).await {
            error!("Conversion failed, keeping {:?}: {}", job.source, command);
            if let Some(stderr) = error.stderr() {
                warn!("ffmpeg: {}", stderr);
            }
            discard(&job.output_path).await;
            return Err(ExecuteError::ConversionFailed {
                source_path: job.source.clone(),
                command,
                error,
            });
        }

        if !exists(&job.output_path).await {
            error!(
                "No output at {:?}, keeping {:?}: {}",
                job.output_path, job.source, command
            );
            return Err(ExecuteError::OutputMissing {
                source_path: job.source.clone(),
                output: job.output_path.clone(),
                command,
            });
        }

        let mut execution = Execution::completed(command);
        if self.delete_source {
            tokio::fs::remove_file(&job.source)
                .await
                .map_err(|error| ExecuteError::DeleteFailed {
                    path: job.source.clone(),
                    error,
                })?;
            info!("Deleted source {:?}", job.source);
            execution.source_deleted = true;
        } else {
            info!("Keeping source {:?}", job.source);
        }

        Ok(execution)
    }

    /// Normalizes a portable track into its staging path, then renames the
    /// staged file over the original.
    pub async fn execute_portable(&self, job: &ConversionJob) -> Result<Execution, ExecuteError> {
        let args = self.build_args(job);
        let command = render_command(self.transcoder.program(), &args);

        if self.dry_run {
            return Ok(Self::print(command));
        }

        info!("Normalizing {:?} via {:?}", job.source, job.output_path);
        if let Err(error) = self.transcoder.run(&args).await {
            warn!("Normalization failed, original left untouched: {}", command);
            if let Some(stderr) = error.stderr() {
                warn!("ffmpeg: {}", stderr);
            }
            discard(&job.output_path).await;
            return Err(ExecuteError::ConversionFailed {
                source_path: job.source.clone(),
                command,
                error,
            });
        }

        if !exists(&job.output_path).await {
            warn!(
                "Temporary file {:?} missing after conversion, original left untouched",
                job.output_path
            );
            return Err(ExecuteError::OutputMissing {
                source_path: job.source.clone(),
                output: job.output_path.clone(),
                command,
            });
        }

        if let Err(error) = tokio::fs::rename(&job.output_path, &job.source).await {
            discard(&job.output_path).await;
            return Err(ExecuteError::ReplaceFailed {
                staged: job.output_path.clone(),
                original: job.source.clone(),
                error,
            });
        }
        info!("Replaced {:?}", job.source);

        let mut execution = Execution::completed(command);
        execution.replaced = true;
        Ok(execution)
    }

    fn print(command: String) -> Execution {
        info!("[dry run] {}", command);
        println!("{}", command);
        Execution::printed(command)
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Removes a partial or staged output, if any.
async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("Removed partial output {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial output {:?}: {}", path, e),
    }
}
