//! Conversion job construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, PortableCodec};
use crate::cover::{
    discard, CoverCache, CoverCacheError, CoverResolver, CoverSource, ResolvedCover,
};
use crate::fingerprint::Fingerprinter;
use crate::library::{MediaFile, TrackFormat};
use crate::probe::ProbeAdapter;

use super::types::{AudioEncoding, ConversionJob, Plan, PlannedJob, SkipReason, TrackState};

/// Errors that can occur while planning a job.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The resized cover could not be written.
    #[error(transparent)]
    CoverCache(#[from] CoverCacheError),
}

/// Cover choice before any resize.
struct CoverChoice {
    source: CoverSource,
    needs_resize: bool,
    /// File to resize from when `needs_resize` is set.
    resize_from: Option<PathBuf>,
}

/// Builds [`ConversionJob`]s.
pub struct TranscodePlanner {
    adapter: ProbeAdapter,
    resolver: CoverResolver,
    cache: CoverCache,
    fingerprinter: Arc<dyn Fingerprinter>,
    lossless_codec: PortableCodec,
}

impl TranscodePlanner {
    /// Creates a planner.
    pub fn new(
        config: &Config,
        adapter: ProbeAdapter,
        cache: CoverCache,
        fingerprinter: Arc<dyn Fingerprinter>,
    ) -> Self {
        Self {
            adapter,
            resolver: CoverResolver::new(config.cover.cache_file_name.clone()),
            cache,
            fingerprinter,
            lossless_codec: config.audio.lossless_codec,
        }
    }

    /// Plans the conversion of `track` into `output_path`.
    ///
    /// Portable-audio tracks without any cover are skipped. Lossless tracks are
    /// converted with or without one.
    pub async fn plan(
        &self,
        track: &MediaFile,
        state: &TrackState,
        output_path: PathBuf,
    ) -> Result<Plan, PlanError> {
        let choice = self.choose_cover(&track.path, state).await;

        if !choice.source.is_some() {
            match track.format {
                TrackFormat::PortableAudio => {
                    info!("No cover source for {:?}, skipping", track.path);
                    return Ok(Plan::Skip(SkipReason::NoCoverSource));
                }
                _ => info!("No cover source for {:?}, converting without art", track.path),
            }
        }

        let mut cover_source = choice.source;
        let mut needs_resize = choice.needs_resize;
        let mut resized_cover = false;
        let mut dry_run_commands = Vec::new();

        if let Some(from) = choice.resize_from {
            let cover = self.cache.materialize(&from, track.album_dir()).await?;
            resized_cover = cover.written;
            dry_run_commands.extend(cover.dry_run_command);
            cover_source = CoverSource::CachedResizedImage(cover.path);
            needs_resize = false;
        }

        let audio = self.audio_encoding(track, state).await;
        let fingerprint_tag = self.fingerprinter.fingerprint(&track.path).await;

        let job = ConversionJob {
            source: track.path.clone(),
            output_path,
            cover_source,
            needs_resize,
            sample_rate: state.sample_rate,
            audio,
            preserve_metadata: true,
            fingerprint_tag,
        };
        debug!("Planned {:?}", job);

        Ok(Plan::Convert(PlannedJob {
            job,
            resized_cover,
            dry_run_commands,
        }))
    }

    /// Picks the cover source: resized cover, then the track's own art, then
    /// any sibling image.
    async fn choose_cover(&self, track: &Path, state: &TrackState) -> CoverChoice {
        let mut resolved = self.resolver.resolve(track).await;

        if let ResolvedCover::Cached(path) = &resolved {
            let cached = self.adapter.probe_cover_art(path).await;
            if cached.present {
                if !cached.within_target_size {
                    warn!(
                        "Resized cover {:?} is not within {}px, squaring it inline",
                        path,
                        self.adapter.target_size()
                    );
                }
                return CoverChoice {
                    source: CoverSource::CachedResizedImage(path.clone()),
                    needs_resize: !cached.within_target_size,
                    resize_from: None,
                };
            }
            warn!("Resized cover {:?} has no readable picture, discarding it", path);
            discard(path).await;
        }
        if matches!(resolved, ResolvedCover::Cached(_)) {
            resolved = self.resolver.resolve(track).await;
        }

        if state.cover.present {
            let needs_resize = state.cover.needs_resize();
            if needs_resize {
                info!(
                    "Embedded cover of {:?} is {}x{}, resizing",
                    track,
                    state.cover.width.unwrap_or_default(),
                    state.cover.height.unwrap_or_default()
                );
            }
            return CoverChoice {
                source: CoverSource::EmbeddedStreamCopy,
                needs_resize,
                resize_from: needs_resize.then(|| track.to_path_buf()),
            };
        }

        if let ResolvedCover::Image(path) = resolved {
            let image = self.adapter.probe_cover_art(&path).await;
            if !image.present {
                warn!("Cover image {:?} has no readable picture, ignoring it", path);
                return Self::no_cover();
            }
            let needs_resize = image.needs_resize();
            if needs_resize {
                info!(
                    "Cover image {:?} is {}x{}, resizing",
                    path,
                    image.width.unwrap_or_default(),
                    image.height.unwrap_or_default()
                );
            }
            return CoverChoice {
                resize_from: needs_resize.then(|| path.clone()),
                source: CoverSource::ExternalImage(path),
                needs_resize,
            };
        }

        Self::no_cover()
    }

    fn no_cover() -> CoverChoice {
        CoverChoice {
            source: CoverSource::None,
            needs_resize: false,
            resize_from: None,
        }
    }

    async fn audio_encoding(&self, track: &MediaFile, state: &TrackState) -> AudioEncoding {
        match track.format {
            TrackFormat::PortableAudio if state.sample_rate.needs_change() => {
                let codec = self
                    .adapter
                    .probe_audio_codec(&track.path)
                    .await
                    .map(|name| PortableCodec::from_probed(&name))
                    .unwrap_or(self.lossless_codec);
                AudioEncoding::Encode(codec)
            }
            TrackFormat::PortableAudio => AudioEncoding::Copy,
            _ => AudioEncoding::Encode(self.lossless_codec),
        }
    }
}
