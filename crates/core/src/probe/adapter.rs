//! Prober output interpretation.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::converter::{Prober, StreamQuery};

use super::types::{CoverArtState, SampleRateDecision};

/// Fallback rate when the maximum does not divide the source rate.
pub const CD_SAMPLE_RATE: u32 = 44100;

/// Picks the resample target for a source rate.
///
/// Rates above `max` go to `max` when it divides them evenly, else to
/// 44.1 kHz when that does. Anything else is reported as unsupported.
pub fn decide_sample_rate(rate: u32, max: u32) -> SampleRateDecision {
    if rate <= max {
        return SampleRateDecision::NoChange;
    }
    if max > 0 && rate % max == 0 {
        SampleRateDecision::ResampleTo(max)
    } else if rate % CD_SAMPLE_RATE == 0 {
        SampleRateDecision::ResampleTo(CD_SAMPLE_RATE)
    } else {
        SampleRateDecision::Unsupported(rate)
    }
}

/// Answers cover and sample-rate questions through a [`Prober`].
#[derive(Clone)]
pub struct ProbeAdapter {
    prober: Arc<dyn Prober>,
    target_size: u32,
    max_sample_rate: u32,
}

impl ProbeAdapter {
    /// Creates an adapter checking against the given thresholds.
    pub fn new(prober: Arc<dyn Prober>, target_size: u32, max_sample_rate: u32) -> Self {
        Self {
            prober,
            target_size,
            max_sample_rate,
        }
    }

    /// Target square edge in pixels.
    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// Reports the first visual stream of `file`, which may be a track or an image.
    pub async fn probe_cover_art(&self, file: &Path) -> CoverArtState {
        let lines = match self.prober.probe(file, &StreamQuery::COVER).await {
            Ok(lines) => lines,
            Err(e) => {
                debug!("No cover stream in {:?}: {}", file, e);
                return CoverArtState::absent();
            }
        };

        match Self::parse_cover(&lines, self.target_size) {
            Some(state) => state,
            None => {
                if !lines.is_empty() {
                    warn!("Unreadable cover probe output for {:?}: {:?}", file, lines);
                }
                CoverArtState::absent()
            }
        }
    }

    fn parse_cover(lines: &[String], target: u32) -> Option<CoverArtState> {
        let [codec_type, width, height, ..] = lines else {
            return None;
        };
        if codec_type != "video" {
            return None;
        }
        let width = width.parse::<u32>().ok()?;
        let height = height.parse::<u32>().ok()?;
        Some(CoverArtState::sized(width, height, target))
    }

    /// Decides whether `file` must be resampled.
    pub async fn probe_sample_rate(&self, file: &Path) -> SampleRateDecision {
        let rate = match self.prober.probe(file, &StreamQuery::SAMPLE_RATE).await {
            Ok(lines) => lines.first().and_then(|l| l.parse::<u32>().ok()),
            Err(e) => {
                warn!("Failed to probe sample rate of {:?}: {}", file, e);
                return SampleRateDecision::NoChange;
            }
        };

        let Some(rate) = rate else {
            warn!("Could not read sample rate of {:?}, leaving as is", file);
            return SampleRateDecision::NoChange;
        };

        let decision = decide_sample_rate(rate, self.max_sample_rate);
        match decision {
            SampleRateDecision::ResampleTo(target) => {
                debug!("{:?} at {} Hz will be resampled to {} Hz", file, rate, target)
            }
            SampleRateDecision::Unsupported(rate) => warn!(
                "Unsupported sample rate {} Hz in {:?}, leaving as is",
                rate, file
            ),
            SampleRateDecision::NoChange => {}
        }
        decision
    }

    /// Codec name of the first audio stream, if readable.
    pub async fn probe_audio_codec(&self, file: &Path) -> Option<String> {
        match self.prober.probe(file, &StreamQuery::AUDIO_CODEC).await {
            Ok(lines) => lines.into_iter().next(),
            Err(e) => {
                warn!("Failed to probe audio codec of {:?}: {}", file, e);
                None
            }
        }
    }
}
