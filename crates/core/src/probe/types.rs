//! Types for the probe module.

use serde::Serialize;

/// Cover art found in a file (a track's attached picture or an image's own pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CoverArtState {
    /// A visual stream exists.
    pub present: bool,
    /// Both dimensions are at most the target size.
    pub within_target_size: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl CoverArtState {
    /// No visual stream.
    pub fn absent() -> Self {
        Self::default()
    }

    /// A visual stream of the given size, checked against `target`.
    pub fn sized(width: u32, height: u32, target: u32) -> Self {
        Self {
            present: true,
            within_target_size: width <= target && height <= target,
            width: Some(width),
            height: Some(height),
        }
    }

    /// Present and within target size.
    pub fn is_compliant(&self) -> bool {
        self.present && self.within_target_size
    }

    /// Present but too large.
    pub fn needs_resize(&self) -> bool {
        self.present && !self.within_target_size
    }
}

/// What to do about a track's sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "rate", rename_all = "snake_case")]
pub enum SampleRateDecision {
    /// At or below the maximum, or unreadable.
    NoChange,
    /// Resample to this rate.
    ResampleTo(u32),
    /// Above the maximum but divisible by neither canonical rate; left as is.
    Unsupported(u32),
}

impl SampleRateDecision {
    /// The rate to pass to the encoder, if any.
    pub fn target(&self) -> Option<u32> {
        match self {
            Self::ResampleTo(rate) => Some(*rate),
            Self::NoChange | Self::Unsupported(_) => None,
        }
    }

    /// Whether the audio has to be re-encoded at a new rate.
    pub fn needs_change(&self) -> bool {
        self.target().is_some()
    }
}
