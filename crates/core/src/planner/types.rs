//! Types for the planner module.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::PortableCodec;
use crate::cover::CoverSource;
use crate::probe::{CoverArtState, SampleRateDecision};

/// Probe results for a track, computed once per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackState {
    pub cover: CoverArtState,
    pub sample_rate: SampleRateDecision,
}

impl TrackState {
    /// Cover within size and sample rate left alone.
    pub fn is_compliant(&self) -> bool {
        self.cover.is_compliant() && !self.sample_rate.needs_change()
    }
}

/// How the audio stream is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "codec", rename_all = "snake_case")]
pub enum AudioEncoding {
    /// Stream copy.
    Copy,
    /// Re-encode with this codec.
    Encode(PortableCodec),
}

/// A planned conversion. Nothing happens until it is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub output_path: PathBuf,
    pub cover_source: CoverSource,
    /// The attached cover still has to be squared while encoding.
    pub needs_resize: bool,
    pub sample_rate: SampleRateDecision,
    pub audio: AudioEncoding,
    pub preserve_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_tag: Option<String>,
}

/// Result of running a job's encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConversionOutcome {
    /// The tool exited successfully.
    pub succeeded: bool,
    /// The output file is on disk.
    pub output_exists: bool,
}

impl ConversionOutcome {
    /// Safe to delete or replace the source.
    pub fn is_complete(&self) -> bool {
        self.succeeded && self.output_exists
    }
}

/// Why a track was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Cover and sample rate already within limits.
    AlreadyCompliant,
    /// No cover anywhere, so nothing justifies rewriting the file.
    NoCoverSource,
    /// Leftover staging file from an interrupted run.
    StagingArtifact,
    /// Lossless source kept from an earlier run, its output already exists.
    AlreadyConverted,
}

/// A job plus what planning did to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedJob {
    pub job: ConversionJob,
    /// The album's resized cover was written for this job.
    pub resized_cover: bool,
    /// Commands printed instead of run while planning (dry run).
    pub dry_run_commands: Vec<String>,
}

/// Planner decision for one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Convert(PlannedJob),
    Skip(SkipReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_state_compliance() {
        let compliant = TrackState {
            cover: CoverArtState::sized(600, 600, 600),
            sample_rate: SampleRateDecision::NoChange,
        };
        assert!(compliant.is_compliant());

        let unsupported = TrackState {
            sample_rate: SampleRateDecision::Unsupported(50000),
            ..compliant
        };
        assert!(unsupported.is_compliant());

        let hi_res = TrackState {
            sample_rate: SampleRateDecision::ResampleTo(48000),
            ..compliant
        };
        assert!(!hi_res.is_compliant());

        let no_cover = TrackState {
            cover: CoverArtState::absent(),
            ..compliant
        };
        assert!(!no_cover.is_compliant());
    }

    #[test]
    fn test_outcome_completeness() {
        assert!(ConversionOutcome {
            succeeded: true,
            output_exists: true
        }
        .is_complete());
        assert!(!ConversionOutcome {
            succeeded: true,
            output_exists: false
        }
        .is_complete());
        assert!(!ConversionOutcome::default().is_complete());
    }
}
