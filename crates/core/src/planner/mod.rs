//! Conversion planning.
//!
//! Combines probe results and the resolved cover into a [`ConversionJob`].
//! Planning has one side effect: when the chosen cover is too large, the
//! album's resized cover is written before the job is finalized.

mod plan;
mod types;

pub use plan::{PlanError, TranscodePlanner};
pub use types::{AudioEncoding, ConversionJob, ConversionOutcome, Plan, PlannedJob, SkipReason, TrackState};
