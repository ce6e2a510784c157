//! Probe adapter.
//!
//! Turns raw prober output into the two answers the pipeline needs: the state
//! of a file's cover art and whether its sample rate must come down. Probe
//! failures never surface as errors here; they degrade to "no cover" and
//! "no change" and are logged.

mod adapter;
mod types;

pub use adapter::{decide_sample_rate, ProbeAdapter, CD_SAMPLE_RATE};
pub use types::{CoverArtState, SampleRateDecision};
