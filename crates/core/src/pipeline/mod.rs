//! Library-wide run: classify once, then process every track in turn.

mod driver;
mod types;

pub use driver::{Driver, PipelineError, STAGING_SUFFIX};
pub use types::{FileOutcome, RunReport};
