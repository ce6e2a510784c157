//! External media tools.
//!
//! This module defines the two collaborator seams the pipeline talks to,
//! [`Prober`] (stream metadata) and [`Transcoder`] (encoding), together with
//! their FFmpeg-backed implementations.
//!
//! Both tools are opaque: the prober answers with plain-text lines in the
//! order the fields were requested, and the transcoder's only failure signal
//! is its exit status. Interpreting those answers is the job of
//! [`crate::probe::ProbeAdapter`] and [`crate::executor::Executor`].
//!
//! # Example
//!
//! ```ignore
//! use podprep_core::converter::{FfprobeTool, Prober, StreamQuery};
//!
//! let prober = FfprobeTool::new("ffprobe");
//! let lines = prober.probe(Path::new("/music/a.flac"), &StreamQuery::SAMPLE_RATE).await?;
//! assert_eq!(lines, vec!["96000"]);
//! ```

mod capabilities;
mod error;
mod ffmpeg;
mod traits;

pub use capabilities::ToolCapabilities;
pub use error::ToolError;
pub use ffmpeg::{render_command, FfmpegTool, FfprobeTool};
pub use traits::{Prober, StreamQuery, Transcoder};
