pub mod config;
pub mod converter;
pub mod cover;
pub mod executor;
pub mod fingerprint;
pub mod library;
pub mod pipeline;
pub mod planner;
pub mod probe;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, PortableCodec,
};
pub use converter::{FfmpegTool, FfprobeTool, Prober, ToolCapabilities, ToolError, Transcoder};
pub use fingerprint::{select_fingerprinter, Fingerprinter};
pub use library::{classify, Library, TrackFormat};
pub use pipeline::{Driver, FileOutcome, PipelineError, RunReport};
