//! Testing utilities and mock implementations of the external tools.
//!
//! The mocks stand in for `ffprobe`, `ffmpeg` and `fpcalc`, so the whole
//! pipeline can run against a temporary directory without real media.
//!
//! # Example
//!
//! ```rust,ignore
//! use podprep_core::testing::{MockProber, MockTranscoder};
//!
//! let prober = MockProber::new();
//! prober.set_cover("/music/a/cover.jpg", 1200, 1200).await;
//! prober.set_sample_rate("/music/a/01.flac", 44100).await;
//!
//! // Resized covers written by the mock are reported back as 600x600
//! let transcoder = MockTranscoder::new().with_prober(prober.clone(), 600);
//! ```

mod mock_fingerprinter;
mod mock_prober;
mod mock_transcoder;

pub use mock_fingerprinter::MockFingerprinter;
pub use mock_prober::{MockProber, RecordedProbe};
pub use mock_transcoder::{MockTranscoder, RecordedInvocation};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Creates `dir/name` (and its parents) with placeholder bytes.
    pub fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, name.as_bytes()).expect("Failed to write fixture file");
        path
    }
}
