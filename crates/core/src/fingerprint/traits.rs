//! Trait definitions for the fingerprint module.

use async_trait::async_trait;
use std::path::Path;

/// Computes an acoustic fingerprint for a track.
#[async_trait]
pub trait Fingerprinter: Send + Sync {
    /// Returns the name of this fingerprinter implementation.
    fn name(&self) -> &str;

    /// Fingerprint of `path`, or `None` when it cannot be computed.
    ///
    /// Failures are the implementation's to log; they never block a conversion.
    async fn fingerprint(&self, path: &Path) -> Option<String>;
}

/// Fingerprinter used when fingerprinting is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFingerprinter;

#[async_trait]
impl Fingerprinter for NoopFingerprinter {
    fn name(&self) -> &str {
        "noop"
    }

    async fn fingerprint(&self, _path: &Path) -> Option<String> {
        None
    }
}
