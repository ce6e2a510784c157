//! Mock fingerprinter for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fingerprint::Fingerprinter;

/// Mock implementation of the Fingerprinter trait.
///
/// Returns a fixed fingerprint for every file unless one is set per path.
#[derive(Debug, Clone)]
pub struct MockFingerprinter {
    default: Option<String>,
    per_path: Arc<RwLock<HashMap<PathBuf, String>>>,
    calls: Arc<RwLock<Vec<PathBuf>>>,
}

impl MockFingerprinter {
    /// Fingerprints every file as `fingerprint`.
    pub fn returning(fingerprint: impl Into<String>) -> Self {
        Self {
            default: Some(fingerprint.into()),
            per_path: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the fingerprint for a specific path.
    pub async fn set_fingerprint(&self, path: impl AsRef<Path>, fingerprint: &str) {
        self.per_path
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), fingerprint.to_string());
    }

    /// Paths fingerprinted so far.
    pub async fn recorded_paths(&self) -> Vec<PathBuf> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl Fingerprinter for MockFingerprinter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fingerprint(&self, path: &Path) -> Option<String> {
        self.calls.write().await.push(path.to_path_buf());
        if let Some(fp) = self.per_path.read().await.get(path) {
            return Some(fp.clone());
        }
        self.default.clone()
    }
}
