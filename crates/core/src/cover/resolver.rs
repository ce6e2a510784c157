//! Sibling cover lookup.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::is_image_path;

/// Cover files shipped with an album, in preference order.
pub const BUNDLED_COVER_NAMES: &[&str] = &["cover.jpg", "cover.jpeg", "cover.png"];

/// Cover files written by metadata downloaders, in preference order.
pub const DOWNLOADED_COVER_NAMES: &[&str] = &["folder.jpg", "front.jpg"];

/// Outcome of a sibling lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCover {
    /// The album's resized cover.
    Cached(PathBuf),
    /// Some other image in the album directory.
    Image(PathBuf),
    /// No image next to the track.
    NotFound,
}

impl ResolvedCover {
    /// Path of the resolved file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Cached(p) | Self::Image(p) => Some(p),
            Self::NotFound => None,
        }
    }
}

/// Finds the best cover image next to a track.
#[derive(Debug, Clone)]
pub struct CoverResolver {
    cache_file_name: String,
}

impl CoverResolver {
    /// Creates a resolver that prefers `cache_file_name` above all else.
    pub fn new(cache_file_name: impl Into<String>) -> Self {
        Self {
            cache_file_name: cache_file_name.into(),
        }
    }

    /// Looks for a cover in `track`'s directory.
    ///
    /// The directory is listed afresh on every call. An unreadable directory
    /// counts as having no cover.
    pub async fn resolve(&self, track: &Path) -> ResolvedCover {
        let dir = track.parent().unwrap_or_else(|| Path::new("."));
        let names = match Self::list_files(dir).await {
            Ok(names) => names,
            Err(e) => {
                warn!("Failed to list {:?} while looking for a cover: {}", dir, e);
                return ResolvedCover::NotFound;
            }
        };

        let resolved = self.pick(dir, &names);
        debug!("Cover for {:?}: {:?}", track, resolved);
        resolved
    }

    /// Applies the preference order to a sorted list of file names.
    fn pick(&self, dir: &Path, names: &[String]) -> ResolvedCover {
        let find = |wanted: &str| {
            names
                .iter()
                .find(|n| n.eq_ignore_ascii_case(wanted))
                .map(|n| dir.join(n))
        };

        if let Some(path) = find(self.cache_file_name.as_str()) {
            return ResolvedCover::Cached(path);
        }

        for wanted in BUNDLED_COVER_NAMES.iter().chain(DOWNLOADED_COVER_NAMES) {
            if let Some(path) = find(*wanted) {
                return ResolvedCover::Image(path);
            }
        }

        names
            .iter()
            .find(|n| is_image_path(Path::new(n)))
            .map(|n| ResolvedCover::Image(dir.join(n)))
            .unwrap_or(ResolvedCover::NotFound)
    }

    async fn list_files(dir: &Path) -> std::io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
