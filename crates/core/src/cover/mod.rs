//! Cover art resolution and the per-album resized cover.
//!
//! The resized cover is an ordinary file in the album directory. There is no
//! in-memory cache: every track re-lists its directory, so once one track has
//! written the file, every later track (in this run or the next) finds it first.
//!
//! This relies on tracks being processed one at a time. Processing tracks of
//! the same album concurrently would need a per-directory lock around
//! [`CoverCache::materialize`].

mod cache;
mod resolver;
mod types;

pub(crate) use cache::discard;
pub use cache::{square_filter, CoverCache, CoverCacheError, MaterializedCover};
pub use resolver::{CoverResolver, ResolvedCover, BUNDLED_COVER_NAMES, DOWNLOADED_COVER_NAMES};
pub use types::CoverSource;

use std::path::Path;

/// Extensions treated as cover images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Whether `path` has an image extension (case-insensitive).
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|i| ext.eq_ignore_ascii_case(i)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("/m/cover.jpg")));
        assert!(is_image_path(Path::new("/m/Folder.JPEG")));
        assert!(is_image_path(Path::new("scan.png")));
        assert!(!is_image_path(Path::new("/m/a.flac")));
        assert!(!is_image_path(Path::new("/m/jpg")));
    }
}
