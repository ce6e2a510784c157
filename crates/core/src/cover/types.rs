//! Types for the cover module.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where the cover attached to an output comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum CoverSource {
    /// Copy the track's own attached picture.
    EmbeddedStreamCopy,
    /// A sibling image file, attached as a second input.
    ExternalImage(PathBuf),
    /// The album's resized cover, attached as a second input.
    CachedResizedImage(PathBuf),
    /// No cover attached.
    None,
}

impl CoverSource {
    /// Image file to pass as a second input, if any.
    pub fn secondary_input(&self) -> Option<&Path> {
        match self {
            Self::ExternalImage(path) | Self::CachedResizedImage(path) => Some(path),
            Self::EmbeddedStreamCopy | Self::None => None,
        }
    }

    /// Whether any cover will be attached.
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_input() {
        let cached = CoverSource::CachedResizedImage(PathBuf::from("/m/cover-resized.jpg"));
        assert_eq!(
            cached.secondary_input(),
            Some(Path::new("/m/cover-resized.jpg"))
        );
        assert_eq!(CoverSource::EmbeddedStreamCopy.secondary_input(), None);
        assert!(!CoverSource::None.is_some());
        assert!(CoverSource::EmbeddedStreamCopy.is_some());
    }
}
