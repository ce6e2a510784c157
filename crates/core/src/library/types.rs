//! Types for the library module.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Bucket a discovered file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackFormat {
    /// Source to be converted (`.flac`).
    Lossless,
    /// Already in the portable container (`.m4a`), normalized in place.
    PortableAudio,
    /// Lossy legacy format (`.mp3`), counted only.
    LegacyCompressed,
    /// Anything else.
    Unclassified,
}

impl TrackFormat {
    /// Derives the bucket from a path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Unclassified;
        };

        if ext.eq_ignore_ascii_case("flac") {
            Self::Lossless
        } else if ext.eq_ignore_ascii_case("m4a") {
            Self::PortableAudio
        } else if ext.eq_ignore_ascii_case("mp3") {
            Self::LegacyCompressed
        } else {
            Self::Unclassified
        }
    }
}

/// A file found under the library root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub format: TrackFormat,
}

impl MediaFile {
    /// Classifies a path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = TrackFormat::from_path(&path);
        Self { path, format }
    }

    /// Directory holding the track (its album directory).
    pub fn album_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Sibling path sharing the file stem, with `suffix` appended to the stem
    /// and the extension replaced by `ext`.
    pub fn sibling_with(&self, suffix: &str, ext: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.album_dir().join(format!("{}{}.{}", stem, suffix, ext))
    }
}

/// Classified walk result. Paths keep traversal order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Library {
    pub lossless: Vec<PathBuf>,
    pub portable: Vec<PathBuf>,
    pub legacy: Vec<PathBuf>,
    pub unclassified: Vec<PathBuf>,
}

impl Library {
    /// Appends a file to its bucket.
    pub fn push(&mut self, file: MediaFile) {
        let bucket = match file.format {
            TrackFormat::Lossless => &mut self.lossless,
            TrackFormat::PortableAudio => &mut self.portable,
            TrackFormat::LegacyCompressed => &mut self.legacy,
            TrackFormat::Unclassified => &mut self.unclassified,
        };
        bucket.push(file.path);
    }

    /// Number of files in a bucket.
    pub fn count(&self, format: TrackFormat) -> usize {
        self.bucket(format).len()
    }

    /// Paths in a bucket.
    pub fn bucket(&self, format: TrackFormat) -> &[PathBuf] {
        match format {
            TrackFormat::Lossless => &self.lossless,
            TrackFormat::PortableAudio => &self.portable,
            TrackFormat::LegacyCompressed => &self.legacy,
            TrackFormat::Unclassified => &self.unclassified,
        }
    }

    /// Total number of files seen.
    pub fn total(&self) -> usize {
        self.lossless.len() + self.portable.len() + self.legacy.len() + self.unclassified.len()
    }
}
