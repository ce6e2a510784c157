//! Recursive walk of the library root.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::types::{Library, MediaFile, TrackFormat};

/// Errors that can occur while walking the library.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The root or one of its subdirectories could not be read.
    #[error("Failed to read library at {path}: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Walks `root` and buckets every regular file by extension.
///
/// Any read error aborts the walk.
pub fn classify(root: &Path) -> Result<Library, ClassifyError> {
    let mut library = Library::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| ClassifyError::Traversal {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let file = MediaFile::new(entry.into_path());
        debug!("Classified {:?} as {:?}", file.path, file.format);
        library.push(file);
    }

    info!(
        "Found {} files: {} lossless, {} portable, {} legacy, {} unclassified",
        library.total(),
        library.count(TrackFormat::Lossless),
        library.count(TrackFormat::PortableAudio),
        library.count(TrackFormat::LegacyCompressed),
        library.count(TrackFormat::Unclassified),
    );

    Ok(library)
}
