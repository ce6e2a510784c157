//! Library discovery.
//!
//! Walks the library root once per run and buckets every file by its
//! extension. Nothing here touches file contents.

mod classifier;
mod types;

pub use classifier::{classify, ClassifyError};
pub use types::{Library, MediaFile, TrackFormat};
