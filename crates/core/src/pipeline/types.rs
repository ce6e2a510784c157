//! Types for the pipeline module.

use serde::Serialize;
use std::fmt;

use crate::library::{Library, TrackFormat};
use crate::planner::SkipReason;

/// What happened to a single track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Lossless source converted to the portable container.
    Converted {
        resized_cover: bool,
        source_deleted: bool,
    },
    /// Portable file normalized in place.
    Replaced { resized_cover: bool },
    /// Left alone.
    Skipped(SkipReason),
    /// Dry run: the commands that would have run.
    Planned { commands: Vec<String> },
}

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub lossless: usize,
    pub portable: usize,
    pub legacy: usize,
    pub unclassified: usize,
    pub converted: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub covers_resized: usize,
    pub sources_deleted: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dry_run_commands: Vec<String>,
}

impl RunReport {
    /// Starts a report with the classifier's bucket counts.
    pub fn for_library(library: &Library) -> Self {
        Self {
            lossless: library.count(TrackFormat::Lossless),
            portable: library.count(TrackFormat::PortableAudio),
            legacy: library.count(TrackFormat::LegacyCompressed),
            unclassified: library.count(TrackFormat::Unclassified),
            ..Self::default()
        }
    }

    /// Adds one track's outcome.
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Converted {
                resized_cover,
                source_deleted,
            } => {
                self.converted += 1;
                self.covers_resized += usize::from(resized_cover);
                self.sources_deleted += usize::from(source_deleted);
            }
            FileOutcome::Replaced { resized_cover } => {
                self.replaced += 1;
                self.covers_resized += usize::from(resized_cover);
            }
            FileOutcome::Skipped(_) => self.skipped += 1,
            FileOutcome::Planned { commands } => self.dry_run_commands.extend(commands),
        }
    }

    /// Counts a track whose processing failed.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Number of files written, replaced or deleted.
    pub fn mutations(&self) -> usize {
        self.converted + self.replaced + self.covers_resized + self.sources_deleted
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Library: {} lossless, {} portable, {} legacy, {} unclassified",
            self.lossless, self.portable, self.legacy, self.unclassified
        )?;
        write!(
            f,
            "Converted {}, replaced {}, skipped {}, failed {} ({} covers resized, {} sources deleted)",
            self.converted,
            self.replaced,
            self.skipped,
            self.failed,
            self.covers_resized,
            self.sources_deleted
        )?;
        if !self.dry_run_commands.is_empty() {
            write!(f, "\nDry run: {} commands printed", self.dry_run_commands.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MediaFile;

    #[test]
    fn test_report_counts() {
        let mut library = Library::default();
        library.push(MediaFile::new("/m/a.flac"));
        library.push(MediaFile::new("/m/b.m4a"));
        library.push(MediaFile::new("/m/c.mp3"));

        let mut report = RunReport::for_library(&library);
        report.record(FileOutcome::Converted {
            resized_cover: true,
            source_deleted: true,
        });
        report.record(FileOutcome::Skipped(SkipReason::AlreadyCompliant));
        report.record_failure();

        assert_eq!(report.lossless, 1);
        assert_eq!(report.portable, 1);
        assert_eq!(report.legacy, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.mutations(), 3);
    }

    #[test]
    fn test_dry_run_commands_collected() {
        let mut report = RunReport::default();
        report.record(FileOutcome::Planned {
            commands: vec!["ffmpeg -i a".to_string(), "ffmpeg -i b".to_string()],
        });
        assert_eq!(report.dry_run_commands.len(), 2);
        assert_eq!(report.mutations(), 0);
        assert!(report.to_string().contains("2 commands printed"));
    }

    #[test]
    fn test_serializes_without_empty_command_list() {
        let json = serde_json::to_value(RunReport::default()).unwrap();
        assert_eq!(json["converted"], 0);
        assert!(json.get("dry_run_commands").is_none());
    }
}
