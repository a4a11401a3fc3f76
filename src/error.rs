use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a file, folder or category was left out of the catalog.
///
/// None of these abort a build; the assembler logs them and keeps going.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("category folder for '{category}' not found under {root}")]
    MissingCategory { category: String, root: PathBuf },

    #[error("cannot read directory {path}: {source}")]
    UnreadableDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read playlist {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("playlist {path} has no playable entries")]
    NoEntries { path: PathBuf },

    #[error("series folder {path} has no playlist files")]
    EmptyFolder { path: PathBuf },

    #[error("series '{title}' has no non-empty seasons")]
    NoSeasons { title: String },
}

impl SkipReason {
    /// Short label used to group skips in the build summary
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::MissingCategory { .. } => "missing_category",
            SkipReason::UnreadableDir { .. } => "unreadable_dir",
            SkipReason::UnreadableFile { .. } => "unreadable_file",
            SkipReason::NoEntries { .. } => "no_entries",
            SkipReason::EmptyFolder { .. } => "empty_folder",
            SkipReason::NoSeasons { .. } => "no_seasons",
        }
    }
}
