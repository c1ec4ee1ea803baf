//! Data structures describing a finished download

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Files reported by the downloader after post-processing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub files: Vec<PathBuf>,
}

impl DownloadOutcome {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// The file served for single-item downloads.
    ///
    /// yt-dlp prints the final path last, so the last entry wins.
    pub fn primary(&self) -> Option<&Path> {
        self.files.last().map(PathBuf::as_path)
    }
}
