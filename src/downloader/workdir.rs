//! Per-request working directories
//!
//! Each download gets `<download_root>/<uuid>/`. yt-dlp writes into its
//! `media/` subdirectory and the playlist archive sits next to it. Dropping
//! the [`WorkDir`] removes the whole tree, so every response ends up
//! cleaned whether it succeeded or not.

use crate::downloader::archive::PLAYLIST_ARCHIVE;
use crate::utils::error::ServiceError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

const MEDIA_DIR: &str = "media";

/// Scratch directory owned by one request
#[derive(Debug)]
pub struct WorkDir {
    root: PathBuf,
    media: PathBuf,
}

impl WorkDir {
    pub async fn create(download_root: &Path) -> Result<Self, ServiceError> {
        let root = download_root.join(Uuid::new_v4().to_string());
        let media = root.join(MEDIA_DIR);
        tokio::fs::create_dir_all(&media).await?;
        debug!("Created work directory {}", root.display());
        Ok(Self { root, media })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Where yt-dlp writes its output
    pub fn media_dir(&self) -> &Path {
        &self.media
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(PLAYLIST_ARCHIVE)
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        let root = std::mem::take(&mut self.root);
        // Keep blocking removal off runtime worker threads
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let _ = handle.spawn_blocking(move || remove_tree(&root));
            }
            Err(_) => remove_tree(&root),
        }
    }
}

fn remove_tree(root: &Path) {
    match std::fs::remove_dir_all(root) {
        Ok(()) => debug!("Removed work directory {}", root.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => debug!("Ignoring cleanup failure for {}: {}", root.display(), e),
    }
}

/// Remove work directories left behind by a previous run.
///
/// Only directories named like a UUID are touched. Returns how many were removed.
pub async fn sweep_stale(download_root: &Path) -> usize {
    let mut entries = match tokio::fs::read_dir(download_root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return 0,
        Err(e) => {
            warn!("Cannot read {}: {}", download_root.display(), e);
            return 0;
        }
    };

    let mut removed = 0;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let is_job = entry
            .file_name()
            .to_str()
            .map(|name| Uuid::parse_str(name).is_ok())
            .unwrap_or(false);

        if is_job && path.is_dir() {
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => removed += 1,
                Err(e) => debug!("Ignoring cleanup failure for {}: {}", path.display(), e),
            }
        }
    }

    if removed > 0 {
        info!("Removed {} stale work directories", removed);
    }
    removed
}
