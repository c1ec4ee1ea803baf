use crate::extractor::models::DownloadOutcome;
use crate::extractor::options::DownloadOptions;
use crate::utils::error::ServiceError;
use async_trait::async_trait;
use std::path::Path;

/// Seam between the HTTP layer and the external downloader
///
/// The server only knows this trait, so tests can swap in a fake that
/// writes files instead of running yt-dlp.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "ytdlp")
    fn id(&self) -> &'static str;

    /// Download `url` into `work_dir` according to `options`.
    ///
    /// Runs to completion; there is no progress reporting and no timeout.
    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        work_dir: &Path,
    ) -> Result<DownloadOutcome, ServiceError>;
}
