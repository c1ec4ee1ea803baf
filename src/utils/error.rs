//! Error handling for Video Downloader Pro

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("{0}")]
    DownloadFailed(String),

    /// The path is for the log only; the message is shown to users
    #[error("file not found after download")]
    MissingOutput(PathBuf),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Background task failed: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Join(err.to_string())
    }
}
