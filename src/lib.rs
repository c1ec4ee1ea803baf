//! Video Downloader Pro library

pub mod downloader;
pub mod extractor;
pub mod server;
pub mod utils;

// Re-export main types for easier use
pub use extractor::{DownloadOptions, DownloadOutcome, Extractor, FormatChoice, YtDlpExtractor};
pub use server::{router, AppState};
pub use utils::{AppSettings, ServiceError};
