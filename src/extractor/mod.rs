pub mod models;
pub mod options;
pub mod traits;
pub mod ytdlp;

pub use models::DownloadOutcome;
pub use options::{DownloadOptions, FormatChoice, PostProcessor};
pub use traits::Extractor;
pub use ytdlp::YtDlpExtractor;
