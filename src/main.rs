//! Video Downloader Pro - web form in front of yt-dlp
//!
//! Serves a single page where a video URL and a format are submitted; the
//! resulting file (or a zip for playlists) is sent back to the browser.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use video_downloader_pro::utils::config::DEFAULT_PORT;
use video_downloader_pro::utils::{init_logging, AppSettings};
use video_downloader_pro::{server, Extractor, YtDlpExtractor};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Root directory for per-request downloads
    #[arg(long, env = "DOWNLOAD_DIR", default_value = "downloads")]
    download_dir: PathBuf,

    /// Append-only log file
    #[arg(long, env = "LOG_FILE", default_value = "app.log")]
    log_file: PathBuf,

    /// Use this yt-dlp binary instead of searching for one
    #[arg(long, env = "YTDLP_PATH")]
    ytdlp_path: Option<PathBuf>,
}

impl From<Args> for AppSettings {
    fn from(args: Args) -> Self {
        AppSettings {
            host: args.host,
            port: args.port,
            download_dir: args.download_dir,
            log_file: args.log_file,
            ytdlp_path: args.ytdlp_path,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings: AppSettings = Args::parse().into();
    settings.validate()?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&settings.log_file).context("failed to initialize logging")?;
    debug!("Settings: {}", serde_json::to_string(&settings)?);

    let extractor = load_extractor(&settings).await;
    server::run(settings, extractor).await?;

    Ok(())
}

/// Locate yt-dlp. A missing binary is not fatal: the server still starts
/// and every download reports it on the page.
async fn load_extractor(settings: &AppSettings) -> Arc<dyn Extractor> {
    match YtDlpExtractor::new(settings.ytdlp_path.as_deref()) {
        Ok(extractor) => {
            match extractor.version().await {
                Ok(version) => info!("yt-dlp version {}", version),
                Err(e) => warn!("Could not read yt-dlp version: {}", e),
            }
            Arc::new(extractor)
        }
        Err(e) => {
            warn!("{}; downloads will fail until it is installed", e);
            warn!("Install with: pip install yt-dlp (or see https://github.com/yt-dlp/yt-dlp)");
            Arc::new(YtDlpExtractor::with_path("yt-dlp"))
        }
    }
}
