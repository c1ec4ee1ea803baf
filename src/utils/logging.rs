//! Tracing setup: stderr plus an append-only plain-text log file

use crate::utils::error::ServiceError;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_FILTER: &str = "video_downloader_pro=debug,tower_http=info";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop, so the caller must
/// hold it for the lifetime of the process. Fails if a global subscriber
/// is already installed.
pub fn init_logging(log_file: &Path) -> Result<WorkerGuard, ServiceError> {
    let file_name = log_file.file_name().ok_or_else(|| {
        ServiceError::InvalidConfig(format!("log file {} has no file name", log_file.display()))
    })?;
    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    build_subscriber(filter, non_blocking)
        .try_init()
        .map_err(|e| ServiceError::Logging(e.to_string()))?;

    Ok(guard)
}

/// Span fields are formatted once, by the first layer, and cached for the
/// others. The plain-text file layer must therefore come first.
fn build_subscriber<W>(filter: EnvFilter, file_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stderr))
}
