//! Building file-download responses

use crate::downloader::workdir::WorkDir;
use crate::utils::error::ServiceError;
use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use std::path::Path;
use tokio_util::io::ReaderStream;
use tracing::info;

/// Stream `path` back as an attachment named `filename`.
///
/// The work directory travels inside the body stream and is removed once
/// the body is finished or dropped.
pub async fn file_attachment(
    work: WorkDir,
    path: &Path,
    filename: &str,
) -> Result<Response, ServiceError> {
    let file = tokio::fs::File::open(path).await?;
    let length = file.metadata().await?.len();

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type_for(path)));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(
        CONTENT_DISPOSITION,
        header_value(build_content_disposition(filename))?,
    );

    info!("Sending {} ({} bytes)", filename, length);

    let stream = ReaderStream::new(file).map(move |chunk| {
        let _guard = &work;
        chunk
    });

    Ok((headers, Body::from_stream(stream)).into_response())
}

fn header_value(value: String) -> Result<HeaderValue, ServiceError> {
    HeaderValue::try_from(value).map_err(|e| {
        ServiceError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "opus" | "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// `attachment` with an ASCII fallback name and the exact UTF-8 name.
pub fn build_content_disposition(filename: &str) -> String {
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitize_ascii_filename(filename),
        urlencoding::encode(filename)
    )
}

fn sanitize_ascii_filename(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() {
        "download".to_string()
    } else {
        sanitized
    }
}
