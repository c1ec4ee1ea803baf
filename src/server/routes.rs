//! Request handlers

use crate::downloader::archive::{archive_directory, PLAYLIST_ARCHIVE};
use crate::downloader::workdir::WorkDir;
use crate::extractor::options::{DownloadOptions, FormatChoice};
use crate::server::page::{render_page, Notice};
use crate::server::response::file_attachment;
use crate::server::AppState;
use crate::utils::error::ServiceError;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Body of `POST /download`
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub format: String,
}

pub async fn index() -> Html<String> {
    Html(render_page(None))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn download(
    State(state): State<AppState>,
    Form(request): Form<DownloadRequest>,
) -> Response {
    let choice = FormatChoice::parse(&request.format);
    let url = request.url.trim();

    match perform_download(&state, url, choice).await {
        Ok(response) => response,
        Err(err) => {
            error!("Download of {:?} ({}) failed: {}", url, choice, err);
            error_page(&err)
        }
    }
}

/// Failures are shown on the form itself, with a 200 like any page view.
fn error_page(err: &ServiceError) -> Response {
    let notice = Notice::error(format!("Download failed: {}", err));
    Html(render_page(Some(&notice))).into_response()
}

async fn perform_download(
    state: &AppState,
    url: &str,
    choice: FormatChoice,
) -> Result<Response, ServiceError> {
    if url.is_empty() {
        return Err(ServiceError::DownloadFailed("no URL given".to_string()));
    }

    let options = DownloadOptions::for_choice(choice);
    let work = WorkDir::create(&state.settings.download_dir).await?;
    info!(
        "Starting {} download of {} in {}",
        choice,
        url,
        work.path().display()
    );

    let outcome = state
        .extractor
        .download(url, &options, work.media_dir())
        .await?;

    if choice == FormatChoice::Playlist {
        let archive = work.archive_path();
        archive_directory(work.media_dir(), &archive).await?;
        return file_attachment(work, &archive, PLAYLIST_ARCHIVE).await;
    }

    let file: PathBuf = match outcome.primary() {
        Some(path) => path.to_path_buf(),
        None => work.media_dir().join(&options.output_template),
    };

    if !tokio::fs::metadata(&file)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        warn!("yt-dlp reported {} but it does not exist", file.display());
        return Err(ServiceError::MissingOutput(file));
    }

    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "download".to_string());

    file_attachment(work, &file, &filename).await
}
