//! Mapping from the form's format choice to yt-dlp options

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Format choice offered by the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatChoice {
    #[default]
    Best,
    P720,
    P1080,
    Mp3,
    Playlist,
}

impl FormatChoice {
    pub const ALL: [FormatChoice; 5] = [
        FormatChoice::Best,
        FormatChoice::P720,
        FormatChoice::P1080,
        FormatChoice::Mp3,
        FormatChoice::Playlist,
    ];

    /// Parse a form value. Unknown values fall back to `Best`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "720p" => FormatChoice::P720,
            "1080p" => FormatChoice::P1080,
            "mp3" => FormatChoice::Mp3,
            "playlist" => FormatChoice::Playlist,
            _ => FormatChoice::Best,
        }
    }

    /// Value used in the form's `<option>`
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatChoice::Best => "best",
            FormatChoice::P720 => "720p",
            FormatChoice::P1080 => "1080p",
            FormatChoice::Mp3 => "mp3",
            FormatChoice::Playlist => "playlist",
        }
    }

    /// Human label for the form
    pub fn label(&self) -> &'static str {
        match self {
            FormatChoice::Best => "Best video quality (with audio)",
            FormatChoice::P720 => "720p (with audio)",
            FormatChoice::P1080 => "1080p (with audio)",
            FormatChoice::Mp3 => "Audio only (MP3)",
            FormatChoice::Playlist => "Whole playlist (with audio)",
        }
    }
}

impl fmt::Display for FormatChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post-processing stage run by yt-dlp after the download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostProcessor {
    /// FFmpegExtractAudio
    ExtractAudio { codec: String, quality: String },
}

/// Downloader configuration derived from a [`FormatChoice`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// Format selector expression (`-f`)
    pub format: String,
    /// Output template, relative to the work directory
    pub output_template: String,
    pub merge_output_format: Option<String>,
    pub postprocessors: Vec<PostProcessor>,
    pub yes_playlist: bool,
}

const BEST_SELECTOR: &str = "bestvideo+bestaudio/best";
const VIDEO_TEMPLATE: &str = "video.%(ext)s";

impl DownloadOptions {
    pub fn for_choice(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Mp3 => Self {
                format: "bestaudio/best".to_string(),
                output_template: "audio.%(ext)s".to_string(),
                merge_output_format: None,
                postprocessors: vec![PostProcessor::ExtractAudio {
                    codec: "mp3".to_string(),
                    quality: "192".to_string(),
                }],
                yes_playlist: false,
            },
            FormatChoice::Playlist => Self {
                format: BEST_SELECTOR.to_string(),
                output_template: "%(playlist_title)s/%(title)s.%(ext)s".to_string(),
                merge_output_format: Some("mp4".to_string()),
                postprocessors: Vec::new(),
                yes_playlist: true,
            },
            FormatChoice::Best => Self::video(BEST_SELECTOR),
            FormatChoice::P720 => Self::video("bestvideo[height<=720]+bestaudio/best"),
            FormatChoice::P1080 => Self::video("bestvideo[height<=1080]+bestaudio/best"),
        }
    }

    fn video(selector: &str) -> Self {
        Self {
            format: selector.to_string(),
            output_template: VIDEO_TEMPLATE.to_string(),
            merge_output_format: Some("mp4".to_string()),
            postprocessors: Vec::new(),
            yes_playlist: false,
        }
    }

    /// Render as yt-dlp command-line arguments (without the URL).
    ///
    /// `--print after_move:filepath` makes yt-dlp report the final path of
    /// every item after post-processing, one per line.
    pub fn to_args(&self, work_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--no-progress".to_string(),
            "--no-warnings".to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--paths".to_string(),
            work_dir.to_string_lossy().into_owned(),
            "-o".to_string(),
            self.output_template.clone(),
            "-f".to_string(),
            self.format.clone(),
        ];

        if let Some(merge) = &self.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(merge.clone());
        }

        for pp in &self.postprocessors {
            match pp {
                PostProcessor::ExtractAudio { codec, quality } => {
                    args.push("-x".to_string());
                    args.push("--audio-format".to_string());
                    args.push(codec.clone());
                    args.push("--audio-quality".to_string());
                    args.push(quality.clone());
                }
            }
        }

        args.push(if self.yes_playlist {
            "--yes-playlist".to_string()
        } else {
            "--no-playlist".to_string()
        });

        args
    }
}
