//! yt-dlp wrapper for downloading media
//!
//! yt-dlp runs as a child process. Its final output paths come back on
//! stdout through `--print after_move:filepath`.

use crate::extractor::models::DownloadOutcome;
use crate::extractor::options::DownloadOptions;
use crate::extractor::traits::Extractor;
use crate::utils::error::ServiceError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Downloader backed by the yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    ytdlp_path: PathBuf,
}

impl YtDlpExtractor {
    /// Locate yt-dlp and build an extractor.
    ///
    /// An explicit path is used as-is when it exists. Otherwise the
    /// search order is: next to the executable, `PATH`, common
    /// install locations.
    pub fn new(explicit: Option<&Path>) -> Result<Self, ServiceError> {
        if let Some(path) = explicit {
            if path.is_file() {
                info!("Using configured yt-dlp: {}", path.display());
                return Ok(Self::with_path(path));
            }
            warn!("Configured yt-dlp {} does not exist, searching", path.display());
        }

        match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                Ok(Self { ytdlp_path: path })
            }
            None => Err(ServiceError::YtDlpNotFound),
        }
    }

    /// Use a specific binary without any lookup
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: path.into(),
        }
    }

    /// Get the path to yt-dlp being used
    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }

    /// `yt-dlp --version`
    pub async fn version(&self) -> Result<String, ServiceError> {
        let output = Command::new(&self.ytdlp_path)
            .arg("--version")
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(ServiceError::DownloadFailed(failure_message(&output.stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "ytdlp"
    }

    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        work_dir: &Path,
    ) -> Result<DownloadOutcome, ServiceError> {
        let args = options.to_args(work_dir);
        info!("Downloading {} (format {})", url, options.format);
        debug!("yt-dlp args: {:?}", args);

        // `--` keeps a URL starting with '-' from being read as a flag.
        let output = Command::new(&self.ytdlp_path)
            .args(&args)
            .arg("--")
            .arg(url)
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            let message = failure_message(&output.stderr);
            error!("yt-dlp download failed: {}", message);
            return Err(ServiceError::DownloadFailed(message));
        }

        let files = parse_printed_paths(&output.stdout, work_dir);
        for file in &files {
            info!("Downloaded file: {}", file.display());
        }

        Ok(DownloadOutcome::new(files))
    }
}

fn spawn_error(err: std::io::Error) -> ServiceError {
    if err.kind() == ErrorKind::NotFound {
        ServiceError::YtDlpNotFound
    } else {
        ServiceError::Io(err)
    }
}

/// Pick the user-facing message out of yt-dlp's stderr.
///
/// `ERROR:` lines are what yt-dlp uses for the actual failure; anything
/// else (deprecation notices, debug chatter) is only used as a fallback.
pub fn failure_message(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let errors: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("ERROR:"))
        .collect();

    let message = if errors.is_empty() {
        text.trim().to_string()
    } else {
        errors.join("\n")
    };

    if message.is_empty() {
        "yt-dlp exited with an error".to_string()
    } else {
        message
    }
}

/// Parse the paths printed by `--print after_move:filepath`
pub fn parse_printed_paths(stdout: &[u8], work_dir: &Path) -> Vec<PathBuf> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let path = PathBuf::from(line);
            if path.is_absolute() {
                path
            } else {
                work_dir.join(path)
            }
        })
        .collect()
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find yt-dlp binary with priority:
/// 1. Next to the executable
/// 2. System PATH
/// 3. Common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(adjacent) = find_adjacent_ytdlp() {
        info!("✓ Using bundled yt-dlp: {:?}", adjacent);
        return Some(adjacent);
    }

    if let Ok(system) = which::which(binary_name()) {
        info!("✓ Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("✓ Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("✗ yt-dlp not found anywhere!");
    None
}

fn binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

/// yt-dlp shipped alongside the server binary (containers, zipped releases)
fn find_adjacent_ytdlp() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let candidate = exe_path.parent()?.join(binary_name());
    debug!("Checking adjacent path: {:?}", candidate);

    if candidate.is_file() && is_executable(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "/opt/homebrew/bin/yt-dlp",
        "~/.local/bin/yt-dlp",
    ];

    for path_str in common_paths {
        let expanded = match path_str.strip_prefix("~/") {
            Some(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            },
            None => PathBuf::from(path_str),
        };

        if expanded.is_file() && is_executable(&expanded) {
            return Some(expanded);
        }
    }

    None
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::options::FormatChoice;

    #[test]
    fn test_find_ytdlp() {
        // yt-dlp might not be installed in CI, but a hit must be usable
        if let Some(path) = find_ytdlp() {
            assert!(path.is_file(), "{:?}", path);
            assert!(is_executable(&path), "{:?}", path);
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            assert!(name.starts_with("yt-dlp"), "{:?}", path);
        }
    }

    #[test]
    fn test_is_executable() {
        let path = PathBuf::from("/bin/sh");
        if path.exists() {
            assert!(is_executable(&path));
        }
        assert!(!is_executable(Path::new("/definitely/not/here")));
    }

    #[test]
    fn test_parse_printed_paths() {
        let stdout = b"/abs/video.mp4\n\n  rel/audio.mp3  \n";
        let paths = parse_printed_paths(stdout, Path::new("/work"));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/abs/video.mp4"),
                PathBuf::from("/work/rel/audio.mp3"),
            ]
        );
        assert!(parse_printed_paths(b"", Path::new("/work")).is_empty());
    }

    #[test]
    fn test_failure_message_prefers_error_lines() {
        let stderr = b"WARNING: something\nERROR: [generic] Unsupported URL: https://x\n";
        assert_eq!(
            failure_message(stderr),
            "ERROR: [generic] Unsupported URL: https://x"
        );
        assert_eq!(failure_message(b"  boom \n"), "boom");
        assert_eq!(failure_message(b""), "yt-dlp exited with an error");
    }

    #[tokio::test]
    async fn test_missing_binary_maps_to_not_found() {
        let extractor = YtDlpExtractor::with_path("/definitely/not/yt-dlp");
        let options = DownloadOptions::for_choice(FormatChoice::Best);
        let err = extractor
            .download("https://example.com", &options, Path::new("/tmp"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::YtDlpNotFound));
    }

    #[test]
    fn test_explicit_missing_path_falls_back_to_search() {
        let result = YtDlpExtractor::new(Some(Path::new("/definitely/not/yt-dlp")));
        match result {
            Ok(extractor) => assert_ne!(
                extractor.ytdlp_path(),
                Path::new("/definitely/not/yt-dlp")
            ),
            Err(err) => assert!(matches!(err, ServiceError::YtDlpNotFound)),
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_binary_is_logged_once() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            YtDlpExtractor::new(Some(Path::new("/definitely/not/yt-dlp")))
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        let reports = output.matches("not found anywhere").count();
        match result {
            Ok(_) => assert_eq!(reports, 0, "{}", output),
            Err(_) => assert_eq!(reports, 1, "{}", output),
        }
    }

    /// Runs a stand-in yt-dlp script through the real process plumbing.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_with_stub_script() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let work_dir = temp.path().join("media");
        std::fs::create_dir_all(&work_dir).unwrap();

        let ok_script = temp.path().join("ok-ytdlp");
        std::fs::write(
            &ok_script,
            "#!/bin/sh\n\
             while [ $# -gt 0 ]; do\n\
               if [ \"$1\" = \"--paths\" ]; then dir=\"$2\"; fi\n\
               shift\n\
             done\n\
             echo data > \"$dir/video.mp4\"\n\
             echo \"$dir/video.mp4\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&ok_script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let fail_script = temp.path().join("fail-ytdlp");
        std::fs::write(
            &fail_script,
            "#!/bin/sh\necho 'ERROR: [generic] Unsupported URL: nope' >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&fail_script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let options = DownloadOptions::for_choice(FormatChoice::Best);

        let outcome = YtDlpExtractor::with_path(&ok_script)
            .download("https://example.com/v", &options, &work_dir)
            .await
            .unwrap();
        assert_eq!(outcome.primary(), Some(work_dir.join("video.mp4").as_path()));
        assert!(work_dir.join("video.mp4").exists());

        let err = YtDlpExtractor::with_path(&fail_script)
            .download("nope", &options, &work_dir)
            .await
            .unwrap_err();
        match err {
            ServiceError::DownloadFailed(msg) => {
                assert_eq!(msg, "ERROR: [generic] Unsupported URL: nope")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
