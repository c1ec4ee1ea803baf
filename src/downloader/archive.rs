//! Playlist packaging into a single zip file

use crate::utils::error::ServiceError;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// File name of the playlist archive, also used for the download
pub const PLAYLIST_ARCHIVE: &str = "playlist.zip";

/// Entries at or above this size need ZIP64 headers
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Archive everything under `src_dir` into `dest_zip`.
///
/// Every regular file is included, with no filtering. Entry names are
/// relative to `src_dir` and use `/` separators. `dest_zip` must live
/// outside `src_dir`. Returns the number of files written.
pub async fn archive_directory(src_dir: &Path, dest_zip: &Path) -> Result<u64, ServiceError> {
    if dest_zip.starts_with(src_dir) {
        return Err(ServiceError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "archive must be written outside the archived directory",
        )));
    }

    let src = src_dir.to_path_buf();
    let dest = dest_zip.to_path_buf();
    let files = tokio::task::spawn_blocking(move || write_archive(&src, &dest)).await??;

    info!(
        "Archived {} files from {} into {}",
        files,
        src_dir.display(),
        dest_zip.display()
    );
    Ok(files)
}

fn write_archive(src_dir: &Path, dest_zip: &Path) -> Result<u64, ServiceError> {
    let mut zip = ZipWriter::new(File::create(dest_zip)?);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut files = 0u64;
    add_directory(&mut zip, src_dir, src_dir, options, &mut files)?;
    zip.finish()?;
    Ok(files)
}

fn add_directory<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    base: &Path,
    dir: &Path,
    options: SimpleFileOptions,
    files: &mut u64,
) -> Result<(), ServiceError> {
    let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    // Stable entry order
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry_name(base, &path);
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
            add_directory(zip, base, &path, options, files)?;
        } else if file_type.is_file() {
            let mut source = File::open(&path)?;
            let len = source.metadata()?.len();
            debug!("Adding {} ({} bytes) to archive", name, len);
            zip.start_file(name, file_options(options, len))?;
            std::io::copy(&mut source, zip)?;
            *files += 1;
        }
    }

    Ok(())
}

/// Media is already compressed, so big entries are stored rather than
/// deflated.
fn file_options(base: SimpleFileOptions, len: u64) -> SimpleFileOptions {
    if len >= ZIP64_THRESHOLD {
        base.compression_method(CompressionMethod::Stored)
            .large_file(true)
    } else {
        base
    }
}

fn entry_name(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
