//! Work directories and playlist packaging

pub mod archive;
pub mod workdir;

pub use archive::{archive_directory, PLAYLIST_ARCHIVE};
pub use workdir::{sweep_stale, WorkDir};
