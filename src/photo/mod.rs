//! Still image payloads and their automatic download.

mod download;
mod encoding;

pub use download::{
    photo_file_name, DirectoryDownloads, DownloadRequest, DownloadSink, MemoryDownloads,
};
pub use encoding::{PhotoData, JPEG_MIME};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing or saving a still.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("failed to read frame: {0}")]
    Frame(#[from] crate::capture::PlatformError),
    #[error("frame buffer does not match its dimensions")]
    InvalidFrame,
    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
