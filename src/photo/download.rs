//! Local file emission for captured stills.
//!
//! Every capture synthesizes a [`DownloadRequest`] and hands it to a
//! [`DownloadSink`] without asking the user. The request is a value so it
//! can be asserted on separately from the photo callback.

use super::{PhotoData, PhotoError};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// `photo-YYYY-MM-DDTHH-MM-SS.jpg` for the given UTC instant.
pub fn photo_file_name(at: DateTime<Utc>) -> String {
    format!("photo-{}.jpg", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// A synthesized, auto-triggered download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Suggested file name.
    pub file_name: String,
    /// Encoded still to write.
    pub photo: PhotoData,
}

impl DownloadRequest {
    /// Builds a request named after the capture instant `at`.
    pub fn new(photo: PhotoData, at: DateTime<Utc>) -> Self {
        Self {
            file_name: photo_file_name(at),
            photo,
        }
    }

    /// Link target, as a data URL.
    pub fn href(&self) -> String {
        self.photo.data_url()
    }
}

/// Destination for automatic downloads.
pub trait DownloadSink {
    fn save(&mut self, request: &DownloadRequest) -> Result<(), PhotoError>;
}

/// Writes downloads into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    /// Saves into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First free path for `file_name`, adding " (n)" before the extension
    /// when an earlier download already took the name.
    fn free_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        let (stem, ext) = file_name.rsplit_once('.').unwrap_or((file_name, ""));
        (1u32..)
            .map(|n| match ext {
                "" => self.dir.join(format!("{} ({})", stem, n)),
                _ => self.dir.join(format!("{} ({}).{}", stem, n, ext)),
            })
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }
}

impl DownloadSink for DirectoryDownloads {
    fn save(&mut self, request: &DownloadRequest) -> Result<(), PhotoError> {
        let to_error = |path: &Path, source| PhotoError::Save {
            path: path.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(|e| to_error(self.dir.as_path(), e))?;
        let path = self.free_path(&request.file_name);
        std::fs::write(&path, request.photo.bytes()).map_err(|e| to_error(path.as_path(), e))?;

        tracing::info!(path = %path.display(), bytes = request.photo.bytes().len(), "Photo saved");
        Ok(())
    }
}

/// Keeps downloads in memory. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemoryDownloads {
    saved: Rc<RefCell<Vec<DownloadRequest>>>,
}

impl MemoryDownloads {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of every saved request, oldest first.
    pub fn saved(&self) -> Vec<DownloadRequest> {
        self.saved.borrow().clone()
    }

    /// Number of saved requests.
    pub fn len(&self) -> usize {
        self.saved.borrow().len()
    }

    /// Whether nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.saved.borrow().is_empty()
    }
}

impl DownloadSink for MemoryDownloads {
    fn save(&mut self, request: &DownloadRequest) -> Result<(), PhotoError> {
        self.saved.borrow_mut().push(request.clone());
        Ok(())
    }
}
