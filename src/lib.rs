//! Camera Capture Widget Library
//!
//! A camera widget with live preview, digital zoom, front/back switching
//! and still capture, plus a small gallery that collects the captures.
//! Hardware access, permission prompts and video decoding belong to the
//! host platform behind the [`capture::CameraPlatform`] trait.
//!
//! # Architecture
//!
//! ```text
//! CameraPlatform → CaptureWidget → (photo callback) → GalleryShell
//!                       ↓
//!                  DownloadSink (photo-<timestamp>.jpg)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use futures::executor::block_on;
//! use snapcam::{
//!     capture::{CaptureConfig, GalleryConfig, MockPlatform},
//!     gallery::GalleryShell,
//!     photo::DirectoryDownloads,
//!     widget::CaptureWidget,
//! };
//!
//! let widget = CaptureWidget::new(
//!     MockPlatform::new(),
//!     CaptureConfig::default(),
//!     DirectoryDownloads::new("photos"),
//! );
//! let gallery = GalleryShell::new(widget.clone(), GalleryConfig::default());
//!
//! block_on(widget.start_camera()).unwrap();
//! widget.zoom_in();
//! widget.take_photo().unwrap();
//!
//! assert_eq!(gallery.render().unwrap().thumbnails.len(), 1);
//! widget.teardown();
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod gallery;
pub mod metrics;
pub mod photo;
pub mod widget;

// Re-export commonly used types at crate root
pub use capture::{CameraPlatform, CaptureConfig, FacingMode, FileConfig, Frame, MockPlatform};
pub use gallery::{GalleryShell, GalleryView};
pub use photo::{DownloadRequest, DownloadSink, PhotoData};
pub use widget::{CameraError, CaptureWidget, WidgetStatus, WidgetView, ZoomLevel};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
