//! Gallery shell around the capture widget.
//!
//! Collects every captured still, newest first, and renders only the most
//! recent ones as thumbnails. Nothing is ever removed from the list.

use crate::capture::{CameraPlatform, GalleryConfig};
use crate::photo::PhotoData;
use crate::widget::CaptureWidget;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Heading shown above the thumbnails.
pub const GALLERY_HEADING: &str = "Recent Photos";

/// Captured stills, newest first.
#[derive(Debug, Clone, Default)]
pub struct PhotoList {
    photos: VecDeque<PhotoData>,
}

impl PhotoList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `photo` at the front.
    pub fn prepend(&mut self, photo: PhotoData) {
        self.photos.push_front(photo);
    }

    /// Number of photos held.
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Whether no photo has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// All photos, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &PhotoData> {
        self.photos.iter()
    }

    /// The first `limit` photos.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &PhotoData> {
        self.photos.iter().take(limit)
    }
}

/// One rendered thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Data URL usable as an image source.
    pub src: String,
    /// "Photo 1", "Photo 2", ... in display order.
    pub alt: String,
}

/// What the gallery draws. Absent while no photo exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    /// Section heading.
    pub heading: &'static str,
    /// Thumbnails, newest first.
    pub thumbnails: Vec<Thumbnail>,
}

/// Composes a [`CaptureWidget`] with the list of its captures.
pub struct GalleryShell<P: CameraPlatform> {
    widget: CaptureWidget<P>,
    photos: Rc<RefCell<PhotoList>>,
    config: GalleryConfig,
}

impl<P: CameraPlatform> GalleryShell<P> {
    /// Wraps `widget` and subscribes to its captures.
    pub fn new(widget: CaptureWidget<P>, config: GalleryConfig) -> Self {
        let photos = Rc::new(RefCell::new(PhotoList::new()));
        let list = Rc::clone(&photos);
        widget.on_photo_taken(move |photo| record(&list, photo.clone()));

        Self {
            widget,
            photos,
            config,
        }
    }

    /// The wrapped widget.
    pub fn widget(&self) -> &CaptureWidget<P> {
        &self.widget
    }

    /// Records a capture event.
    pub fn on_photo_captured(&self, photo: PhotoData) {
        record(&self.photos, photo);
    }

    /// Number of photos retained, including ones not rendered.
    pub fn len(&self) -> usize {
        self.photos.borrow().len()
    }

    /// Whether no photo has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.photos.borrow().is_empty()
    }

    /// Every retained photo, newest first.
    pub fn photos(&self) -> Vec<PhotoData> {
        self.photos.borrow().iter().cloned().collect()
    }

    /// Renders the newest thumbnails, or `None` while the list is empty.
    pub fn render(&self) -> Option<GalleryView> {
        let photos = self.photos.borrow();
        if photos.is_empty() {
            return None;
        }

        let thumbnails = photos
            .recent(self.config.max_thumbnails)
            .enumerate()
            .map(|(i, photo)| Thumbnail {
                src: photo.data_url(),
                alt: format!("Photo {}", i + 1),
            })
            .collect();

        Some(GalleryView {
            heading: GALLERY_HEADING,
            thumbnails,
        })
    }
}

fn record(photos: &RefCell<PhotoList>, photo: PhotoData) {
    let mut photos = photos.borrow_mut();
    photos.prepend(photo);
    tracing::debug!(total = photos.len(), "Gallery updated");
}
