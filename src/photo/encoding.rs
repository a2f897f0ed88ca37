//! Still image encoding.
//!
//! A captured still is carried as JPEG bytes and rendered on demand as a
//! `data:` URL, which works both as a thumbnail source and as a download
//! href.

use super::PhotoError;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use std::sync::Arc;

/// MIME type of every still.
pub const JPEG_MIME: &str = "image/jpeg";

/// An encoded still image. Cloning shares the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoData {
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl PhotoData {
    /// Encodes `image` as JPEG at `quality` (1-100).
    pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Self, PhotoError> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            size = buffer.len(),
            quality,
            "JPEG encoded"
        );

        Ok(Self {
            bytes: buffer.into(),
            width: image.width(),
            height: image.height(),
        })
    }

    /// Raw JPEG bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the encoder produced no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Self-describing `data:image/jpeg;base64,...` form.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", JPEG_MIME, BASE64_STANDARD.encode(&self.bytes))
    }
}

impl std::fmt::Debug for PhotoData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("jpeg_bytes", &self.bytes.len())
            .finish()
    }
}
