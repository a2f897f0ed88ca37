//! Raw frames pulled from a live stream.

use image::RgbImage;

/// Bytes per RGB8 pixel.
const CHANNELS: usize = 3;

/// A single frame pulled from a live stream.
///
/// Pixels are packed RGB8, row-major, at the stream's native resolution.
#[derive(Clone)]
pub struct Frame {
    rgb: Vec<u8>,
    width: u32,
    height: u32,
    /// Position within the stream, starting at 1.
    sequence: u64,
}

impl Frame {
    /// Wraps a packed RGB8 buffer of `width` x `height` pixels.
    pub fn new(rgb: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            rgb,
            width,
            height,
            sequence,
        }
    }

    /// Native width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Native height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Position of this frame within its stream.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Non-empty, and the buffer holds exactly one RGB triple per pixel.
    pub fn is_valid(&self) -> bool {
        let expected = (self.width as usize) * (self.height as usize) * CHANNELS;
        self.width > 0 && self.height > 0 && self.rgb.len() == expected
    }

    /// Converts into an image, or `None` if the buffer is malformed.
    pub fn into_rgb_image(self) -> Option<RgbImage> {
        if !self.is_valid() {
            return None;
        }
        RgbImage::from_raw(self.width, self.height, self.rgb)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Frame(#{} {}x{}, {} bytes)",
            self.sequence,
            self.width,
            self.height,
            self.rgb.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_frame_converts() {
        let frame = Frame::new(vec![7u8; 4 * 2 * 3], 4, 2, 3);

        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 3);
        let image = frame.into_rgb_image().unwrap();
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.get_pixel(3, 1).0, [7, 7, 7]);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        // One byte per pixel, as a grayscale source would deliver.
        let frame = Frame::new(vec![0u8; 640 * 480], 640, 480, 1);

        assert!(!frame.is_valid());
        assert!(frame.into_rgb_image().is_none());
    }

    #[test]
    fn test_zero_sized_frame_is_rejected() {
        assert!(!Frame::new(Vec::new(), 0, 0, 1).is_valid());
    }
}
