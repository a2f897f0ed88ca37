//! Zoom geometry shared by the preview and still capture.
//!
//! The preview scales the live frame about its center. A still must show
//! exactly what the preview shows, so capture draws the full frame through
//! `scale(z)` followed by `translate(-w(z-1)/2z, -h(z-1)/2z)` into a surface
//! of the frame's native size. That is the same as cropping a centered
//! `w/z x h/z` region and stretching it over the output. Below 1x the
//! region is larger than the frame and the uncovered border stays black.

use super::ZoomLevel;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Affine transform applied to the drawing surface before the frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    /// Uniform scale factor.
    pub scale: f64,
    /// Horizontal offset after scaling, in pixels.
    pub translate_x: f64,
    /// Vertical offset after scaling, in pixels.
    pub translate_y: f64,
}

impl ZoomTransform {
    /// Transform that zooms a `width` x `height` frame about its center.
    pub fn new(zoom: ZoomLevel, width: u32, height: u32) -> Self {
        let z = zoom.factor();
        let (w, h) = (f64::from(width), f64::from(height));
        Self {
            scale: z,
            translate_x: -w * (z - 1.0) / (2.0 * z),
            translate_y: -h * (z - 1.0) / (2.0 * z),
        }
    }

    /// Region of source-frame coordinates that ends up covering the output.
    pub fn source_region(&self, width: u32, height: u32) -> SourceRegion {
        SourceRegion {
            x: -self.translate_x,
            y: -self.translate_y,
            width: f64::from(width) / self.scale,
            height: f64::from(height) / self.scale,
        }
    }
}

/// Rectangle in source pixels; may extend past the frame when zoomed out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRegion {
    /// Left edge in source pixels.
    pub x: f64,
    /// Top edge in source pixels.
    pub y: f64,
    /// Width in source pixels.
    pub width: f64,
    /// Height in source pixels.
    pub height: f64,
}

impl SourceRegion {
    /// Centered region visible at `zoom` for a `width x height` frame.
    pub fn centered(zoom: ZoomLevel, width: u32, height: u32) -> Self {
        ZoomTransform::new(zoom, width, height).source_region(width, height)
    }

    /// Center point of the region.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Renders `image` as seen through `zoom`, at the image's own size.
pub fn render_zoomed(image: &RgbImage, zoom: ZoomLevel) -> RgbImage {
    let (w, h) = image.dimensions();
    if zoom == ZoomLevel::ONE || w == 0 || h == 0 {
        return image.clone();
    }

    let z = zoom.factor();
    let region = SourceRegion::centered(zoom, w, h);
    let mut out = RgbImage::new(w, h);

    // Part of the region actually covered by source pixels.
    let x0 = region.x.max(0.0);
    let y0 = region.y.max(0.0);
    let x1 = (region.x + region.width).min(f64::from(w));
    let y1 = (region.y + region.height).min(f64::from(h));
    if x1 <= x0 || y1 <= y0 {
        return out;
    }

    let sx = (x0.round() as u32).min(w - 1);
    let sy = (y0.round() as u32).min(h - 1);
    let sw = ((x1 - x0).round() as u32).clamp(1, w - sx);
    let sh = ((y1 - y0).round() as u32).clamp(1, h - sy);
    let visible = imageops::crop_imm(image, sx, sy, sw, sh).to_image();

    let dw = (((x1 - x0) * z).round() as u32).clamp(1, w);
    let dh = (((y1 - y0) * z).round() as u32).clamp(1, h);
    let dx = ((x0 - region.x) * z).round() as i64;
    let dy = ((y0 - region.y) * z).round() as i64;

    let scaled = if (dw, dh) == (sw, sh) {
        visible
    } else {
        imageops::resize(&visible, dw, dh, FilterType::Triangle)
    };
    imageops::replace(&mut out, &scaled, dx, dy);
    out
}
