//! Digital zoom level.

use std::fmt;

/// Zoom factor in tenths, bounded to 0.5x..=3.0x.
///
/// Stored as an integer so repeated steps land exactly on the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    /// Smallest zoom, 0.5x.
    pub const MIN: ZoomLevel = ZoomLevel(5);
    /// Largest zoom, 3.0x.
    pub const MAX: ZoomLevel = ZoomLevel(30);
    /// Unzoomed, 1.0x.
    pub const ONE: ZoomLevel = ZoomLevel(10);

    /// Nearest level to `factor`, clamped to the bounds.
    pub fn from_factor(factor: f64) -> Self {
        if !factor.is_finite() {
            return Self::ONE;
        }
        let tenths = (factor * 10.0).round().clamp(Self::MIN.0 as f64, Self::MAX.0 as f64);
        ZoomLevel(tenths as u8)
    }

    /// One step (0.1x) closer, saturating at 3.0x.
    #[must_use]
    pub fn zoomed_in(self) -> Self {
        ZoomLevel((self.0 + 1).min(Self::MAX.0))
    }

    /// One step (0.1x) wider, saturating at 0.5x.
    #[must_use]
    pub fn zoomed_out(self) -> Self {
        ZoomLevel(self.0.saturating_sub(1).max(Self::MIN.0))
    }

    /// Scale factor applied to preview and capture.
    #[inline]
    pub fn factor(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Whether another zoom-in step is possible.
    #[inline]
    pub fn can_zoom_in(self) -> bool {
        self < Self::MAX
    }

    /// Whether another zoom-out step is possible.
    #[inline]
    pub fn can_zoom_out(self) -> bool {
        self > Self::MIN
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x", self.factor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fifty_steps_in_stop_at_max() {
        let mut zoom = ZoomLevel::ONE;
        for _ in 0..50 {
            zoom = zoom.zoomed_in();
        }
        assert_eq!(zoom, ZoomLevel::MAX);
        assert_eq!(zoom.factor(), 3.0);
        assert!(!zoom.can_zoom_in());
    }

    #[test]
    fn test_steps_out_stop_at_min() {
        let mut zoom = ZoomLevel::ONE;
        for _ in 0..6 {
            zoom = zoom.zoomed_out();
        }
        assert_eq!(zoom.factor(), 0.5);
        assert_eq!(zoom.zoomed_out(), zoom);
        assert!(!zoom.can_zoom_out());
    }

    #[test]
    fn test_display() {
        assert_eq!(ZoomLevel::ONE.zoomed_in().to_string(), "1.1x");
        assert_eq!(ZoomLevel::MIN.to_string(), "0.5x");
    }

    #[test]
    fn test_from_factor_clamps() {
        assert_eq!(ZoomLevel::from_factor(10.0), ZoomLevel::MAX);
        assert_eq!(ZoomLevel::from_factor(0.0), ZoomLevel::MIN);
        assert_eq!(ZoomLevel::from_factor(f64::NAN), ZoomLevel::ONE);
        assert_eq!(ZoomLevel::from_factor(1.24).factor(), 1.2);
    }

    proptest! {
        #[test]
        fn zoom_stays_in_bounds(steps in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut zoom = ZoomLevel::ONE;
            for step_in in steps {
                zoom = if step_in { zoom.zoomed_in() } else { zoom.zoomed_out() };
                prop_assert!(zoom.factor() >= 0.5 && zoom.factor() <= 3.0);
            }
        }
    }
}
