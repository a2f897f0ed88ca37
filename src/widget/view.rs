//! Render model for the capture widget.

use super::{WidgetStatus, ZoomLevel};
use crate::capture::FacingMode;

/// Label of the retry affordance shown next to errors.
pub const RETRY_LABEL: &str = "Try Again";
/// Label of the shutter control.
pub const CAPTURE_LABEL: &str = "Take Photo";

/// Inline error with its retry action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    /// User-facing error text.
    pub message: String,
    /// Label of the retry button.
    pub retry_label: &'static str,
}

/// Everything a host needs to draw the widget for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    /// Zoom applied to the preview.
    pub zoom: ZoomLevel,
    /// Uniform scale applied to the live preview about its center.
    pub preview_scale: f64,
    /// Zoom-in button is clickable.
    pub zoom_in_enabled: bool,
    /// Zoom-out button is clickable.
    pub zoom_out_enabled: bool,
    /// Capture button is clickable.
    pub capture_enabled: bool,
    /// Switch button is clickable.
    pub switch_enabled: bool,
    /// A stream is bound.
    pub camera_active: bool,
    /// Camera currently selected.
    pub facing_mode: FacingMode,
    /// Error banner, shown in place of the preview.
    pub error: Option<ErrorBanner>,
}

impl WidgetView {
    /// Derives the view from the widget's current state.
    pub fn new(status: &WidgetStatus, facing_mode: FacingMode, zoom: ZoomLevel) -> Self {
        let camera_active = matches!(status, WidgetStatus::Streaming);
        let error = match status {
            WidgetStatus::Error(message) => Some(ErrorBanner {
                message: message.clone(),
                retry_label: RETRY_LABEL,
            }),
            _ => None,
        };

        Self {
            zoom,
            preview_scale: zoom.factor(),
            zoom_in_enabled: zoom.can_zoom_in(),
            zoom_out_enabled: zoom.can_zoom_out(),
            capture_enabled: camera_active,
            switch_enabled: matches!(status, WidgetStatus::Streaming | WidgetStatus::Error(_)),
            camera_active,
            facing_mode,
            error,
        }
    }

    /// "Zoom: 1.0x"
    pub fn zoom_label(&self) -> String {
        format!("Zoom: {}", self.zoom)
    }

    /// "Switch to front camera" / "Switch to back camera"
    pub fn switch_label(&self) -> String {
        format!("Switch to {} camera", self.facing_mode.opposite().label())
    }

    /// Info lines under the controls.
    pub fn info_lines(&self) -> Vec<String> {
        let mut lines = vec![self.zoom_label()];
        if self.camera_active {
            lines.push("Camera active".to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_view_disables_capture() {
        let view = WidgetView::new(&WidgetStatus::Idle, FacingMode::Environment, ZoomLevel::ONE);
        assert!(!view.capture_enabled);
        assert!(!view.camera_active);
        assert!(view.error.is_none());
        assert_eq!(view.info_lines(), vec!["Zoom: 1.0x".to_string()]);
    }

    #[test]
    fn test_bounds_disable_zoom_controls() {
        let max = WidgetView::new(&WidgetStatus::Streaming, FacingMode::User, ZoomLevel::MAX);
        assert!(!max.zoom_in_enabled);
        assert!(max.zoom_out_enabled);
        assert_eq!(max.preview_scale, 3.0);

        let min = WidgetView::new(&WidgetStatus::Streaming, FacingMode::User, ZoomLevel::MIN);
        assert!(min.zoom_in_enabled);
        assert!(!min.zoom_out_enabled);
    }

    #[test]
    fn test_error_view_offers_retry() {
        let status = WidgetStatus::Error("Unable to access camera. Please check permissions.".into());
        let view = WidgetView::new(&status, FacingMode::Environment, ZoomLevel::ONE);
        let banner = view.error.unwrap();
        assert_eq!(banner.retry_label, "Try Again");
        assert!(banner.message.starts_with("Unable to access camera"));
    }

    #[test]
    fn test_streaming_view_labels() {
        let view = WidgetView::new(
            &WidgetStatus::Streaming,
            FacingMode::Environment,
            ZoomLevel::from_factor(1.5),
        );
        assert!(view.capture_enabled);
        assert_eq!(view.switch_label(), "Switch to front camera");
        assert_eq!(view.info_lines(), vec!["Zoom: 1.5x", "Camera active"]);
    }
}
