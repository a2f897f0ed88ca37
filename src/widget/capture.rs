//! The capture widget.
//!
//! Owns the live stream, zoom and facing mode, and turns the current frame
//! into a still on demand. The widget is a cheap handle over shared state:
//! a UI host keeps clones in its event handlers, and async acquisitions can
//! resolve after the host has torn the widget down. Each acquisition
//! carries an epoch; a result that comes back against a newer epoch or a
//! torn-down widget has its tracks stopped and changes nothing.

use super::{render_zoomed, CameraError, WidgetState, WidgetStatus, WidgetView, ZoomLevel};
use crate::capture::{
    CameraPlatform, CaptureConfig, FacingMode, MediaStream, PlatformError, StreamConstraints,
};
use crate::photo::{DownloadRequest, DownloadSink, PhotoData, PhotoError};
use chrono::Utc;
use image::RgbImage;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

type PhotoCallback = Box<dyn FnMut(&PhotoData)>;

/// Counters kept over the widget's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetStats {
    /// Streams successfully bound.
    pub acquisitions: u64,
    /// Acquisitions that ended in an error state.
    pub acquisition_failures: u64,
    /// Times the opposite camera was tried after the preferred one failed.
    pub fallbacks: u64,
    /// Switches that failed, whether or not recovery succeeded.
    pub switch_failures: u64,
    /// Stills encoded and handed to the callback.
    pub photos_captured: u64,
    /// Late streams released because the widget moved on.
    pub stale_discarded: u64,
}

struct Core<S> {
    state: WidgetState<S>,
    facing: FacingMode,
    zoom: ZoomLevel,
    epoch: u64,
    in_flight: bool,
    stats: WidgetStats,
}

struct Shared<P: CameraPlatform> {
    platform: P,
    config: CaptureConfig,
    core: RefCell<Core<P::Stream>>,
    on_photo_taken: RefCell<Option<PhotoCallback>>,
    downloads: RefCell<Box<dyn DownloadSink>>,
}

impl<P: CameraPlatform> Drop for Shared<P> {
    fn drop(&mut self) {
        self.core.get_mut().state.release(WidgetState::TornDown);
    }
}

/// Clears the in-flight flag when an acquisition ends or is dropped.
///
/// A future dropped while its own request is still pending leaves the
/// widget in the error state, so the retry banner is shown, with the
/// camera that was selected when the acquisition began.
struct InFlight<'a, S> {
    core: &'a RefCell<Core<S>>,
    epoch: u64,
    facing: FacingMode,
}

impl<S> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        let mut core = self.core.borrow_mut();
        core.in_flight = false;
        if core.epoch == self.epoch && matches!(core.state, WidgetState::Acquiring) {
            let err = CameraError::AccessFailed(PlatformError::Other(
                "acquisition cancelled".to_string(),
            ));
            warn!("Camera unavailable: {}", source_of(&err));
            core.state = WidgetState::Error(err.to_string());
            core.facing = self.facing;
            core.stats.acquisition_failures += 1;
        }
    }
}

/// Camera capture widget.
pub struct CaptureWidget<P: CameraPlatform> {
    shared: Rc<Shared<P>>,
}

impl<P: CameraPlatform> Clone for CaptureWidget<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<P: CameraPlatform> CaptureWidget<P> {
    /// Creates an idle widget. Call [`start_camera`](Self::start_camera) to mount it.
    pub fn new(platform: P, config: CaptureConfig, downloads: impl DownloadSink + 'static) -> Self {
        let core = Core {
            state: WidgetState::Idle,
            facing: config.preferred_facing,
            zoom: ZoomLevel::default(),
            epoch: 0,
            in_flight: false,
            stats: WidgetStats::default(),
        };

        Self {
            shared: Rc::new(Shared {
                platform,
                config,
                core: RefCell::new(core),
                on_photo_taken: RefCell::new(None),
                downloads: RefCell::new(Box::new(downloads)),
            }),
        }
    }

    /// Registers the handler fired once per successful capture.
    pub fn on_photo_taken(&self, callback: impl FnMut(&PhotoData) + 'static) {
        *self.shared.on_photo_taken.borrow_mut() = Some(Box::new(callback));
    }

    /// Settings the widget was built with.
    pub fn config(&self) -> &CaptureConfig {
        &self.shared.config
    }

    /// Current lifecycle state without the stream.
    pub fn status(&self) -> WidgetStatus {
        self.shared.core.borrow().state.status()
    }

    /// Whether a stream is bound.
    pub fn is_streaming(&self) -> bool {
        self.shared.core.borrow().state.is_streaming()
    }

    /// Current error message, if the last acquisition failed.
    pub fn error(&self) -> Option<String> {
        match self.status() {
            WidgetStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Camera currently selected.
    pub fn facing_mode(&self) -> FacingMode {
        self.shared.core.borrow().facing
    }

    /// Current zoom level.
    pub fn zoom(&self) -> ZoomLevel {
        self.shared.core.borrow().zoom
    }

    /// Lifetime counters.
    pub fn stats(&self) -> WidgetStats {
        self.shared.core.borrow().stats
    }

    /// Render model for the current state.
    pub fn view(&self) -> WidgetView {
        let core = self.shared.core.borrow();
        WidgetView::new(&core.state.status(), core.facing, core.zoom)
    }

    /// Acquires the current camera, falling back once to the other one.
    ///
    /// Returns the facing mode actually bound.
    pub async fn start_camera(&self) -> Result<FacingMode, CameraError> {
        let (epoch, _guard) = self.begin()?;
        self.check_platform()?;

        let preferred = self.facing_mode();
        info!(facing = %preferred, "Starting camera");

        let first = match self.attempt(epoch, preferred).await? {
            Ok(stream) => return Ok(self.bind(stream)),
            Err(e) => e,
        };

        if !self.shared.config.fallback_to_opposite {
            return Err(self.fail(CameraError::AccessFailed(first)));
        }

        let fallback = preferred.opposite();
        warn!(
            "{} camera rejected ({}), trying {} camera",
            preferred.label(),
            first,
            fallback.label()
        );
        self.shared.core.borrow_mut().stats.fallbacks += 1;

        match self.attempt(epoch, fallback).await? {
            Ok(stream) => Ok(self.bind(stream)),
            Err(e) => Err(self.fail(CameraError::AccessFailed(e))),
        }
    }

    /// "Try Again": re-runs acquisition from scratch.
    pub async fn retry(&self) -> Result<FacingMode, CameraError> {
        self.start_camera().await
    }

    /// Releases every track of the bound stream. Safe when nothing is bound.
    pub fn stop_camera(&self) {
        let mut core = self.shared.core.borrow_mut();
        if core.state.is_streaming() {
            debug!(facing = %core.facing, "Stopping camera");
        }
        core.state.release(WidgetState::Idle);
    }

    /// Toggles to the other camera.
    ///
    /// On failure the error names the attempted direction, and the previous
    /// camera is re-acquired so the widget is not left without a stream. The
    /// switch error is returned even if that recovery succeeds.
    pub async fn switch_camera(&self) -> Result<FacingMode, CameraError> {
        let (epoch, _guard) = self.begin()?;
        let previous = self.facing_mode();
        let target = previous.opposite();
        self.check_platform()?;
        self.shared.core.borrow_mut().facing = target;

        info!(from = %previous, to = %target, "Switching camera");

        let source = match self.attempt(epoch, target).await? {
            Ok(stream) => return Ok(self.bind(stream)),
            Err(e) => e,
        };

        let err = CameraError::SwitchFailed { to: target, source };
        {
            let mut core = self.shared.core.borrow_mut();
            core.state = WidgetState::Error(err.to_string());
            core.facing = previous;
            core.stats.switch_failures += 1;
        }
        warn!("{}, restoring {} camera", source_of(&err), previous.label());

        match self.attempt(epoch, previous).await? {
            Ok(stream) => {
                self.bind(stream);
            }
            Err(e) => {
                warn!("failed to restore {} camera: {}", previous.label(), e);
                self.shared.core.borrow_mut().stats.acquisition_failures += 1;
            }
        }
        Err(err)
    }

    /// Steps zoom up by 0.1x, stopping at 3.0x.
    pub fn zoom_in(&self) -> ZoomLevel {
        self.set_zoom(ZoomLevel::zoomed_in)
    }

    /// Steps zoom down by 0.1x, stopping at 0.5x.
    pub fn zoom_out(&self) -> ZoomLevel {
        self.set_zoom(ZoomLevel::zoomed_out)
    }

    /// Captures a still of what the preview shows.
    ///
    /// Returns `Ok(None)` without side effects unless streaming. Otherwise
    /// fires the photo callback, then saves a download.
    pub fn take_photo(&self) -> Result<Option<PhotoData>, PhotoError> {
        let Some((image, zoom)) = self.grab()? else {
            return Ok(None);
        };

        let still = render_zoomed(&image, zoom);
        let photo = PhotoData::encode_jpeg(&still, self.shared.config.jpeg_quality)?;
        self.shared.core.borrow_mut().stats.photos_captured += 1;
        info!(
            width = photo.width(),
            height = photo.height(),
            bytes = photo.bytes().len(),
            zoom = %zoom,
            "Photo captured"
        );

        self.notify(&photo);

        let request = DownloadRequest::new(photo.clone(), Utc::now());
        self.shared.downloads.borrow_mut().save(&request)?;

        Ok(Some(photo))
    }

    /// The current frame as the preview shows it, or `None` unless streaming.
    pub fn preview_frame(&self) -> Result<Option<RgbImage>, PhotoError> {
        Ok(self
            .grab()?
            .map(|(image, zoom)| render_zoomed(&image, zoom)))
    }

    /// Unmounts the widget: releases the stream and invalidates pending
    /// acquisitions. Further starts fail with [`CameraError::TornDown`].
    pub fn teardown(&self) {
        let mut core = self.shared.core.borrow_mut();
        core.epoch += 1;
        core.state.release(WidgetState::TornDown);
        info!("Camera widget torn down");
    }

    fn begin(&self) -> Result<(u64, InFlight<'_, P::Stream>), CameraError> {
        let mut core = self.shared.core.borrow_mut();
        if matches!(core.state, WidgetState::TornDown) {
            return Err(CameraError::TornDown);
        }
        if core.in_flight {
            return Err(CameraError::Busy);
        }

        core.state.release(WidgetState::Idle);
        core.state = WidgetState::Acquiring;
        core.epoch += 1;
        core.in_flight = true;

        Ok((
            core.epoch,
            InFlight {
                core: &self.shared.core,
                epoch: core.epoch,
                facing: core.facing,
            },
        ))
    }

    fn check_platform(&self) -> Result<(), CameraError> {
        let platform = &self.shared.platform;
        if !platform.has_media_devices() {
            return Err(self.fail(CameraError::Unsupported));
        }
        if !platform.is_secure_context() {
            return Err(self.fail(CameraError::InsecureContext));
        }
        Ok(())
    }

    /// One platform request. The outer error means the widget moved on
    /// while the request was pending; any stream it produced is released.
    async fn attempt(
        &self,
        epoch: u64,
        facing: FacingMode,
    ) -> Result<Result<P::Stream, PlatformError>, CameraError> {
        let config = &self.shared.config;
        let constraints = StreamConstraints::video(facing)
            .with_ideal_resolution(config.ideal_width, config.ideal_height);

        let result = self.shared.platform.get_user_media(&constraints).await;

        let stale = {
            let core = self.shared.core.borrow();
            if matches!(core.state, WidgetState::TornDown) {
                Some(CameraError::TornDown)
            } else if core.epoch != epoch {
                Some(CameraError::Superseded)
            } else {
                None
            }
        };

        match stale {
            None => Ok(result),
            Some(err) => {
                if let Ok(mut stream) = result {
                    stream.stop_all();
                    self.shared.core.borrow_mut().stats.stale_discarded += 1;
                    debug!(facing = %facing, "Released stream from stale acquisition");
                }
                Err(err)
            }
        }
    }

    fn bind(&self, stream: P::Stream) -> FacingMode {
        let facing = stream.facing_mode();
        let mut core = self.shared.core.borrow_mut();
        core.facing = facing;
        core.state = WidgetState::Streaming(stream);
        core.stats.acquisitions += 1;
        info!(facing = %facing, "Camera streaming");
        facing
    }

    fn fail(&self, err: CameraError) -> CameraError {
        let mut core = self.shared.core.borrow_mut();
        core.state = WidgetState::Error(err.to_string());
        core.stats.acquisition_failures += 1;
        warn!("Camera unavailable: {}", source_of(&err));
        err
    }

    fn set_zoom(&self, step: impl FnOnce(ZoomLevel) -> ZoomLevel) -> ZoomLevel {
        let mut core = self.shared.core.borrow_mut();
        core.zoom = step(core.zoom);
        debug!(zoom = %core.zoom, "Zoom changed");
        core.zoom
    }

    fn grab(&self) -> Result<Option<(RgbImage, ZoomLevel)>, PhotoError> {
        let mut core = self.shared.core.borrow_mut();
        let zoom = core.zoom;
        let Some(stream) = core.state.stream_mut() else {
            return Ok(None);
        };
        let frame = stream.grab_frame()?;
        let image = frame.into_rgb_image().ok_or(PhotoError::InvalidFrame)?;
        Ok(Some((image, zoom)))
    }

    fn notify(&self, photo: &PhotoData) {
        // Taken out while running so the handler may call back into the widget.
        let callback = self.shared.on_photo_taken.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(photo);
            let mut slot = self.shared.on_photo_taken.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

fn source_of(err: &CameraError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{}: {}", err, source),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MockPlatform;
    use crate::photo::MemoryDownloads;
    use chrono::NaiveDateTime;
    use futures::executor::block_on;
    use futures::FutureExt;
    use std::cell::Cell;

    fn widget_with(platform: &MockPlatform) -> (CaptureWidget<MockPlatform>, MemoryDownloads) {
        let downloads = MemoryDownloads::new();
        let widget = CaptureWidget::new(platform.clone(), CaptureConfig::default(), downloads.clone());
        (widget, downloads)
    }

    #[test]
    fn test_start_binds_rear_camera_by_default() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);

        assert_eq!(block_on(widget.start_camera()).unwrap(), FacingMode::Environment);
        assert!(widget.is_streaming());
        assert!(widget.error().is_none());
        assert_eq!(platform.live_tracks(), 1);

        let request = platform.requests()[0];
        assert_eq!((request.ideal_width, request.ideal_height), (1920, 1080));
        assert!(!request.audio);
    }

    #[test]
    fn test_unsupported_platform_makes_no_request() {
        let platform = MockPlatform::new().without_media_devices();
        let (widget, _) = widget_with(&platform);

        let err = block_on(widget.start_camera()).unwrap_err();
        assert!(matches!(err, CameraError::Unsupported));
        assert!(widget.error().unwrap().contains("modern browser"));
        assert!(!widget.is_streaming());
        assert!(platform.requests().is_empty());
    }

    #[test]
    fn test_insecure_context_makes_no_request() {
        let platform = MockPlatform::new().with_origin("http://camera.example.com");
        let (widget, _) = widget_with(&platform);

        let err = block_on(widget.start_camera()).unwrap_err();
        assert!(matches!(err, CameraError::InsecureContext));
        assert!(widget.error().unwrap().contains("HTTPS"));
        assert!(platform.requests().is_empty());
    }

    #[test]
    fn test_falls_back_to_front_camera_once() {
        let platform = MockPlatform::new();
        platform.set_unavailable(FacingMode::Environment, true);
        let (widget, _) = widget_with(&platform);

        assert_eq!(block_on(widget.start_camera()).unwrap(), FacingMode::User);
        assert_eq!(
            platform.requested_facings(),
            vec![FacingMode::Environment, FacingMode::User]
        );
        assert_eq!(widget.facing_mode(), FacingMode::User);
        assert_eq!(widget.stats().fallbacks, 1);
    }

    #[test]
    fn test_both_cameras_missing_reports_access_error() {
        let platform = MockPlatform::new();
        platform.set_unavailable(FacingMode::Environment, true);
        platform.set_unavailable(FacingMode::User, true);
        let (widget, _) = widget_with(&platform);

        let err = block_on(widget.start_camera()).unwrap_err();
        assert!(matches!(err, CameraError::AccessFailed(_)));
        assert_eq!(
            widget.error().as_deref(),
            Some("Unable to access camera. Please check permissions.")
        );
        assert_eq!(platform.requests().len(), 2);
        assert_eq!(widget.view().error.unwrap().retry_label, "Try Again");
    }

    #[test]
    fn test_fallback_can_be_disabled() {
        let platform = MockPlatform::new();
        platform.set_unavailable(FacingMode::Environment, true);
        let config = CaptureConfig {
            fallback_to_opposite: false,
            ..Default::default()
        };
        let widget = CaptureWidget::new(platform.clone(), config, MemoryDownloads::new());

        assert!(block_on(widget.start_camera()).is_err());
        assert_eq!(platform.requested_facings(), vec![FacingMode::Environment]);
    }

    #[test]
    fn test_retry_clears_error_and_recovers() {
        let platform = MockPlatform::new();
        platform.set_unavailable(FacingMode::Environment, true);
        platform.set_unavailable(FacingMode::User, true);
        let (widget, _) = widget_with(&platform);
        assert!(block_on(widget.start_camera()).is_err());

        platform.set_unavailable(FacingMode::Environment, false);
        assert_eq!(block_on(widget.retry()).unwrap(), FacingMode::Environment);
        assert!(widget.error().is_none());
        assert_eq!(widget.status(), WidgetStatus::Streaming);
    }

    #[test]
    fn test_restart_releases_previous_stream() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);

        block_on(widget.start_camera()).unwrap();
        block_on(widget.start_camera()).unwrap();
        assert_eq!(platform.live_tracks(), 1);
    }

    #[test]
    fn test_stop_without_stream_is_noop() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);

        widget.stop_camera();
        widget.stop_camera();
        assert!(!widget.is_streaming());
        assert_eq!(widget.status(), WidgetStatus::Idle);
    }

    #[test]
    fn test_stop_releases_tracks() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);
        block_on(widget.start_camera()).unwrap();

        widget.stop_camera();
        assert!(!widget.is_streaming());
        assert_eq!(platform.live_tracks(), 0);
    }

    #[test]
    fn test_switch_to_front_camera() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);
        block_on(widget.start_camera()).unwrap();

        assert_eq!(block_on(widget.switch_camera()).unwrap(), FacingMode::User);
        assert_eq!(widget.facing_mode(), FacingMode::User);
        assert_eq!(platform.live_tracks(), 1);
        assert_eq!(widget.view().switch_label(), "Switch to back camera");
    }

    #[test]
    fn test_switch_failure_restores_previous_camera() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);
        block_on(widget.start_camera()).unwrap();
        platform.set_unavailable(FacingMode::User, true);

        let err = block_on(widget.switch_camera()).unwrap_err();
        assert!(matches!(err, CameraError::SwitchFailed { to: FacingMode::User, .. }));
        assert_eq!(err.to_string(), "Unable to switch to front camera.");
        assert_eq!(
            platform.requested_facings(),
            vec![FacingMode::Environment, FacingMode::User, FacingMode::Environment]
        );
        assert_eq!(widget.facing_mode(), FacingMode::Environment);
        assert!(widget.is_streaming());
        assert_eq!(platform.live_tracks(), 1);
        assert_eq!(widget.stats().switch_failures, 1);
    }

    #[test]
    fn test_switch_failure_keeps_error_when_recovery_fails() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);
        block_on(widget.start_camera()).unwrap();
        platform.set_unavailable(FacingMode::User, true);
        platform.set_unavailable(FacingMode::Environment, true);

        assert!(block_on(widget.switch_camera()).is_err());
        assert_eq!(
            widget.error().as_deref(),
            Some("Unable to switch to front camera.")
        );
        assert_eq!(platform.requested_facings().last(), Some(&FacingMode::Environment));
        assert_eq!(platform.live_tracks(), 0);
    }

    #[test]
    fn test_zoom_clamps_after_many_steps() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);

        for _ in 0..50 {
            widget.zoom_in();
        }
        assert_eq!(widget.zoom().factor(), 3.0);
        assert!(!widget.view().zoom_in_enabled);

        for _ in 0..50 {
            widget.zoom_out();
        }
        assert_eq!(widget.zoom().factor(), 0.5);
        assert!(!widget.view().zoom_out_enabled);
    }

    #[test]
    fn test_capture_is_noop_when_not_streaming() {
        let platform = MockPlatform::new();
        let (widget, downloads) = widget_with(&platform);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        widget.on_photo_taken(move |_| counter.set(counter.get() + 1));

        assert!(widget.take_photo().unwrap().is_none());
        assert_eq!(calls.get(), 0);
        assert!(downloads.is_empty());
        assert!(widget.preview_frame().unwrap().is_none());
    }

    #[test]
    fn test_capture_notifies_once_and_downloads() {
        let platform = MockPlatform::new().with_resolution(160, 120);
        let (widget, downloads) = widget_with(&platform);
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        widget.on_photo_taken(move |photo| sink.borrow_mut().push(photo.clone()));
        block_on(widget.start_camera()).unwrap();

        let photo = widget.take_photo().unwrap().unwrap();

        assert_eq!(received.borrow().len(), 1);
        assert!(!received.borrow()[0].is_empty());
        assert_eq!((photo.width(), photo.height()), (160, 120));

        let saved = downloads.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].photo, photo);
        let name = &saved[0].file_name;
        assert!(name.starts_with("photo-") && name.ends_with(".jpg"));
        assert_eq!(name.len(), "photo-2024-01-01T00-00-00.jpg".len());
        let stamp = name.trim_end_matches(".jpg");
        assert!(NaiveDateTime::parse_from_str(stamp, "photo-%Y-%m-%dT%H-%M-%S").is_ok());
    }

    #[test]
    fn test_capture_respects_zoom() {
        let platform = MockPlatform::new().with_resolution(100, 80);
        let (widget, _) = widget_with(&platform);
        block_on(widget.start_camera()).unwrap();

        let unzoomed = widget.preview_frame().unwrap().unwrap();
        for _ in 0..10 {
            widget.zoom_in();
        }
        let zoomed = widget.preview_frame().unwrap().unwrap();

        assert_eq!(zoomed.dimensions(), (100, 80));
        // Mock frames ramp red left to right; at 2x the left edge comes from x=25.
        assert_eq!(unzoomed.get_pixel(0, 40)[0], 0);
        assert!(zoomed.get_pixel(0, 40)[0] > 50);
    }

    #[test]
    fn test_teardown_during_acquisition_discards_stream() {
        let platform = MockPlatform::new().gated();
        let (widget, _) = widget_with(&platform);

        let mut start = Box::pin(widget.start_camera());
        assert!((&mut start).now_or_never().is_none());
        assert_eq!(widget.status(), WidgetStatus::Acquiring);

        widget.teardown();
        assert_eq!(platform.release_pending(), 1);

        let result = start.now_or_never().unwrap();
        assert!(matches!(result, Err(CameraError::TornDown)));
        assert_eq!(widget.status(), WidgetStatus::TornDown);
        assert_eq!(platform.live_tracks(), 0);
        assert_eq!(widget.stats().stale_discarded, 1);
        assert_eq!(widget.stats().acquisitions, 0);
    }

    #[test]
    fn test_second_acquisition_rejected_while_pending() {
        let platform = MockPlatform::new().gated();
        let (widget, _) = widget_with(&platform);

        let mut first = Box::pin(widget.start_camera());
        assert!((&mut first).now_or_never().is_none());

        let second = widget.start_camera().now_or_never().unwrap();
        assert!(matches!(second, Err(CameraError::Busy)));

        platform.release_pending();
        assert!(first.now_or_never().unwrap().is_ok());
        assert_eq!(platform.requests().len(), 1);
        assert_eq!(platform.live_tracks(), 1);
    }

    #[test]
    fn test_dropped_start_leaves_widget_retryable() {
        let platform = MockPlatform::new().gated();
        let (widget, _) = widget_with(&platform);

        let mut start = Box::pin(widget.start_camera());
        assert!((&mut start).now_or_never().is_none());
        drop(start);

        let view = widget.view();
        assert_eq!(
            widget.error().as_deref(),
            Some("Unable to access camera. Please check permissions.")
        );
        assert_eq!(view.error.unwrap().retry_label, "Try Again");
        assert!(view.switch_enabled);
        assert!(!view.capture_enabled);

        // The abandoned request opens nothing when it resolves.
        assert_eq!(platform.release_pending(), 1);
        assert_eq!(platform.live_tracks(), 0);

        let mut retry = Box::pin(widget.retry());
        assert!((&mut retry).now_or_never().is_none());
        platform.release_pending();
        assert!(retry.now_or_never().unwrap().is_ok());
        assert!(widget.is_streaming());
        assert_eq!(platform.live_tracks(), 1);
    }

    #[test]
    fn test_dropped_switch_leaves_widget_retryable() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);
        block_on(widget.start_camera()).unwrap();

        let platform = platform.gated();
        let mut switch = Box::pin(widget.switch_camera());
        assert!((&mut switch).now_or_never().is_none());
        assert_eq!(widget.facing_mode(), FacingMode::User);
        drop(switch);

        assert!(widget.error().is_some());
        assert_eq!(widget.facing_mode(), FacingMode::Environment);
        assert!(widget.view().switch_enabled);
        assert_eq!(platform.release_pending(), 1);
        assert_eq!(platform.live_tracks(), 0);
    }

    #[test]
    fn test_teardown_releases_stream_and_blocks_restart() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);
        block_on(widget.start_camera()).unwrap();

        widget.teardown();
        assert_eq!(platform.live_tracks(), 0);
        assert!(matches!(
            block_on(widget.start_camera()),
            Err(CameraError::TornDown)
        ));
        assert!(widget.take_photo().unwrap().is_none());
    }

    #[test]
    fn test_dropping_last_handle_releases_stream() {
        let platform = MockPlatform::new();
        let (widget, _) = widget_with(&platform);
        block_on(widget.start_camera()).unwrap();

        drop(widget);
        assert_eq!(platform.live_tracks(), 0);
    }
}
