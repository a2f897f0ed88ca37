//! Metrics collection and registry.

use crate::capture::CameraPlatform;
use crate::gallery::GalleryShell;
use crate::widget::{CaptureWidget, WidgetStats};
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of widget and gallery state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Whether a stream is currently bound.
    pub streaming: bool,
    /// Current zoom factor.
    pub zoom: f64,
    /// Lifetime widget counters.
    pub stats: WidgetStats,
    /// Photos retained by the gallery.
    pub gallery_size: usize,
}

/// Prometheus metrics registry for the capture widget.
pub struct MetricsRegistry {
    registry: Registry,

    // Live state
    streaming: IntGauge,
    zoom: Gauge,
    gallery_size: IntGauge,

    // Acquisition
    acquisitions_total: IntCounter,
    acquisition_failures_total: IntCounter,
    fallbacks_total: IntCounter,
    switch_failures_total: IntCounter,
    stale_discarded_total: IntCounter,

    // Capture
    photos_captured_total: IntCounter,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all widget metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let streaming = IntGauge::new(
            "snapcam_streaming",
            "Whether a camera stream is bound (1=streaming, 0=not)",
        )?;
        let zoom = Gauge::new("snapcam_zoom_level", "Current digital zoom factor")?;
        let gallery_size = IntGauge::new(
            "snapcam_gallery_size",
            "Photos retained by the gallery, including hidden ones",
        )?;

        let acquisitions_total = IntCounter::new(
            "snapcam_acquisitions_total",
            "Camera streams successfully bound",
        )?;
        let acquisition_failures_total = IntCounter::new(
            "snapcam_acquisition_failures_total",
            "Acquisitions that ended in an error",
        )?;
        let fallbacks_total = IntCounter::new(
            "snapcam_fallbacks_total",
            "Fallbacks to the opposite camera after the preferred one was rejected",
        )?;
        let switch_failures_total = IntCounter::new(
            "snapcam_switch_failures_total",
            "Camera switches that failed",
        )?;
        let stale_discarded_total = IntCounter::new(
            "snapcam_stale_streams_discarded_total",
            "Streams released because they resolved after teardown",
        )?;
        let photos_captured_total = IntCounter::new(
            "snapcam_photos_captured_total",
            "Still photos captured",
        )?;

        registry.register(Box::new(streaming.clone()))?;
        registry.register(Box::new(zoom.clone()))?;
        registry.register(Box::new(gallery_size.clone()))?;
        registry.register(Box::new(acquisitions_total.clone()))?;
        registry.register(Box::new(acquisition_failures_total.clone()))?;
        registry.register(Box::new(fallbacks_total.clone()))?;
        registry.register(Box::new(switch_failures_total.clone()))?;
        registry.register(Box::new(stale_discarded_total.clone()))?;
        registry.register(Box::new(photos_captured_total.clone()))?;

        Ok(Self {
            registry,
            streaming,
            zoom,
            gallery_size,
            acquisitions_total,
            acquisition_failures_total,
            fallbacks_total,
            switch_failures_total,
            stale_discarded_total,
            photos_captured_total,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.streaming.set(i64::from(snapshot.streaming));
        self.zoom.set(snapshot.zoom);
        self.gallery_size.set(snapshot.gallery_size as i64);

        // Counters only move forward; add the difference.
        let stats = &snapshot.stats;
        advance(&self.acquisitions_total, stats.acquisitions);
        advance(&self.acquisition_failures_total, stats.acquisition_failures);
        advance(&self.fallbacks_total, stats.fallbacks);
        advance(&self.switch_failures_total, stats.switch_failures);
        advance(&self.stale_discarded_total, stats.stale_discarded);
        advance(&self.photos_captured_total, stats.photos_captured);
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from a widget and, if present, its gallery.
    pub fn from_components<P: CameraPlatform>(
        widget: &CaptureWidget<P>,
        gallery: Option<&GalleryShell<P>>,
    ) -> Self {
        Self {
            streaming: widget.is_streaming(),
            zoom: widget.zoom().factor(),
            stats: widget.stats(),
            gallery_size: gallery.map_or(0, GalleryShell::len),
        }
    }
}
