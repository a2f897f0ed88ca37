//! Prometheus metrics for the capture widget.
//!
//! Metrics are collected from snapshots of widget and gallery state and
//! rendered in the Prometheus text format. There is no HTTP exporter; the
//! host decides where the text goes.
//!
//! # Metrics Exposed
//!
//! - `snapcam_streaming` - Whether a stream is bound
//! - `snapcam_zoom_level` - Current zoom factor
//! - `snapcam_gallery_size` - Photos retained by the gallery
//! - `snapcam_acquisitions_total` - Streams bound
//! - `snapcam_acquisition_failures_total` - Acquisitions ending in error
//! - `snapcam_fallbacks_total` - Fallbacks to the opposite camera
//! - `snapcam_switch_failures_total` - Failed camera switches
//! - `snapcam_stale_streams_discarded_total` - Late streams released after teardown
//! - `snapcam_photos_captured_total` - Stills captured

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
