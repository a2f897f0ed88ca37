//! Camera capture widget.
//!
//! Lifecycle: `Idle -> Acquiring -> Streaming`, back to `Acquiring` on a
//! camera switch, `Error` after a failed acquisition until the user retries
//! or switches, and `TornDown` once unmounted. Capture is a synchronous
//! side effect available only while streaming.

mod capture;
mod state;
mod transform;
mod view;
mod zoom;

pub use capture::{CaptureWidget, WidgetStats};
pub use state::{CameraError, WidgetState, WidgetStatus};
pub use transform::{render_zoomed, SourceRegion, ZoomTransform};
pub use view::{ErrorBanner, WidgetView, CAPTURE_LABEL, RETRY_LABEL};
pub use zoom::ZoomLevel;
