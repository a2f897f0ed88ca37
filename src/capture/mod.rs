//! Camera platform seam and frame handling.
//!
//! This module defines what the widget needs from its host: capability
//! and secure-context checks, stream acquisition for a facing mode, track
//! termination, and frame access. Concrete platforms are the in-process
//! [`MockPlatform`] and, with the `camera` feature, a native backend.

mod camera;
mod config;
mod facing;
mod frame;
mod mock;
#[cfg(feature = "camera")]
mod native;

pub use camera::{
    is_secure_origin, CameraPlatform, MediaStream, MediaTrack, PlatformError, StreamConstraints,
    IDEAL_HEIGHT, IDEAL_WIDTH,
};
pub use config::{
    CaptureConfig, ConfigError, FileConfig, GalleryConfig, NativeConfig, PhotoConfig,
};
pub use facing::{FacingMode, ParseFacingModeError};
pub use frame::Frame;
pub use mock::{MockPlatform, MockStream, MockTrack};
#[cfg(feature = "camera")]
pub use native::{NativePlatform, NativeStream, NativeTrack};
