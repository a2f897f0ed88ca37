//! Camera platform abstraction.
//!
//! The widget never talks to hardware directly. It requests streams from a
//! [`CameraPlatform`], which is either a real backend or a mock for testing.
//! Acquisition is the only asynchronous boundary: the platform may need to
//! prompt for permission or negotiate a format before a stream exists.

use super::{FacingMode, Frame};
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;

/// Ideal capture width requested from the platform.
pub const IDEAL_WIDTH: u32 = 1920;
/// Ideal capture height requested from the platform.
pub const IDEAL_HEIGHT: u32 = 1080;

/// Rejections a platform can report for a stream request or a live stream.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("permission denied: {0}")]
    NotAllowed(String),
    #[error("no camera matches the request: {0}")]
    NotFound(String),
    #[error("camera is in use or unreadable: {0}")]
    NotReadable(String),
    #[error("constraints cannot be satisfied: {0}")]
    Overconstrained(String),
    #[error("camera platform error: {0}")]
    Other(String),
}

/// A video-only stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    /// Preferred camera.
    pub facing_mode: FacingMode,
    /// Resolution hint, not a hard requirement.
    pub ideal_width: u32,
    /// Ideal frame height in pixels.
    pub ideal_height: u32,
    /// Always false; the widget never records audio.
    pub audio: bool,
}

impl StreamConstraints {
    /// Video-only constraints with the default resolution hint.
    pub fn video(facing_mode: FacingMode) -> Self {
        Self {
            facing_mode,
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
            audio: false,
        }
    }

    /// Overrides the resolution hint.
    pub fn with_ideal_resolution(mut self, width: u32, height: u32) -> Self {
        self.ideal_width = width;
        self.ideal_height = height;
        self
    }
}

/// One track of a live stream.
pub trait MediaTrack {
    /// Stops the track and releases its share of the hardware. Idempotent.
    fn stop(&mut self);

    /// Whether the track is still delivering frames.
    fn is_live(&self) -> bool;

    /// Device label, for logs.
    fn label(&self) -> &str;
}

/// A live stream bound to one physical camera.
pub trait MediaStream {
    type Track: MediaTrack;

    /// The camera this stream was acquired from.
    fn facing_mode(&self) -> FacingMode;

    /// All tracks of the stream.
    fn tracks_mut(&mut self) -> &mut [Self::Track];

    /// Pulls the most recent frame at native resolution.
    fn grab_frame(&mut self) -> Result<Frame, PlatformError>;

    /// Whether any track is still live.
    fn is_active(&self) -> bool;

    /// Stops every track.
    fn stop_all(&mut self) {
        for track in self.tracks_mut() {
            track.stop();
        }
    }
}

/// Host capabilities needed to acquire cameras.
///
/// Calls happen on a single thread; futures need not be `Send`.
#[async_trait(?Send)]
pub trait CameraPlatform {
    type Stream: MediaStream;

    /// Whether the host exposes camera access at all.
    fn has_media_devices(&self) -> bool;

    /// Whether the page is served securely or from a loopback host.
    fn is_secure_context(&self) -> bool;

    /// Requests a live video stream matching the constraints.
    async fn get_user_media(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Self::Stream, PlatformError>;
}

/// Returns true if `origin` counts as a secure context.
///
/// `https:`, `wss:` and `file:` are secure. Any scheme is accepted for
/// loopback hosts: `localhost`, `*.localhost`, `127.0.0.0/8` and `[::1]`.
pub fn is_secure_origin(origin: &str) -> bool {
    let origin = origin.trim();
    let Some((scheme, rest)) = origin.split_once("://") else {
        return false;
    };

    match scheme.to_ascii_lowercase().as_str() {
        "https" | "wss" | "file" => return true,
        _ => {}
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or_default();
    is_loopback_host(strip_port(authority))
}

fn strip_port(authority: &str) -> &str {
    if let Some(inner) = authority.strip_prefix('[') {
        return inner.split(']').next().unwrap_or_default();
    }
    authority.split(':').next().unwrap_or_default()
}

fn is_loopback_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }
    if let Ok(v4) = host.parse::<Ipv4Addr>() {
        return v4.is_loopback();
    }
    host.parse::<Ipv6Addr>().is_ok_and(|v6| v6.is_loopback())
}
