//! Scriptable in-process camera platform.
//!
//! Generates synthetic frames and lets callers decide which cameras exist,
//! whether the page is secure, and when pending acquisitions resolve.
//! Clones share state, so a test can keep a handle after moving the
//! platform into a widget.

use super::{
    is_secure_origin, CameraPlatform, FacingMode, Frame, MediaStream, MediaTrack, PlatformError,
    StreamConstraints,
};
use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug)]
struct MockState {
    origin: String,
    media_devices: bool,
    unavailable: HashSet<FacingMode>,
    resolution: (u32, u32),
    gated: bool,
    pending: Vec<oneshot::Sender<()>>,
    requests: Vec<StreamConstraints>,
    live_tracks: usize,
    next_stream_id: u64,
}

/// Mock camera platform for tests and demos.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    state: Rc<RefCell<MockState>>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatform {
    /// A secure page with both cameras at 640x480.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                origin: "https://localhost".to_string(),
                media_devices: true,
                unavailable: HashSet::new(),
                resolution: (640, 480),
                gated: false,
                pending: Vec::new(),
                requests: Vec::new(),
                live_tracks: 0,
                next_stream_id: 1,
            })),
        }
    }

    /// Sets the page origin used for the secure-context check.
    pub fn with_origin(self, origin: impl Into<String>) -> Self {
        self.state.borrow_mut().origin = origin.into();
        self
    }

    /// Removes camera access from the host entirely.
    pub fn without_media_devices(self) -> Self {
        self.state.borrow_mut().media_devices = false;
        self
    }

    /// Sets the native resolution of every stream.
    pub fn with_resolution(self, width: u32, height: u32) -> Self {
        self.state.borrow_mut().resolution = (width, height);
        self
    }

    /// Makes acquisitions stay pending until [`release_pending`](Self::release_pending).
    pub fn gated(self) -> Self {
        self.state.borrow_mut().gated = true;
        self
    }

    /// Marks a camera as absent (requests for it are rejected).
    pub fn set_unavailable(&self, facing: FacingMode, unavailable: bool) {
        let mut state = self.state.borrow_mut();
        if unavailable {
            state.unavailable.insert(facing);
        } else {
            state.unavailable.remove(&facing);
        }
    }

    /// Resolves every pending acquisition. Returns how many were released.
    pub fn release_pending(&self) -> usize {
        let pending = std::mem::take(&mut self.state.borrow_mut().pending);
        let count = pending.len();
        for gate in pending {
            // Receivers dropped with a cancelled future are fine to skip.
            let _ = gate.send(());
        }
        count
    }

    /// Every constraint set requested so far, in order.
    pub fn requests(&self) -> Vec<StreamConstraints> {
        self.state.borrow().requests.clone()
    }

    /// Facing modes requested so far, in order.
    pub fn requested_facings(&self) -> Vec<FacingMode> {
        self.state
            .borrow()
            .requests
            .iter()
            .map(|c| c.facing_mode)
            .collect()
    }

    /// Number of tracks currently holding the hardware.
    pub fn live_tracks(&self) -> usize {
        self.state.borrow().live_tracks
    }

    fn open_stream(&self, facing: FacingMode) -> Result<MockStream, PlatformError> {
        let mut state = self.state.borrow_mut();
        if state.unavailable.contains(&facing) {
            return Err(PlatformError::NotFound(format!("no {} camera", facing.label())));
        }

        let id = state.next_stream_id;
        state.next_stream_id += 1;
        state.live_tracks += 1;
        let (width, height) = state.resolution;
        tracing::info!(id, %facing, width, height, "MockPlatform opened stream");

        Ok(MockStream {
            facing,
            width,
            height,
            sequence: 0,
            tracks: vec![MockTrack {
                label: format!("mock {} camera #{}", facing.label(), id),
                live: true,
                state: Rc::clone(&self.state),
            }],
        })
    }
}

#[async_trait(?Send)]
impl CameraPlatform for MockPlatform {
    type Stream = MockStream;

    fn has_media_devices(&self) -> bool {
        self.state.borrow().media_devices
    }

    fn is_secure_context(&self) -> bool {
        is_secure_origin(&self.state.borrow().origin)
    }

    async fn get_user_media(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<MockStream, PlatformError> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.requests.push(*constraints);
            if state.gated {
                let (tx, rx) = oneshot::channel();
                state.pending.push(tx);
                Some(rx)
            } else {
                None
            }
        };

        if let Some(rx) = gate {
            rx.await
                .map_err(|_| PlatformError::Other("acquisition abandoned".to_string()))?;
        }

        self.open_stream(constraints.facing_mode)
    }
}

/// Track of a [`MockStream`]; counts toward [`MockPlatform::live_tracks`].
#[derive(Debug)]
pub struct MockTrack {
    label: String,
    live: bool,
    state: Rc<RefCell<MockState>>,
}

impl MediaTrack for MockTrack {
    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.state.borrow_mut().live_tracks -= 1;
            tracing::debug!(label = %self.label, "MockTrack stopped");
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Stream handed out by [`MockPlatform`].
///
/// Dropping it without stopping leaves its track counted as live, which is
/// how tests detect leaked hardware.
#[derive(Debug)]
pub struct MockStream {
    facing: FacingMode,
    width: u32,
    height: u32,
    sequence: u64,
    tracks: Vec<MockTrack>,
}

impl MediaStream for MockStream {
    type Track = MockTrack;

    fn facing_mode(&self) -> FacingMode {
        self.facing
    }

    fn tracks_mut(&mut self) -> &mut [MockTrack] {
        &mut self.tracks
    }

    fn grab_frame(&mut self) -> Result<Frame, PlatformError> {
        if !self.is_active() {
            return Err(PlatformError::NotReadable("stream has ended".to_string()));
        }

        // Horizontal red ramp, vertical green ramp, blue tracks the sequence.
        // Enough structure for zoom tests to tell regions apart.
        let (w, h) = (self.width as usize, self.height as usize);
        let mut pixels = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                pixels.push((x * 255 / w.max(1)) as u8);
                pixels.push((y * 255 / h.max(1)) as u8);
                pixels.push((self.sequence % 256) as u8);
            }
        }

        self.sequence += 1;
        Ok(Frame::new(pixels, self.width, self.height, self.sequence))
    }

    fn is_active(&self) -> bool {
        self.tracks.iter().any(MockTrack::is_live)
    }
}
