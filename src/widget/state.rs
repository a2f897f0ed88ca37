//! Widget lifecycle state.

use crate::capture::{FacingMode, MediaStream};
use thiserror::Error;

/// Lifecycle of one widget instance.
///
/// The live stream is owned by the `Streaming` variant, so "streaming" and
/// "stream bound" cannot disagree, and an error can never coexist with a
/// live stream.
#[derive(Debug)]
pub enum WidgetState<S> {
    Idle,
    Acquiring,
    Streaming(S),
    Error(String),
    TornDown,
}

impl<S> Default for WidgetState<S> {
    fn default() -> Self {
        WidgetState::Idle
    }
}

impl<S: MediaStream> WidgetState<S> {
    /// Snapshot without the stream.
    pub fn status(&self) -> WidgetStatus {
        match self {
            WidgetState::Idle => WidgetStatus::Idle,
            WidgetState::Acquiring => WidgetStatus::Acquiring,
            WidgetState::Streaming(_) => WidgetStatus::Streaming,
            WidgetState::Error(message) => WidgetStatus::Error(message.clone()),
            WidgetState::TornDown => WidgetStatus::TornDown,
        }
    }

    /// Whether a stream is bound.
    pub fn is_streaming(&self) -> bool {
        matches!(self, WidgetState::Streaming(_))
    }

    /// The bound stream, if streaming.
    pub fn stream_mut(&mut self) -> Option<&mut S> {
        match self {
            WidgetState::Streaming(stream) => Some(stream),
            _ => None,
        }
    }

    /// Stops and drops the bound stream, if any, replacing the state with `next`.
    ///
    /// Non-streaming states are only replaced when `next` is `TornDown`.
    pub fn release(&mut self, next: WidgetState<S>) {
        match std::mem::take(self) {
            WidgetState::Streaming(mut stream) => {
                stream.stop_all();
                *self = next;
            }
            previous if matches!(next, WidgetState::TornDown) => {
                drop(previous);
                *self = next;
            }
            previous => *self = previous,
        }
    }
}

/// Stream-free snapshot of [`WidgetState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetStatus {
    Idle,
    Acquiring,
    Streaming,
    Error(String),
    TornDown,
}

/// Failures of acquisition and switching.
///
/// `Display` is the message shown to the user.
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    #[error("Camera access is not supported in this browser. Please use a modern browser.")]
    Unsupported,
    #[error("Camera access requires a secure connection. Please use HTTPS or localhost.")]
    InsecureContext,
    #[error("Unable to access camera. Please check permissions.")]
    AccessFailed(#[source] crate::capture::PlatformError),
    #[error("Unable to switch to {} camera.", .to.label())]
    SwitchFailed {
        to: FacingMode,
        #[source]
        source: crate::capture::PlatformError,
    },
    #[error("camera acquisition already in progress")]
    Busy,
    #[error("widget has been torn down")]
    TornDown,
    #[error("acquisition superseded before it completed")]
    Superseded,
}
