//! Native camera backend built on nokhwa.
//!
//! Desktop hosts have no notion of facing mode, so each mode maps to a
//! device index from [`NativeConfig`]. A local process is always treated
//! as a secure context.

use super::{
    CameraPlatform, FacingMode, Frame, MediaStream, MediaTrack, NativeConfig, PlatformError,
    StreamConstraints,
};
use async_trait::async_trait;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::{Camera, NokhwaError};

const NATIVE_FPS: u32 = 30;

impl From<NokhwaError> for PlatformError {
    fn from(err: NokhwaError) -> Self {
        PlatformError::Other(err.to_string())
    }
}

/// Camera platform backed by the host's native capture API.
#[derive(Debug, Clone)]
pub struct NativePlatform {
    config: NativeConfig,
}

impl NativePlatform {
    /// Creates a backend that maps facing modes to device indices.
    pub fn new(config: NativeConfig) -> Self {
        Self { config }
    }

    fn device_index(&self, facing: FacingMode) -> u32 {
        match facing {
            FacingMode::Environment => self.config.environment_index,
            FacingMode::User => self.config.user_index,
        }
    }
}

#[async_trait(?Send)]
impl CameraPlatform for NativePlatform {
    type Stream = NativeStream;

    fn has_media_devices(&self) -> bool {
        match nokhwa::query(ApiBackend::Auto) {
            Ok(devices) => !devices.is_empty(),
            Err(e) => {
                tracing::warn!("camera enumeration failed: {}", e);
                false
            }
        }
    }

    fn is_secure_context(&self) -> bool {
        true
    }

    async fn get_user_media(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<NativeStream, PlatformError> {
        let index = self.device_index(constraints.facing_mode);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(constraints.ideal_width, constraints.ideal_height),
                FrameFormat::MJPEG,
                NATIVE_FPS,
            ),
        ));

        let mut camera = Camera::new(CameraIndex::Index(index), requested).map_err(|e| {
            PlatformError::NotFound(format!("device {}: {}", index, e))
        })?;
        camera.open_stream()?;

        let label = camera.info().human_name();
        tracing::info!(index, %label, facing = %constraints.facing_mode, "native camera opened");

        Ok(NativeStream {
            facing: constraints.facing_mode,
            sequence: 0,
            tracks: vec![NativeTrack {
                label,
                camera: Some(camera),
            }],
        })
    }
}

/// The single video track of a native stream.
pub struct NativeTrack {
    label: String,
    camera: Option<Camera>,
}

impl MediaTrack for NativeTrack {
    fn stop(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                tracing::warn!(label = %self.label, "failed to stop camera stream: {}", e);
            }
        }
    }

    fn is_live(&self) -> bool {
        self.camera.is_some()
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Live stream from a native camera.
pub struct NativeStream {
    facing: FacingMode,
    sequence: u64,
    tracks: Vec<NativeTrack>,
}

impl MediaStream for NativeStream {
    type Track = NativeTrack;

    fn facing_mode(&self) -> FacingMode {
        self.facing
    }

    fn tracks_mut(&mut self) -> &mut [NativeTrack] {
        &mut self.tracks
    }

    fn grab_frame(&mut self) -> Result<Frame, PlatformError> {
        let camera = self
            .tracks
            .iter_mut()
            .find_map(|t| t.camera.as_mut())
            .ok_or_else(|| PlatformError::NotReadable("stream has ended".to_string()))?;

        let decoded = camera.frame()?.decode_image::<RgbFormat>()?;
        let (width, height) = (decoded.width(), decoded.height());
        self.sequence += 1;
        Ok(Frame::new(decoded.into_raw(), width, height, self.sequence))
    }

    fn is_active(&self) -> bool {
        self.tracks.iter().any(NativeTrack::is_live)
    }
}

impl Drop for NativeStream {
    fn drop(&mut self) {
        self.stop_all();
    }
}
