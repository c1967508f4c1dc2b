use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use crate::error::{CameraError, FrameError};

use super::frame::Frame;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FacingMode {
    /// Rear lens
    Environment,
    User,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CameraConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// A source of camera streams.
#[async_trait]
pub trait Camera: Send + Sync {
    async fn open(&self, constraints: &CameraConstraints)
        -> Result<Box<dyn CameraStream>, CameraError>;
}

/// A live stream. `capture` returns `Ok(None)` until the stream has a frame
/// with non-zero dimensions.
pub trait CameraStream: Send {
    fn capture(&mut self) -> Result<Option<Frame>, FrameError>;

    /// Releases every track held by the stream.
    fn stop(&mut self);
}

/// What the host reported about camera access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CameraCapability {
    #[default]
    Available,
    Unsupported,
    Denied,
    NoDevice,
}

/// Latest-frame mailbox shared between the host and the active stream.
#[derive(Default)]
pub struct FrameSlot {
    latest: Mutex<Option<Frame>>,
    attached: AtomicBool,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a frame if a stream is attached; frames pushed while idle are
    /// dropped.
    pub fn push(&self, frame: Frame) -> bool {
        if !self.attached.load(Ordering::SeqCst) {
            return false;
        }
        match self.latest.lock() {
            Ok(mut guard) => {
                *guard = Some(frame);
                true
            }
            Err(_) => false,
        }
    }

    /// Each pushed frame is handed out once.
    fn take_latest(&self) -> Result<Option<Frame>, FrameError> {
        let mut guard = self
            .latest
            .lock()
            .map_err(|e| FrameError::Capture(e.to_string()))?;
        Ok(guard.take())
    }

    fn attach(&self) {
        self.attached.store(true, Ordering::SeqCst);
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
        if let Ok(mut guard) = self.latest.lock() {
            *guard = None;
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}

/// Camera whose frames are pushed in by the webview host.
pub struct HostCamera {
    slot: Arc<FrameSlot>,
    capability: Mutex<CameraCapability>,
}

impl HostCamera {
    pub fn new(slot: Arc<FrameSlot>) -> Self {
        Self {
            slot,
            capability: Mutex::new(CameraCapability::default()),
        }
    }

    pub fn slot(&self) -> Arc<FrameSlot> {
        Arc::clone(&self.slot)
    }

    pub fn report(&self, capability: CameraCapability) {
        if let Ok(mut guard) = self.capability.lock() {
            *guard = capability;
        }
    }

    fn capability(&self) -> CameraCapability {
        self.capability
            .lock()
            .map(|guard| *guard)
            .unwrap_or(CameraCapability::Unsupported)
    }
}

#[async_trait]
impl Camera for HostCamera {
    async fn open(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        match self.capability() {
            CameraCapability::Available => {}
            CameraCapability::Unsupported => return Err(CameraError::NotSupported),
            CameraCapability::Denied => return Err(CameraError::PermissionDenied),
            CameraCapability::NoDevice => return Err(CameraError::NoDevice),
        }

        log::info!(
            "Attaching host camera ({:?}, ideal {}x{})",
            constraints.facing,
            constraints.ideal_width,
            constraints.ideal_height
        );
        self.slot.attach();
        Ok(Box::new(HostStream {
            slot: Arc::clone(&self.slot),
        }))
    }
}

struct HostStream {
    slot: Arc<FrameSlot>,
}

impl CameraStream for HostStream {
    fn capture(&mut self) -> Result<Option<Frame>, FrameError> {
        let frame = self.slot.take_latest()?;
        Ok(frame.filter(|f| !f.is_empty()))
    }

    fn stop(&mut self) {
        self.slot.detach();
    }
}

impl Drop for HostStream {
    fn drop(&mut self) {
        // Covers a loop task that dies without reaching `stop`
        self.slot.detach();
    }
}
