use thiserror::Error;

/// Failures while acquiring a camera stream. Scoped to the camera view; the
/// scan loop stays idle and the user may retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera is not supported on this device")]
    NotSupported,

    #[error("camera access was denied")]
    PermissionDenied,

    #[error("no camera device found")]
    NoDevice,

    #[error("camera already active")]
    AlreadyActive,

    #[error("camera access failed: {0}")]
    Other(String),
}

/// Per-tick failures. Logged and skipped, never surfaced to the user.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("failed to capture frame: {0}")]
    Capture(String),

    #[error("failed to extract scan window: {0}")]
    Extract(String),

    #[error("failed to encode thumbnail: {0}")]
    Thumbnail(#[from] image::ImageError),

    #[error("scan worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("this feature is only available inside the host app")]
    UnavailableOutsideHost,

    #[error("platform SDK is not initialized")]
    NotReady,

    #[error("platform SDK initialization failed: {0}")]
    Init(String),

    #[error("platform scan failed: {0}")]
    Scan(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard is unavailable")]
    Unavailable,

    #[error("failed to write clipboard: {0}")]
    Write(String),
}
