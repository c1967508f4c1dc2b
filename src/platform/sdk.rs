use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanCodeResult {
    pub value: String,
}

/// Messaging-platform mini-app SDK.
#[async_trait]
pub trait PlatformSdk: Send + Sync {
    /// Whether the page runs inside the platform's own host app.
    fn in_host(&self) -> bool;

    async fn init(&self, app_id: &str) -> Result<(), PlatformError>;

    /// Opens the host's native scanner.
    async fn scan_code(&self) -> Result<ScanCodeResult, PlatformError>;
}

/// SDK stand-in for shells that are not the platform host.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutsideHostSdk;

#[async_trait]
impl PlatformSdk for OutsideHostSdk {
    fn in_host(&self) -> bool {
        false
    }

    async fn init(&self, _app_id: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Init("platform SDK is not available".into()))
    }

    async fn scan_code(&self) -> Result<ScanCodeResult, PlatformError> {
        Err(PlatformError::UnavailableOutsideHost)
    }
}
