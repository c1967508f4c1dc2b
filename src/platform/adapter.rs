use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::PlatformError;

use super::sdk::PlatformSdk;

/// Gates the platform scanner behind a one-time SDK handshake.
pub struct PlatformScanAdapter {
    sdk: Arc<dyn PlatformSdk>,
    app_id: String,
    ready: AtomicBool,
    /// Serializes handshakes so concurrent callers share one `init`
    init_lock: Mutex<()>,
}

impl PlatformScanAdapter {
    pub fn new(sdk: Arc<dyn PlatformSdk>, app_id: impl Into<String>) -> Self {
        Self {
            sdk,
            app_id: app_id.into(),
            ready: AtomicBool::new(false),
            init_lock: Mutex::new(()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Runs the handshake unless it already succeeded. Outside the host there
    /// is nothing to initialize. A failure leaves the adapter not ready so the
    /// next call retries.
    pub async fn ensure_initialized(&self) -> Result<(), PlatformError> {
        if !self.sdk.in_host() {
            return Err(PlatformError::UnavailableOutsideHost);
        }
        if self.is_ready() {
            return Ok(());
        }

        let _guard = self.init_lock.lock().await;
        if self.is_ready() {
            return Ok(());
        }

        match self.sdk.init(&self.app_id).await {
            Ok(()) => {
                info!("Platform SDK initialized for app {}", self.app_id);
                self.ready.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(err) => {
                error!("Platform SDK init failed: {err}");
                Err(err)
            }
        }
    }

    /// Delegates to the host's scanner and returns the decoded text.
    pub async fn trigger_scan(&self) -> Result<String, PlatformError> {
        if !self.sdk.in_host() {
            return Err(PlatformError::UnavailableOutsideHost);
        }
        if !self.is_ready() {
            return Err(PlatformError::NotReady);
        }

        let result = self.sdk.scan_code().await.map_err(|err| {
            error!("Platform scan failed: {err}");
            err
        })?;
        Ok(result.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::sdk::{OutsideHostSdk, ScanCodeResult};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct HostSdk {
        init_calls: AtomicUsize,
        fail_first_init: bool,
    }

    impl HostSdk {
        fn new(fail_first_init: bool) -> Arc<Self> {
            Arc::new(Self {
                init_calls: AtomicUsize::new(0),
                fail_first_init,
            })
        }
    }

    #[async_trait]
    impl PlatformSdk for HostSdk {
        fn in_host(&self) -> bool {
            true
        }

        async fn init(&self, app_id: &str) -> Result<(), PlatformError> {
            assert_eq!(app_id, "app-1");
            let call = self.init_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first_init && call == 0 {
                return Err(PlatformError::Init("handshake refused".into()));
            }
            Ok(())
        }

        async fn scan_code(&self) -> Result<ScanCodeResult, PlatformError> {
            Ok(ScanCodeResult {
                value: "https://example.com".into(),
            })
        }
    }

    #[tokio::test]
    async fn init_runs_once_after_success() {
        let sdk = HostSdk::new(false);
        let adapter = PlatformScanAdapter::new(sdk.clone(), "app-1");

        adapter.ensure_initialized().await.unwrap();
        adapter.ensure_initialized().await.unwrap();

        assert!(adapter.is_ready());
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_init_is_retried() {
        let sdk = HostSdk::new(true);
        let adapter = PlatformScanAdapter::new(sdk.clone(), "app-1");

        assert!(matches!(
            adapter.ensure_initialized().await,
            Err(PlatformError::Init(_))
        ));
        assert!(!adapter.is_ready());

        adapter.ensure_initialized().await.unwrap();
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn scan_requires_ready() {
        let adapter = PlatformScanAdapter::new(HostSdk::new(false), "app-1");
        assert_eq!(adapter.trigger_scan().await, Err(PlatformError::NotReady));

        adapter.ensure_initialized().await.unwrap();
        assert_eq!(
            adapter.trigger_scan().await.as_deref(),
            Ok("https://example.com")
        );
    }

    #[tokio::test]
    async fn outside_host_is_unavailable() {
        let adapter = PlatformScanAdapter::new(Arc::new(OutsideHostSdk), "app-1");
        assert_eq!(
            adapter.ensure_initialized().await,
            Err(PlatformError::UnavailableOutsideHost)
        );
        assert!(!adapter.is_ready());
        assert_eq!(
            adapter.trigger_scan().await,
            Err(PlatformError::UnavailableOutsideHost)
        );
    }
}
