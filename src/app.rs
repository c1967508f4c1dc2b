use anyhow::Result;
use chrono::Utc;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::error::{CameraError, PlatformError};
use crate::feedback::{CameraState, Notifier};
use crate::history::{
    Clipboard, CopyReport, DetectionRecord, DetectionSink, LedgerKind, LedgerSnapshot,
};
use crate::platform::{PlatformScanAdapter, PlatformSdk};
use crate::router::{Route, View};
use crate::scanner::{Camera, Decoder, FrameTicker, ScanController};

/// External collaborators the app is wired with.
pub struct AppServices {
    pub camera: Arc<dyn Camera>,
    pub decoder: Arc<dyn Decoder>,
    pub sdk: Arc<dyn PlatformSdk>,
    pub clipboard: Clipboard,
    pub notifier: Arc<dyn Notifier>,
}

/// Entry point for every user action. Cheap to clone.
#[derive(Clone)]
pub struct QrApp {
    scanner: Arc<Mutex<ScanController>>,
    camera_history: DetectionSink,
    platform_history: DetectionSink,
    platform: Arc<PlatformScanAdapter>,
    clipboard: Clipboard,
    notifier: Arc<dyn Notifier>,
    view: Arc<Mutex<Option<View>>>,
}

impl QrApp {
    pub fn new(config: AppConfig, services: AppServices) -> Self {
        let camera_history = DetectionSink::new(LedgerKind::Camera, services.notifier.clone());
        let platform_history =
            DetectionSink::new(LedgerKind::Platform, services.notifier.clone());
        let platform = PlatformScanAdapter::new(services.sdk, config.platform_app_id.clone());
        let scanner = ScanController::new(
            services.camera,
            services.decoder,
            camera_history.clone(),
            config,
        );

        Self {
            scanner: Arc::new(Mutex::new(scanner)),
            camera_history,
            platform_history,
            platform: Arc::new(platform),
            clipboard: services.clipboard,
            notifier: services.notifier,
            view: Arc::new(Mutex::new(None)),
        }
    }

    fn sink(&self, kind: LedgerKind) -> &DetectionSink {
        match kind {
            LedgerKind::Camera => &self.camera_history,
            LedgerKind::Platform => &self.platform_history,
        }
    }

    pub async fn is_camera_active(&self) -> bool {
        self.scanner.lock().await.is_active()
    }

    pub async fn current_view(&self) -> Option<View> {
        *self.view.lock().await
    }

    /// Idle → Active. Failures land on the camera view's status line and the
    /// loop stays idle.
    pub async fn start_camera(&self) -> Result<(), CameraError> {
        let mut scanner = self.scanner.lock().await;
        let result = scanner.start().await;
        self.report_start(result)
    }

    /// Same as [`start_camera`](Self::start_camera) with a caller-supplied tick
    /// source.
    pub async fn start_camera_with<T>(&self, ticker: T) -> Result<(), CameraError>
    where
        T: FrameTicker + 'static,
    {
        let mut scanner = self.scanner.lock().await;
        let result = scanner.start_with(ticker).await;
        self.report_start(result)
    }

    fn report_start(&self, result: Result<(), CameraError>) -> Result<(), CameraError> {
        match &result {
            Ok(()) => self.notifier.camera_state(CameraState::Active),
            Err(CameraError::AlreadyActive) => {}
            Err(err) => {
                warn!("Camera start failed: {err}");
                self.notifier.status(LedgerKind::Camera, &err.to_string());
                self.notifier.camera_state(CameraState::Idle);
            }
        }
        result
    }

    pub async fn stop_camera(&self) -> Result<()> {
        let mut scanner = self.scanner.lock().await;
        let was_active = scanner.is_active();
        scanner.stop().await?;
        if was_active {
            self.notifier.camera_state(CameraState::Idle);
        }
        Ok(())
    }

    pub async fn toggle_camera(&self) -> Result<CameraState> {
        if self.is_camera_active().await {
            self.stop_camera().await?;
            return Ok(CameraState::Idle);
        }
        match self.start_camera().await {
            Ok(()) => Ok(CameraState::Active),
            Err(CameraError::AlreadyActive) => Ok(CameraState::Active),
            // Already reported on the status line
            Err(_) => Ok(CameraState::Idle),
        }
    }

    /// Clears the seen payloads and the camera history. The camera keeps
    /// running.
    pub async fn reset_camera_history(&self) {
        let session = self.scanner.lock().await.session();
        let mut session = session.lock().await;
        session.reset();
        self.camera_history.clear().await;
        info!("Camera history reset");
    }

    pub async fn remove_entry(&self, kind: LedgerKind, id: &str) -> bool {
        self.sink(kind).remove(id).await.is_some()
    }

    pub async fn copy_entry(&self, kind: LedgerKind, id: &str) -> Option<CopyReport> {
        let payload = self.sink(kind).payload_of(id).await?;
        Some(self.copy_text(&payload))
    }

    pub fn copy_text(&self, text: &str) -> CopyReport {
        let report = self.clipboard.copy(text);
        self.notifier.alert(&report.message);
        report
    }

    pub async fn snapshot(&self, kind: LedgerKind) -> LedgerSnapshot {
        self.sink(kind).ledger().lock().await.snapshot()
    }

    /// Runs the host scanner and records its result in the platform history.
    pub async fn platform_scan(&self) -> Result<DetectionRecord, PlatformError> {
        match self.platform.trigger_scan().await {
            Ok(payload) => Ok(self.platform_history.record(payload, Utc::now(), None).await),
            Err(err) => {
                self.notifier.alert(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn platform_ready(&self) -> bool {
        self.platform.is_ready()
    }

    /// Applies a fragment change.
    pub async fn navigate(&self, fragment: &str) -> Route {
        let route = Route::parse(fragment);
        match route {
            Route::Redirect(target) => info!("Redirecting to {target}"),
            Route::Ignore => warn!("Ignoring unknown route {fragment:?}"),
            Route::Show(View::Camera) => {
                *self.view.lock().await = Some(View::Camera);
                if !self.is_camera_active().await {
                    let _ = self.start_camera().await;
                }
            }
            Route::Show(View::Platform) => {
                *self.view.lock().await = Some(View::Platform);
                if let Err(err) = self.stop_camera().await {
                    error!("Failed to stop camera on view change: {err:?}");
                }
                if let Err(err) = self.platform.ensure_initialized().await {
                    self.notifier.alert(&err.to_string());
                }
            }
        }
        route
    }
}
