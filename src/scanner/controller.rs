use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::error::CameraError;
use crate::history::DetectionSink;

use super::camera::Camera;
use super::decoder::Decoder;
use super::loop_worker::{scan_loop, FrameTicker, RefreshTicker, ScanWorker};
use super::session::ScanSession;

/// Owns the camera scan session and the Idle/Active loop lifecycle.
pub struct ScanController {
    camera: Arc<dyn Camera>,
    decoder: Arc<dyn Decoder>,
    sink: DetectionSink,
    config: AppConfig,
    session: Arc<Mutex<ScanSession>>,
    handle: Option<JoinHandle<ScanWorker>>,
    cancel_token: Option<CancellationToken>,
}

impl ScanController {
    pub fn new(
        camera: Arc<dyn Camera>,
        decoder: Arc<dyn Decoder>,
        sink: DetectionSink,
        config: AppConfig,
    ) -> Self {
        let session = ScanSession::new(config.suppression_window());
        Self {
            camera,
            decoder,
            sink,
            config,
            session: Arc::new(Mutex::new(session)),
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn session(&self) -> Arc<Mutex<ScanSession>> {
        Arc::clone(&self.session)
    }

    /// Idle → Active with a refresh-rate ticker.
    pub async fn start(&mut self) -> Result<(), CameraError> {
        let period = self.config.refresh_interval();
        self.start_with(RefreshTicker::new(period)).await
    }

    pub async fn start_with<T>(&mut self, ticker: T) -> Result<(), CameraError>
    where
        T: FrameTicker + 'static,
    {
        if self.handle.is_some() {
            return Err(CameraError::AlreadyActive);
        }

        let stream = self.camera.open(&self.config.camera).await?;
        {
            let session = self.session.lock().await;
            info!("Starting camera scan for session {}", session.id());
        }

        let worker = ScanWorker::new(
            Arc::clone(&self.session),
            stream,
            Arc::clone(&self.decoder),
            self.sink.clone(),
            self.config.scan_area,
            self.config.snapshot_scale,
        );

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(scan_loop(
            worker,
            ticker,
            cancel_token.clone(),
            self.config.tick_timeout(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Active → Idle. Releases the camera stream. No-op while idle.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            let worker = handle.await.context("scan loop task failed to join")?;
            worker.into_stream().stop();
            info!("Camera released");
        }
        Ok(())
    }
}
