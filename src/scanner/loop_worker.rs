use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::RgbaImage;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::ScanArea;
use crate::error::FrameError;
use crate::feedback::Notice;
use crate::history::{DetectionRecord, DetectionSink};

use super::camera::CameraStream;
use super::decoder::{DecodedCode, Decoder, Inversion};
use super::frame::{ScanWindow, Thumbnail};
use super::session::{Observation, ScanSession};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Drives the loop. One tick per display refresh in production; tests can
/// hand in their own cadence.
#[async_trait]
pub trait FrameTicker: Send {
    async fn tick(&mut self);
}

pub struct RefreshTicker {
    interval: Interval,
}

impl RefreshTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl FrameTicker for RefreshTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Result of the sampling stage of a tick.
#[derive(Debug)]
pub enum Sample {
    NotReady,
    NoCode,
    Code { code: DecodedCode, window: RgbaImage },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Stream has no frame with non-zero dimensions yet
    NotReady,
    NoCode,
    Detected(DetectionRecord),
    Duplicate { notified: bool },
}

pub struct ScanWorker {
    session: Arc<Mutex<ScanSession>>,
    stream: Box<dyn CameraStream>,
    decoder: Arc<dyn Decoder>,
    sink: DetectionSink,
    scan_area: ScanArea,
    snapshot_scale: f64,
}

impl ScanWorker {
    pub fn new(
        session: Arc<Mutex<ScanSession>>,
        stream: Box<dyn CameraStream>,
        decoder: Arc<dyn Decoder>,
        sink: DetectionSink,
        scan_area: ScanArea,
        snapshot_scale: f64,
    ) -> Self {
        Self {
            session,
            stream,
            decoder,
            sink,
            scan_area,
            snapshot_scale,
        }
    }

    /// One full tick: sample, then classify whatever was decoded.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Result<TickOutcome, FrameError> {
        match self.sample().await? {
            Sample::NotReady => Ok(TickOutcome::NotReady),
            Sample::NoCode => Ok(TickOutcome::NoCode),
            Sample::Code { code, window } => Ok(self.classify(code, window, now).await),
        }
    }

    /// Capture, crop to the scan window and decode. Touches no shared state,
    /// so dropping it midway loses nothing.
    pub async fn sample(&mut self) -> Result<Sample, FrameError> {
        let Some(frame) = self.stream.capture()? else {
            return Ok(Sample::NotReady);
        };

        let window = ScanWindow::for_frame(&self.scan_area, frame.width(), frame.height());
        let pixels = window.extract(&frame)?;
        drop(frame);

        let decoder = Arc::clone(&self.decoder);
        let (pixels, decoded) = tokio::task::spawn_blocking(move || {
            let decoded = decoder.decode(
                pixels.as_raw(),
                pixels.width(),
                pixels.height(),
                Inversion::AttemptBoth,
            );
            (pixels, decoded)
        })
        .await
        .map_err(|err| FrameError::Worker(format!("decode worker join failed: {err}")))?;

        Ok(match decoded {
            Some(code) => Sample::Code {
                code,
                window: pixels,
            },
            None => Sample::NoCode,
        })
    }

    /// Dedup and record a decoded payload. Once the payload is marked seen
    /// this must run to completion, so callers never put it under a timeout.
    pub async fn classify(
        &mut self,
        code: DecodedCode,
        window: RgbaImage,
        now: DateTime<Utc>,
    ) -> TickOutcome {
        // Held until the record lands so a concurrent reset cannot split the
        // seen-set from the ledger.
        let mut session = self.session.lock().await;
        match session.observe(&code.payload, now) {
            Observation::New => {
                let scale = self.snapshot_scale;
                let thumbnail =
                    tokio::task::spawn_blocking(move || Thumbnail::from_window(&window, scale))
                        .await
                        .map_err(|err| {
                            FrameError::Worker(format!("thumbnail worker join failed: {err}"))
                        })
                        .and_then(|result| result);
                let thumbnail = match thumbnail {
                    Ok(thumbnail) => Some(thumbnail),
                    Err(err) => {
                        log_warn!("recording {:?} without thumbnail: {err}", code.payload);
                        None
                    }
                };

                let record = self.sink.record(code.payload, now, thumbnail).await;
                drop(session);

                self.sink.notifier().feedback(self.sink.kind(), Notice::Detected);
                TickOutcome::Detected(record)
            }
            Observation::Duplicate { notify } => {
                drop(session);
                if notify {
                    self.sink
                        .notifier()
                        .feedback(self.sink.kind(), Notice::Duplicate);
                }
                TickOutcome::Duplicate { notified: notify }
            }
        }
    }

    pub fn into_stream(self) -> Box<dyn CameraStream> {
        self.stream
    }
}

/// Samples until cancelled, then hands the worker back so the caller can
/// release the camera.
pub async fn scan_loop<T: FrameTicker>(
    mut worker: ScanWorker,
    mut ticker: T,
    cancel_token: CancellationToken,
    tick_timeout: Duration,
) -> ScanWorker {
    log_info!("scan loop started");

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                log_info!("scan loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let tick_start = Instant::now();
                let now = Utc::now();
                // Only sampling is bounded; classification always finishes.
                let sampled = tokio::time::timeout(tick_timeout, worker.sample()).await;
                let outcome = match sampled {
                    Ok(Ok(Sample::Code { code, window })) => {
                        worker.classify(code, window, now).await
                    }
                    Ok(Ok(Sample::NotReady)) => TickOutcome::NotReady,
                    Ok(Ok(Sample::NoCode)) => TickOutcome::NoCode,
                    Ok(Err(err)) => {
                        log_error!("scan tick failed: {err}");
                        continue;
                    }
                    Err(_) => {
                        log_warn!("scan sample timeout (> {}ms)", tick_timeout.as_millis());
                        continue;
                    }
                };

                match outcome {
                    TickOutcome::Detected(record) => log_info!(
                        "QR #{} recorded in {}ms",
                        record.sequence_number,
                        tick_start.elapsed().as_millis()
                    ),
                    TickOutcome::Duplicate { notified: true } => {
                        log_debug!("duplicate QR notice shown");
                    }
                    _ => {}
                }
            }
        }
    }

    worker
}
