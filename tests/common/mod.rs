#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::pending;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use qrledger_lib::error::{CameraError, ClipboardError, FrameError, PlatformError};
use qrledger_lib::feedback::{CameraState, Notice, Notifier};
use qrledger_lib::history::{Clipboard, ClipboardBackend, LedgerKind, LedgerSnapshot};
use qrledger_lib::platform::{PlatformSdk, ScanCodeResult};
use qrledger_lib::scanner::{
    Camera, CameraConstraints, CameraStream, DecodedCode, Decoder, Frame, FrameTicker, Inversion,
};
use qrledger_lib::scanner::decoder::Point;
use qrledger_lib::{AppConfig, AppServices, QrApp};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Feedback(LedgerKind, Notice),
    Status(LedgerKind, String),
    Alert(String),
    Ledger(LedgerKind, usize),
    Camera(CameraState),
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Event>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events().iter().filter(|e| *e == wanted).count()
    }

    pub fn has(&self, wanted: &Event) -> bool {
        self.count(wanted) > 0
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Notifier for RecordingNotifier {
    fn feedback(&self, kind: LedgerKind, notice: Notice) {
        self.push(Event::Feedback(kind, notice));
    }

    fn status(&self, kind: LedgerKind, text: &str) {
        self.push(Event::Status(kind, text.to_string()));
    }

    fn alert(&self, message: &str) {
        self.push(Event::Alert(message.to_string()));
    }

    fn ledger_changed(&self, snapshot: &LedgerSnapshot) {
        self.push(Event::Ledger(snapshot.kind, snapshot.count));
    }

    fn camera_state(&self, state: CameraState) {
        self.push(Event::Camera(state));
    }
}

/// Hands out one scripted result per decode call; a drained script is a miss.
#[derive(Default)]
pub struct ScriptedDecoder {
    script: Mutex<VecDeque<Option<String>>>,
    calls: AtomicUsize,
    delay_ms: AtomicU64,
}

impl ScriptedDecoder {
    pub fn push(&self, payload: Option<&str>) {
        self.script
            .lock()
            .unwrap()
            .push_back(payload.map(str::to_string));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every following decode block its worker thread for `delay`.
    pub fn slow_down(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Decoder for ScriptedDecoder {
    fn decode(
        &self,
        _rgba: &[u8],
        _width: u32,
        _height: u32,
        inversion: Inversion,
    ) -> Option<DecodedCode> {
        assert_eq!(inversion, Inversion::AttemptBoth);
        self.calls.fetch_add(1, Ordering::SeqCst);
        let payload = self.script.lock().unwrap().pop_front().flatten();
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        let payload = payload?;
        Some(DecodedCode {
            payload,
            corners: [Point { x: 0, y: 0 }; 4],
        })
    }
}

/// What a scripted stream returns on each capture.
pub enum Capture {
    Frame(u32, u32),
    Fail,
}

#[derive(Default)]
pub struct StreamScript {
    captures: Mutex<VecDeque<Capture>>,
    stops: AtomicUsize,
}

impl StreamScript {
    pub fn push(&self, capture: Capture) {
        self.captures.lock().unwrap().push_back(capture);
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

/// Stream that replays its script, then keeps returning 100x100 frames.
pub struct ScriptedStream {
    script: Arc<StreamScript>,
}

impl ScriptedStream {
    pub fn new(script: Arc<StreamScript>) -> Self {
        Self { script }
    }
}

impl CameraStream for ScriptedStream {
    fn capture(&mut self) -> Result<Option<Frame>, FrameError> {
        let next = self.script.captures.lock().unwrap().pop_front();
        match next.unwrap_or(Capture::Frame(100, 100)) {
            Capture::Fail => Err(FrameError::Capture("draw failed".into())),
            Capture::Frame(w, h) => {
                let frame = Frame::blank(w, h);
                Ok((!frame.is_empty()).then_some(frame))
            }
        }
    }

    fn stop(&mut self) {
        self.script.stops.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeCamera {
    pub script: Arc<StreamScript>,
    failure: Mutex<Option<CameraError>>,
    pub opened: AtomicUsize,
}

impl FakeCamera {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            script: Arc::new(StreamScript::default()),
            failure: Mutex::new(None),
            opened: AtomicUsize::new(0),
        })
    }

    pub fn fail_with(&self, err: Option<CameraError>) {
        *self.failure.lock().unwrap() = err;
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn open(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        assert_eq!(*constraints, CameraConstraints::default());
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedStream::new(Arc::clone(&self.script))))
    }
}

/// Ticks only when the test says so.
pub struct ManualTicker {
    rx: mpsc::UnboundedReceiver<()>,
}

impl ManualTicker {
    pub fn new() -> (mpsc::UnboundedSender<()>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[async_trait]
impl FrameTicker for ManualTicker {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            pending::<()>().await;
        }
    }
}

pub struct FakeSdk {
    pub in_host: bool,
    pub init_calls: AtomicUsize,
    pub scans: Mutex<VecDeque<Result<String, PlatformError>>>,
}

impl FakeSdk {
    pub fn new(in_host: bool) -> Arc<Self> {
        Arc::new(Self {
            in_host,
            init_calls: AtomicUsize::new(0),
            scans: Mutex::new(VecDeque::new()),
        })
    }

    pub fn push_scan(&self, result: Result<&str, PlatformError>) {
        self.scans
            .lock()
            .unwrap()
            .push_back(result.map(str::to_string));
    }
}

#[async_trait]
impl PlatformSdk for FakeSdk {
    fn in_host(&self) -> bool {
        self.in_host
    }

    async fn init(&self, _app_id: &str) -> Result<(), PlatformError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.in_host {
            Ok(())
        } else {
            Err(PlatformError::Init("not inside host".into()))
        }
    }

    async fn scan_code(&self) -> Result<ScanCodeResult, PlatformError> {
        let next = self
            .scans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PlatformError::Scan("cancelled".into())));
        next.map(|value| ScanCodeResult { value })
    }
}

#[derive(Default)]
pub struct MemoryClipboard {
    pub written: Mutex<Vec<String>>,
}

impl ClipboardBackend for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub app: QrApp,
    pub camera: Arc<FakeCamera>,
    pub decoder: Arc<ScriptedDecoder>,
    pub sdk: Arc<FakeSdk>,
    pub fallback_clipboard: Arc<MemoryClipboard>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(in_host: bool) -> Self {
        let camera = FakeCamera::new();
        let decoder = Arc::new(ScriptedDecoder::default());
        let sdk = FakeSdk::new(in_host);
        let fallback_clipboard = Arc::new(MemoryClipboard::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let app = QrApp::new(
            AppConfig::default(),
            AppServices {
                camera: camera.clone(),
                decoder: decoder.clone(),
                sdk: sdk.clone(),
                clipboard: Clipboard::new(None, fallback_clipboard.clone()),
                notifier: notifier.clone(),
            },
        );

        Self {
            app,
            camera,
            decoder,
            sdk,
            fallback_clipboard,
            notifier,
        }
    }
}

/// Polls `condition` until it holds or a couple of seconds pass.
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
