pub mod camera;
pub mod controller;
pub mod decoder;
pub mod frame;
pub mod loop_worker;
pub mod session;

pub use camera::{Camera, CameraCapability, CameraConstraints, CameraStream, FrameSlot, HostCamera};
pub use controller::ScanController;
pub use decoder::{DecodedCode, Decoder, Inversion, RqrrDecoder};
pub use frame::{
    parse_dimension, Frame, ScanWindow, Thumbnail, FRAME_HEIGHT_HEADER, FRAME_WIDTH_HEADER,
};
pub use loop_worker::{FrameTicker, RefreshTicker, Sample, ScanWorker, TickOutcome};
pub use session::{Observation, ScanSession};
