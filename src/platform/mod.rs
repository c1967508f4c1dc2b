pub mod adapter;
pub mod sdk;

pub use adapter::PlatformScanAdapter;
pub use sdk::{OutsideHostSdk, PlatformSdk, ScanCodeResult};
