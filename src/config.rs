use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::scanner::camera::CameraConstraints;

pub const PLATFORM_APP_ID_ENV: &str = "QRLEDGER_PLATFORM_APP_ID";

/// Fractions of the frame analysed for a QR code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ScanArea {
    fn default() -> Self {
        Self {
            left: 0.2,
            top: 0.35,
            width: 0.6,
            height: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub scan_area: ScanArea,
    /// Thumbnail scale relative to the scan window, per dimension
    pub snapshot_scale: f64,
    /// Minimum gap between two "duplicate" notices for the same payload
    pub suppression_ms: u64,
    pub feedback_ms: u64,
    pub refresh_interval_ms: u64,
    pub tick_timeout_ms: u64,
    pub camera: CameraConstraints,
    pub platform_app_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scan_area: ScanArea::default(),
            snapshot_scale: 0.5,
            suppression_ms: 3000,
            feedback_ms: 1500,
            refresh_interval_ms: 16,
            tick_timeout_ms: 250,
            camera: CameraConstraints::default(),
            platform_app_id: "2006845142-pmbYDnKB".into(),
        }
    }
}

impl AppConfig {
    pub fn suppression_window(&self) -> Duration {
        Duration::from_millis(self.suppression_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }

    pub fn tick_timeout(&self) -> Duration {
        Duration::from_millis(self.tick_timeout_ms)
    }
}

/// Read-only configuration source. Nothing is ever written back.
pub struct ConfigStore;

impl ConfigStore {
    /// Loads `path` when present, falls back to defaults otherwise, then
    /// applies environment overrides.
    pub fn load(path: &Path) -> Result<AppConfig> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring invalid config at {}: {err}", path.display());
                AppConfig::default()
            })
        } else {
            AppConfig::default()
        };

        if let Ok(app_id) = std::env::var(PLATFORM_APP_ID_ENV) {
            if !app_id.trim().is_empty() {
                config.platform_app_id = app_id.trim().to_string();
            }
        }

        Ok(config)
    }
}
