use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops, imageops::FilterType, DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::config::ScanArea;
use crate::error::FrameError;

/// Request headers carrying the dimensions of a raw RGBA frame body.
pub const FRAME_WIDTH_HEADER: &str = "x-frame-width";
pub const FRAME_HEIGHT_HEADER: &str = "x-frame-height";

/// Reads one frame dimension from a header value.
pub fn parse_dimension(header: &str, value: Option<&str>) -> Result<u32, FrameError> {
    let value = value.ok_or_else(|| FrameError::Capture(format!("missing {header} header")))?;
    value
        .trim()
        .parse()
        .map_err(|_| FrameError::Capture(format!("invalid {header} header: {value:?}")))
}

/// One camera frame at native resolution, RGBA8.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbaImage,
}

impl Frame {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(FrameError::Capture(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        RgbaImage::from_raw(width, height, pixels)
            .map(|image| Self { image })
            .ok_or_else(|| FrameError::Capture("pixel buffer rejected".into()))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Stream not ready yet.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Pixel rectangle of the frame that is handed to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScanWindow {
    pub fn for_frame(area: &ScanArea, frame_width: u32, frame_height: u32) -> Self {
        let scale = |dim: u32, fraction: f64| (dim as f64 * fraction).floor().max(0.0) as u32;
        Self {
            x: scale(frame_width, area.left),
            y: scale(frame_height, area.top),
            width: scale(frame_width, area.width),
            height: scale(frame_height, area.height),
        }
    }

    pub fn extract(&self, frame: &Frame) -> Result<RgbaImage, FrameError> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::Extract(format!(
                "scan window {}x{} is empty",
                self.width, self.height
            )));
        }
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        match (right, bottom) {
            (Some(r), Some(b)) if r <= frame.width() && b <= frame.height() => {}
            _ => {
                return Err(FrameError::Extract(format!(
                    "scan window {:?} exceeds frame {}x{}",
                    self,
                    frame.width(),
                    frame.height()
                )))
            }
        }

        Ok(imageops::crop_imm(frame.image(), self.x, self.y, self.width, self.height).to_image())
    }
}

/// Downscaled PNG snapshot of the scan window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub data_url: String,
}

impl Thumbnail {
    pub fn from_window(window: &RgbaImage, scale: f64) -> Result<Self, FrameError> {
        let width = ((window.width() as f64 * scale).floor() as u32).max(1);
        let height = ((window.height() as f64 * scale).floor() as u32).max(1);
        let scaled = imageops::resize(window, width, height, FilterType::Triangle);

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(scaled).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        Ok(Self {
            width,
            height,
            data_url: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
        })
    }
}
