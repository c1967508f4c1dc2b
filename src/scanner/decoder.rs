use serde::Serialize;

/// Which polarities the decoder tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inversion {
    Original,
    /// Dark-on-light first, then light-on-dark.
    AttemptBoth,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DecodedCode {
    pub payload: String,
    /// Symbol corners in scan-window coordinates
    pub corners: [Point; 4],
}

/// Pixel buffer in, decoded payload out. A miss is `None`, never an error.
pub trait Decoder: Send + Sync {
    fn decode(&self, rgba: &[u8], width: u32, height: u32, inversion: Inversion)
        -> Option<DecodedCode>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl Decoder for RqrrDecoder {
    fn decode(
        &self,
        rgba: &[u8],
        width: u32,
        height: u32,
        inversion: Inversion,
    ) -> Option<DecodedCode> {
        let (width, height) = (width as usize, height as usize);
        let luma = to_luma(rgba, width, height)?;

        if let Some(code) = decode_luma(&luma, width, height) {
            return Some(code);
        }

        match inversion {
            Inversion::Original => None,
            Inversion::AttemptBoth => {
                let inverted: Vec<u8> = luma.iter().map(|v| 255 - v).collect();
                decode_luma(&inverted, width, height)
            }
        }
    }
}

fn to_luma(rgba: &[u8], width: usize, height: usize) -> Option<Vec<u8>> {
    if width == 0 || height == 0 || rgba.len() != width * height * 4 {
        return None;
    }
    Some(
        rgba.chunks_exact(4)
            .map(|px| {
                let value = 0.2126 * px[0] as f32 + 0.7152 * px[1] as f32 + 0.0722 * px[2] as f32;
                value.round().clamp(0.0, 255.0) as u8
            })
            .collect(),
    )
}

fn decode_luma(luma: &[u8], width: usize, height: usize) -> Option<DecodedCode> {
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| luma[y * width + x]);

    prepared.detect_grids().into_iter().find_map(|grid| {
        let corners = grid.bounds.map(|p| Point { x: p.x, y: p.y });
        grid.decode()
            .ok()
            .map(|(_, payload)| DecodedCode { payload, corners })
    })
}
