//! Image header parsing for the three pixel formats `Image` nodes support.
//!
//! The image format is an external asset-pipeline concern: the core only
//! needs to be able to walk the header and sample a pixel, not produce or
//! validate the assets themselves.

use crate::errors::{EmberError, Result};
use crate::fixed::fixed_bits_n;

const FORMAT_RGB565: u16 = 0x04;
const FORMAT_RGB565_A4: u16 = 0x05;
const FORMAT_PALETTE8: u16 = 0x38;

enum ImageKind {
    Rgb565 { pixels: Vec<u16> },
    Rgb565Alpha4 { pixels: Vec<u16>, alpha: Vec<u8> },
    Palette8 { palette: Box<[u16; 256]>, indices: Vec<u8> },
}

/// A decoded image: dimensions plus pixel data in one of the three
/// supported formats.
pub struct ImageData {
    pub width: u16,
    pub height: u16,
    kind: ImageKind,
}

impl ImageData {
    /// Parses a header'd pixel buffer: `data[0]` = format tag (low byte),
    /// `data[1]` = width, `data[2]` = height, `data[3..]` = format-specific
    /// payload.
    pub fn parse(data: &[u16]) -> Result<ImageData> {
        if data.len() < 3 {
            return Err(EmberError::ImageFormat("header truncated".into()));
        }
        let tag = data[0] & 0xFF;
        let width = data[1];
        let height = data[2];
        let pixel_count = usize::from(width) * usize::from(height);
        let payload = &data[3..];

        let kind = match tag {
            FORMAT_RGB565 => {
                if payload.len() < pixel_count {
                    return Err(EmberError::ImageFormat("RGB565 payload truncated".into()));
                }
                ImageKind::Rgb565 {
                    pixels: payload[..pixel_count].to_vec(),
                }
            }
            FORMAT_RGB565_A4 => {
                if payload.is_empty() {
                    return Err(EmberError::ImageFormat("A4 payload truncated".into()));
                }
                let alpha_count = usize::from(payload[0]);
                let alpha_words = alpha_count.div_ceil(4);
                let alpha_region = &payload[1..1 + alpha_words];
                let mut alpha = Vec::with_capacity(alpha_count);
                'outer: for &word in alpha_region {
                    for shift in [0u32, 4, 8, 12] {
                        if alpha.len() >= alpha_count {
                            break 'outer;
                        }
                        alpha.push(((word >> shift) & 0xF) as u8);
                    }
                }
                let pixel_start = 1 + alpha_words;
                if payload.len() < pixel_start + pixel_count {
                    return Err(EmberError::ImageFormat("A4 pixel payload truncated".into()));
                }
                ImageKind::Rgb565Alpha4 {
                    pixels: payload[pixel_start..pixel_start + pixel_count].to_vec(),
                    alpha,
                }
            }
            FORMAT_PALETTE8 => {
                if payload.len() < 256 {
                    return Err(EmberError::ImageFormat("palette truncated".into()));
                }
                let mut palette = Box::new([0u16; 256]);
                palette.copy_from_slice(&payload[..256]);
                let index_words = &payload[256..];
                let mut indices = Vec::with_capacity(pixel_count);
                'outer2: for &word in index_words {
                    for shift in [0u32, 8] {
                        if indices.len() >= pixel_count {
                            break 'outer2;
                        }
                        indices.push(((word >> shift) & 0xFF) as u8);
                    }
                }
                if indices.len() < pixel_count {
                    return Err(EmberError::ImageFormat("index payload truncated".into()));
                }
                ImageKind::Palette8 { palette, indices }
            }
            other => return Err(EmberError::UnknownImageFormat(other)),
        };

        Ok(ImageData { width, height, kind })
    }

    /// Whether this format carries a per-pixel alpha channel (only
    /// RGB565+A4 does). RGB565 and Palette8 are copied verbatim at render
    /// time, tint included, matching the reference rasterizer.
    #[must_use]
    pub fn has_alpha_channel(&self) -> bool {
        matches!(self.kind, ImageKind::Rgb565Alpha4 { .. })
    }

    /// Samples the pixel at `(x, y)`, returning the RGB565 word and an
    /// 8-bit alpha (`0xFF` for formats with no per-pixel alpha channel).
    /// Returns `None` if out of bounds.
    #[must_use]
    pub fn sample(&self, x: u16, y: u16) -> Option<(u16, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        match &self.kind {
            ImageKind::Rgb565 { pixels } => Some((pixels[idx], 0xFF)),
            ImageKind::Rgb565Alpha4 { pixels, alpha } => {
                let (mul, shift) = fixed_bits_n(4);
                let a16 = (u32::from(alpha[idx]) * mul) >> shift; // Q15.16, 0..=0x10000
                let a8 = (a16 >> 8).min(0xFF) as u8;
                Some((pixels[idx], a8))
            }
            ImageKind::Palette8 { palette, indices } => {
                Some((palette[usize::from(indices[idx])], 0xFF))
            }
        }
    }
}
