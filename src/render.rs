//! The render list and the per-fragment rasterization driver.
//!
//! A [`RenderRecord`] is an immutable snapshot of one leaf draw operation,
//! produced during `sequence` and replayed against every fragment until the
//! next `sequence`. Heavy, rarely-mutated payloads (label text, image
//! pixels) are captured as a cheap `Rc` clone rather than a deep copy —
//! property setters that change them always install a fresh `Rc` rather
//! than mutating in place, so records already in the list keep seeing the
//! value that was live when they were built, without per-frame copying.

use std::rc::Rc;

use crate::color::Color;
use crate::fixed::{fixed_bits_n, Fixed};
use crate::font::{Font, FontMetrics, GlyphSource};
use crate::geom::{clip, Point, Size};
use crate::image::ImageData;

/// A caller-owned pixel surface the renderer draws into.
pub trait FrameBuffer {
    fn width(&self) -> u16;
    fn height(&self) -> u16;
    /// Sets one RGB565 pixel at fragment-local `(x, y)`.
    fn set_pixel(&mut self, x: u16, y: u16, value: u16);
    /// Reads one RGB565 pixel at fragment-local `(x, y)`.
    fn get_pixel(&self, x: u16, y: u16) -> u16;
}

/// A simple row-major RGB565 framebuffer, useful for tests and as a
/// reference `FrameBuffer` implementation.
pub struct PixelBuffer {
    width: u16,
    height: u16,
    pixels: Vec<u16>,
}

impl PixelBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub fn filled(width: u16, height: u16, value: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.pixels
    }
}

impl FrameBuffer for PixelBuffer {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn set_pixel(&mut self, x: u16, y: u16, value: u16) {
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.pixels[idx] = value;
    }

    fn get_pixel(&self, x: u16, y: u16) -> u16 {
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.pixels[idx]
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
    MiddleBaseline,
    Baseline,
}

/// One leaf draw operation, captured immutably at `sequence` time.
pub enum RenderRecord {
    Fill {
        color: Color,
    },
    Box {
        origin: Point,
        size: Size,
        color: Color,
    },
    Label {
        origin: Point,
        font: Font,
        metrics: FontMetrics,
        text: Rc<[u8]>,
        text_color: Color,
        outline_color: Color,
        halign: HAlign,
        valign: VAlign,
    },
    Image {
        origin: Point,
        tint: Color,
        data: Rc<ImageData>,
    },
}

impl RenderRecord {
    /// Replays this record against `fragment` at `(origin, size)` within the
    /// overall output surface. `glyphs` supplies label glyph bitmaps.
    pub fn render(
        &self,
        fb: &mut dyn FrameBuffer,
        vp_origin: Point,
        vp_size: Size,
        glyphs: &dyn GlyphSource,
    ) {
        match self {
            RenderRecord::Fill { color } => render_fill(fb, *color),
            RenderRecord::Box { origin, size, color } => {
                render_box(fb, *origin, *size, *color, vp_origin, vp_size);
            }
            RenderRecord::Label {
                origin,
                font,
                metrics,
                text,
                text_color,
                outline_color,
                halign,
                valign,
            } => render_label(
                fb,
                *origin,
                *font,
                *metrics,
                text,
                *text_color,
                *outline_color,
                *halign,
                *valign,
                vp_origin,
                vp_size,
                glyphs,
            ),
            RenderRecord::Image { origin, tint, data } => {
                render_image(fb, *origin, *tint, data, vp_origin, vp_size);
            }
        }
    }
}

fn render_fill(fb: &mut dyn FrameBuffer, color: Color) {
    let word = color.rgb16();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            fb.set_pixel(x, y, word);
        }
    }
}

fn render_box(
    fb: &mut dyn FrameBuffer,
    origin: Point,
    size: Size,
    color: Color,
    vp_origin: Point,
    vp_size: Size,
) {
    // Darker sentinels are recognized by exact word equality, never decoded
    // as ordinary RGBA — they mean "mask+shift the destination", not "paint
    // a source color". Box recognizes the two sentinels with a defined
    // per-pixel formula; RGBA_DARKER25 is reserved but has no box-rasterizer
    // formula, so it falls through to the generic opacity-based paths below
    // like any other color word.
    use crate::color::{RGBA_DARKER50, RGBA_DARKER75};

    if color == RGBA_DARKER50 {
        paint_clip(fb, origin, size, vp_origin, vp_size, |dst| (dst & 0xF7BE) >> 1);
        return;
    }
    if color == RGBA_DARKER75 {
        paint_clip(fb, origin, size, vp_origin, vp_size, |dst| (dst & 0xE79C) >> 2);
        return;
    }
    if color.is_transparent() {
        return;
    }

    let opaque = color.opacity() >= crate::color::OPACITY_MAX;
    if opaque {
        let word = color.rgb16();
        paint_clip(fb, origin, size, vp_origin, vp_size, |_| word);
    } else {
        paint_clip(fb, origin, size, vp_origin, vp_size, |dst| {
            color.blend(rgb565_to_color(dst)).rgb16()
        });
    }
}

fn paint_clip(
    fb: &mut dyn FrameBuffer,
    origin: Point,
    size: Size,
    vp_origin: Point,
    vp_size: Size,
    mut pixel_fn: impl FnMut(u16) -> u16,
) {
    let c = clip(origin, size, vp_origin, vp_size);
    if c.width == 0 {
        return;
    }
    for row in 0..c.height {
        for col in 0..c.width {
            let x = c.vp_x + col;
            let y = c.vp_y + row;
            let dst = fb.get_pixel(x, y);
            fb.set_pixel(x, y, pixel_fn(dst));
        }
    }
}

fn rgb565_to_color(word: u16) -> Color {
    let r5 = (word >> 11) & 0x1F;
    let g6 = (word >> 5) & 0x3F;
    let b5 = word & 0x1F;
    let r = ((u32::from(r5) * 255 + 15) / 31) as u8;
    let g = ((u32::from(g6) * 255 + 31) / 63) as u8;
    let b = ((u32::from(b5) * 255 + 15) / 31) as u8;
    Color::rgb(r, g, b)
}

#[allow(clippy::too_many_arguments)]
fn render_label(
    fb: &mut dyn FrameBuffer,
    origin: Point,
    font: Font,
    metrics: FontMetrics,
    text: &[u8],
    text_color: Color,
    outline_color: Color,
    halign: HAlign,
    valign: VAlign,
    vp_origin: Point,
    vp_size: Size,
    glyphs: &dyn GlyphSource,
) {
    const GAP: u16 = 2;
    let advance = metrics.cell_width + GAP;
    let total_width = advance.saturating_mul(text.len() as u16);

    let x_shift = match halign {
        HAlign::Left => 0,
        HAlign::Center => total_width / 2,
        HAlign::Right => total_width,
    };
    let y_shift = match valign {
        VAlign::Top => 0,
        VAlign::Middle => metrics.cell_height / 2,
        VAlign::Bottom => metrics.cell_height,
        VAlign::MiddleBaseline => metrics.cell_height / 2 + metrics.descent,
        VAlign::Baseline => metrics.descent,
    };
    let base = Point::new(
        origin.x.wrapping_sub(x_shift as i16),
        origin.y.wrapping_sub(y_shift as i16),
    );

    // Outline pass first (offset by the font's outline width), then the primary glyphs.
    if !outline_color.is_transparent() && metrics.outline_width > 0 {
        draw_glyph_run(
            fb,
            Point::new(
                base.x.wrapping_sub(metrics.outline_width as i16),
                base.y.wrapping_sub(metrics.outline_width as i16),
            ),
            advance,
            metrics,
            text,
            outline_color,
            vp_origin,
            vp_size,
            font,
            glyphs,
        );
    }
    draw_glyph_run(
        fb, base, advance, metrics, text, text_color, vp_origin, vp_size, font, glyphs,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph_run(
    fb: &mut dyn FrameBuffer,
    base: Point,
    advance: u16,
    metrics: FontMetrics,
    text: &[u8],
    color: Color,
    vp_origin: Point,
    vp_size: Size,
    font: Font,
    glyphs: &dyn GlyphSource,
) {
    if color.is_transparent() {
        return;
    }
    let opaque = color.opacity() >= crate::color::OPACITY_MAX;
    let word = color.rgb16();

    for (i, &ch) in text.iter().enumerate() {
        let cell_origin = Point::new(
            base.x.wrapping_add((advance as i16).wrapping_mul(i as i16)),
            base.y,
        );
        let Some(glyph) = glyphs.glyph(font, ch) else {
            continue;
        };
        let cell_size = Size::new(u16::from(glyph.width), u16::from(glyph.height));
        let c = clip(cell_origin, cell_size, vp_origin, vp_size);
        if c.width == 0 {
            continue;
        }
        for row in 0..c.height {
            for col in 0..c.width {
                if !glyph.pixel((c.x + col) as u8, (c.y + row) as u8) {
                    continue;
                }
                let x = c.vp_x + col;
                let y = c.vp_y + row;
                if opaque {
                    fb.set_pixel(x, y, word);
                } else {
                    let dst = fb.get_pixel(x, y);
                    fb.set_pixel(x, y, color.blend(rgb565_to_color(dst)).rgb16());
                }
            }
        }
        let _ = metrics;
    }
}

fn render_image(
    fb: &mut dyn FrameBuffer,
    origin: Point,
    tint: Color,
    data: &ImageData,
    vp_origin: Point,
    vp_size: Size,
) {
    let size = Size::new(data.width, data.height);
    let c = clip(origin, size, vp_origin, vp_size);
    if c.width == 0 {
        return;
    }
    let has_alpha = data.has_alpha_channel();
    for row in 0..c.height {
        for col in 0..c.width {
            let src_x = c.x + col;
            let src_y = c.y + row;
            let Some((word, alpha)) = data.sample(src_x, src_y) else {
                continue;
            };
            let x = c.vp_x + col;
            let y = c.vp_y + row;

            // RGB565 and Palette8 carry no per-pixel alpha and are copied
            // verbatim, tint included, matching the reference rasterizer;
            // only RGB565+A4 blends tint opacity against its alpha channel.
            if !has_alpha {
                fb.set_pixel(x, y, word);
                continue;
            }

            let tint_opacity = tint.opacity();
            if alpha == 0xFF && tint_opacity >= crate::color::OPACITY_MAX {
                fb.set_pixel(x, y, word);
                continue;
            }
            if alpha == 0 {
                continue;
            }
            let src_color = rgb565_to_color(word);
            // Both factors go through Q15.16 before combining, the same
            // intermediate precision `Color::rgba24` uses for its own
            // opacity field: `fixed_bits_n(5)` expands the clamped 0..=31
            // opacity into Q15.16, `alpha` (already expanded from its
            // source nibble by `ImageData::sample`) is treated as an
            // 8-bit fraction of full scale, and the two fractions are
            // multiplied in fixed point rather than combined by plain
            // integer division.
            let (mul, shift) = fixed_bits_n(5);
            let opacity_q16 = (u32::from(tint_opacity.min(31)) * mul) >> shift;
            let alpha_fixed = Fixed::ratio(i32::from(alpha), 255);
            let opacity_fixed = Fixed(opacity_q16 as i32);
            let combined_q16 = alpha_fixed.mul(opacity_fixed).0.max(0) as u32;
            let combined_opacity = ((combined_q16 * u32::from(crate::color::OPACITY_MAX)) >> 16)
                .min(u32::from(crate::color::OPACITY_MAX)) as u8;
            let tinted = Color::rgba(
                src_color.parse_rgb().r,
                src_color.parse_rgb().g,
                src_color.parse_rgb().b,
                combined_opacity,
            );
            let dst = fb.get_pixel(x, y);
            fb.set_pixel(x, y, tinted.blend(rgb565_to_color(dst)).rgb16());
        }
    }
}
