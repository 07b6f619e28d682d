//! Unified RGBA/HSVA color word, conversions, blending, and interpolation.
//!
//! A [`Color`] is a 32-bit word: bit 31 selects the format (RGBA or HSVA),
//! a 6-bit opacity field follows, then 24 bits of packed components. Three
//! full-word sentinels (`RGBA_DARKER25/50/75`) live outside this packing
//! scheme entirely — they are recognized by exact equality, never decoded.

use crate::fixed::Fixed;
use crate::fixed::fixed_bits_n;

const FORMAT_HSV_BIT: u32 = 1 << 31;
const OPACITY_SHIFT: u32 = 25;
const OPACITY_MASK: u32 = 0x3F;

const R_SHIFT: u32 = 16;
const G_SHIFT: u32 = 8;
const B_SHIFT: u32 = 0;

const H_SHIFT: u32 = 12;
const S_SHIFT: u32 = 6;
const V_SHIFT: u32 = 0;

const HUE_MAX: u16 = 3959;

/// Fully opaque. The opacity range is `0..=32`, not the 5-bit `0..=31` a
/// naive reading of "percent in 32nds" would suggest — formatting divides
/// by 32 and the darker-box rasterizer compares against `opacity == 32`
/// directly, so the field here is 6 bits wide rather than 5 to hold the
/// extra value. Recorded as an Open Question resolution in DESIGN.md.
pub const OPACITY_MAX: u8 = 32;

/// A packed RGBA or HSVA color word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Color(pub u32);

/// Reserved sentinel recognized by the box rasterizer: darken the
/// destination's RGB565 value by masking then shifting right by 2.
pub const RGBA_DARKER25: Color = Color(0x1800_0000);
/// Reserved sentinel: darken the destination by masking then shifting right by 1.
pub const RGBA_DARKER50: Color = Color(0x1000_0000);
/// Reserved sentinel: darken the destination by masking then shifting right by 2.
pub const RGBA_DARKER75: Color = Color(0x0800_0000);
/// Any color with opacity 0 is transparent; this is the canonical instance.
pub const COLOR_TRANSPARENT: Color = Color(0);

/// RGBA components in their native 8-bit depths plus a 0..=32 opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbaComponents {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub opacity: u8,
}

/// HSVA components: 12-bit hue (0..=3959), 6-bit saturation/value, 0..=32 opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HsvaComponents {
    pub h: u16,
    pub s: u8,
    pub v: u8,
    pub opacity: u8,
}

impl Color {
    /// Builds an opaque RGB color, clamping components to 8 bits.
    #[must_use]
    pub fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::rgba(r, g, b, OPACITY_MAX)
    }

    /// Builds an RGBA color; `opacity` is clamped to `0..=32`.
    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, opacity: u8) -> Color {
        let opacity = opacity.min(OPACITY_MAX);
        Color(
            (u32::from(r) << R_SHIFT)
                | (u32::from(g) << G_SHIFT)
                | (u32::from(b) << B_SHIFT)
                | (u32::from(opacity) << OPACITY_SHIFT),
        )
    }

    /// Builds an opaque HSV color; `h` wraps into `0..=3959`, `s`/`v` clamp to `0..=63`.
    #[must_use]
    pub fn hsv(h: u16, s: u8, v: u8) -> Color {
        Color::hsva(h, s, v, OPACITY_MAX)
    }

    /// Builds an HSVA color; `h` wraps into `0..=3959`, `s`/`v` clamp to `0..=63`,
    /// `opacity` clamps to `0..=32`.
    #[must_use]
    pub fn hsva(h: u16, s: u8, v: u8, opacity: u8) -> Color {
        let h = h % (HUE_MAX + 1);
        let s = s.min(63);
        let v = v.min(63);
        let opacity = opacity.min(OPACITY_MAX);
        Color(
            FORMAT_HSV_BIT
                | (u32::from(h) << H_SHIFT)
                | (u32::from(s) << S_SHIFT)
                | (u32::from(v) << V_SHIFT)
                | (u32::from(opacity) << OPACITY_SHIFT),
        )
    }

    #[must_use]
    pub const fn is_hsv(self) -> bool {
        self.0 & FORMAT_HSV_BIT != 0
    }

    #[must_use]
    pub fn opacity(self) -> u8 {
        ((self.0 >> OPACITY_SHIFT) & OPACITY_MASK).min(u32::from(OPACITY_MAX)) as u8
    }

    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.opacity() == 0
    }

    /// Extracts the native HSVA fields, assuming `self` is already an HSVA word.
    fn raw_hsv(self) -> HsvaComponents {
        HsvaComponents {
            h: ((self.0 >> H_SHIFT) & 0xFFF) as u16,
            s: ((self.0 >> S_SHIFT) & 0x3F) as u8,
            v: ((self.0 >> V_SHIFT) & 0x3F) as u8,
            opacity: self.opacity(),
        }
    }

    /// Extracts the native RGBA fields, assuming `self` is already an RGBA word.
    fn raw_rgb(self) -> RgbaComponents {
        RgbaComponents {
            r: ((self.0 >> R_SHIFT) & 0xFF) as u8,
            g: ((self.0 >> G_SHIFT) & 0xFF) as u8,
            b: ((self.0 >> B_SHIFT) & 0xFF) as u8,
            opacity: self.opacity(),
        }
    }

    /// Returns this color's RGBA components, converting from HSVA first if needed.
    #[must_use]
    pub fn parse_rgb(self) -> RgbaComponents {
        if self.is_hsv() {
            let hsv = self.raw_hsv();
            let (r, g, b) = hsv2rgb(hsv.h, hsv.s, hsv.v);
            RgbaComponents {
                r,
                g,
                b,
                opacity: hsv.opacity,
            }
        } else {
            self.raw_rgb()
        }
    }

    /// Returns this color's HSVA components, converting from RGBA first if needed.
    #[must_use]
    pub fn parse_hsv(self) -> HsvaComponents {
        if self.is_hsv() {
            self.raw_hsv()
        } else {
            let rgb = self.raw_rgb();
            let (h, s, v) = rgb2hsv(rgb.r, rgb.g, rgb.b);
            HsvaComponents {
                h,
                s,
                v,
                opacity: rgb.opacity,
            }
        }
    }

    /// Converts to an RGBA word unconditionally (a no-op if already RGBA).
    #[must_use]
    pub fn to_rgba(self) -> Color {
        if self.is_hsv() {
            let c = self.parse_rgb();
            Color::rgba(c.r, c.g, c.b, c.opacity)
        } else {
            self
        }
    }

    /// RGB565 packing (5/6/5 bits), discarding opacity.
    #[must_use]
    pub fn rgb16(self) -> u16 {
        let c = self.parse_rgb();
        let r5 = u16::from(c.r) >> 3;
        let g6 = u16::from(c.g) >> 2;
        let b5 = u16::from(c.b) >> 3;
        (r5 << 11) | (g6 << 5) | b5
    }

    /// `0x00RRGGBB`.
    #[must_use]
    pub fn rgb24(self) -> u32 {
        let c = self.parse_rgb();
        (u32::from(c.r) << 16) | (u32::from(c.g) << 8) | u32::from(c.b)
    }

    /// `0xAARRGGBB`, with opacity scaled from its 5-bit-table domain to 8 bits.
    #[must_use]
    pub fn rgba24(self) -> u32 {
        let c = self.parse_rgb();
        let (mul, shift) = fixed_bits_n(5);
        let opacity = c.opacity.min(31);
        let a16 = (u32::from(opacity) * mul) >> shift; // Q15.16, 0..=0x10000
        let a8 = (a16 >> 8).min(0xFF); // top 8 bits, clamped (0x10000 >> 8 == 0x100)
        (a8 << 24) | self.rgb24()
    }

    /// Returns a copy of `self` with the opacity field replaced, preserving
    /// format (RGBA or HSVA) and every other component. Used by the Box/
    /// Label/Fill "opacity" setters, which fold opacity into the color
    /// rather than storing it as a separate property.
    #[must_use]
    pub fn with_opacity(self, opacity: u8) -> Color {
        let opacity = opacity.min(OPACITY_MAX);
        Color((self.0 & !(OPACITY_MASK << OPACITY_SHIFT)) | (u32::from(opacity) << OPACITY_SHIFT))
    }

    /// Linearly interpolates between `self` and `end` by `t` in `[0, ONE]`.
    /// Coerces both operands to RGBA first unless both are already RGBA.
    #[must_use]
    pub fn lerp(self, end: Color, t: Fixed) -> Color {
        let a = self.parse_rgb();
        let b = end.parse_rgb();
        Color::rgba(
            lerp_u8(a.r, b.r, t),
            lerp_u8(a.g, b.g, t),
            lerp_u8(a.b, b.b, t),
            lerp_u8(a.opacity, b.opacity, t),
        )
    }

    /// Premultiplied over-compositing: `fg.opacity * fg + (1 - fg.opacity) * bg`.
    #[must_use]
    pub fn blend(self, bg: Color) -> Color {
        let fg = self.parse_rgb();
        let bg = bg.parse_rgb();
        let alpha = Fixed::ratio(i32::from(fg.opacity), i32::from(OPACITY_MAX));
        let one_minus_alpha = Fixed::ONE - alpha;
        let mix = |f: u8, b: u8| -> u8 {
            let f = Fixed::from_int(i32::from(f)).mul(alpha);
            let b = Fixed::from_int(i32::from(b)).mul(one_minus_alpha);
            (f + b).to_int().clamp(0, 255) as u8
        };
        Color::rgba(mix(fg.r, bg.r), mix(fg.g, bg.g), mix(fg.b, bg.b), OPACITY_MAX)
    }

    /// Formats as `RGB(r/255, g/255, b/255, a/32)` or `HSV(h, s/63, v/63, a/32)`,
    /// NUL-terminated. `buf` must be at least 40 bytes. Returns the written length.
    #[must_use]
    pub fn sprint(self, buf: &mut [u8; 40]) -> usize {
        use core::fmt::Write as _;
        let len = {
            let mut s = FixedBuf { buf, len: 0 };
            if self.is_hsv() {
                let c = self.raw_hsv();
                let _ = write!(s, "HSV({}, {}/63, {}/63, {}/32)", c.h, c.s, c.v, c.opacity);
            } else {
                let c = self.raw_rgb();
                let _ = write!(
                    s,
                    "RGB({}/255, {}/255, {}/255, {}/32)",
                    c.r, c.g, c.b, c.opacity
                );
            }
            s.len
        };
        buf[len] = 0;
        len
    }
}

fn lerp_u8(a: u8, b: u8, t: Fixed) -> u8 {
    let diff = i32::from(b) - i32::from(a);
    let delta = Fixed::scalar(diff, t);
    (i32::from(a) + delta).clamp(0, 255) as u8
}

/// Partitions `[0, ONE]` into `colors.len() - 1` equal segments and lerps on
/// the segment containing `t`. At segment boundaries, returns the stop color
/// exactly (no interpolation drift). `colors` must have at least 2 entries.
#[must_use]
pub fn lerp_color_ramp(colors: &[Color], t: Fixed) -> Color {
    debug_assert!(colors.len() >= 2, "lerp_color_ramp: need at least 2 stops");
    let segments = (colors.len() - 1) as i32;
    let t = t.clamp(Fixed::ZERO, Fixed::ONE);
    let scaled = Fixed::from_int(segments).mul(t);
    let mut index = scaled.to_int();
    if index >= segments {
        index = segments - 1;
    }
    let segment_start = Fixed::ratio(index, segments);
    let local_t = if segments == 0 {
        Fixed::ZERO
    } else {
        (t - segment_start).mul(Fixed::from_int(segments))
    };
    colors[index as usize].lerp(colors[index as usize + 1], local_t.clamp(Fixed::ZERO, Fixed::ONE))
}

/// Standard six-sector HSV→RGB conversion. `h` in `0..=3959`, `s`/`v` in `0..=63`.
#[must_use]
pub fn hsv2rgb(h: u16, s: u8, v: u8) -> (u8, u8, u8) {
    let v_f = f32::from(v) / 63.0;
    if s == 0 {
        let c = (v_f * 255.0).round().clamp(0.0, 255.0) as u8;
        return (c, c, c);
    }
    let s_f = f32::from(s) / 63.0;
    let h_deg = f32::from(h) / 11.0; // 3960 units / 360 degrees == 11 units/degree
    let sector = h_deg / 60.0;
    let i = sector.floor() as i32;
    let f = sector - sector.floor();

    let p = v_f * (1.0 - s_f);
    let q = v_f * (1.0 - s_f * f);
    let t = v_f * (1.0 - s_f * (1.0 - f));

    let (r, g, b) = match i.rem_euclid(6) {
        0 => (v_f, t, p),
        1 => (q, v_f, p),
        2 => (p, v_f, t),
        3 => (p, q, v_f),
        4 => (t, p, v_f),
        _ => (v_f, p, q),
    };

    let scale = |x: f32| (x * 255.0).round().clamp(0.0, 255.0) as u8;
    (scale(r), scale(g), scale(b))
}

/// Standard six-sector RGB→HSV conversion, with max-component ties broken
/// R before G before B. Returns `h` in `0..=3959`, `s`/`v` in `0..=63`.
#[must_use]
pub fn rgb2hsv(r: u8, g: u8, b: u8) -> (u16, u8, u8) {
    let rf = f32::from(r) / 255.0;
    let gf = f32::from(g) / 255.0;
    let bf = f32::from(b) / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = (max * 63.0).round().clamp(0.0, 63.0) as u8;
    if delta <= f32::EPSILON {
        return (0, 0, v);
    }
    let s = ((delta / max) * 63.0).round().clamp(0.0, 63.0) as u8;

    let hue_deg = if rf >= gf && rf >= bf {
        60.0 * (((gf - bf) / delta).rem_euclid(6.0))
    } else if gf >= bf {
        60.0 * (((bf - rf) / delta) + 2.0)
    } else {
        60.0 * (((rf - gf) / delta) + 4.0)
    };

    let h = ((hue_deg * 11.0).round() as i32).rem_euclid(i32::from(HUE_MAX) + 1) as u16;
    (h, s, v)
}

/// A minimal fixed-buffer `fmt::Write` sink used by `sprint` to avoid a heap
/// allocation for a fixed-size, small output.
struct FixedBuf<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl core::fmt::Write for FixedBuf<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let end = (self.len + bytes.len()).min(self.buf.len() - 1);
        let n = end - self.len;
        self.buf[self.len..end].copy_from_slice(&bytes[..n]);
        self.len = end;
        Ok(())
    }
}
