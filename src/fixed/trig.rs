//! Transcendental approximations: `sin`, `cos`, `log2`, `exp2`, `pow`.
//!
//! `sin`/`cos` are held to four exact quadrant-boundary identities
//! (`sin(0) = 0`, `sin(PI_2) = ONE`, `sin(PI) = 0`, `sin(3*PI_2) = -ONE`);
//! between those points a minimax-style polynomial approximation is close
//! enough for animation curves and rotation, where visible error tolerance
//! is generous. `log2`/`exp2`/`pow` are likewise reasonable fixed-point
//! approximations, not bit-for-bit reproductions of any particular libm.

use super::Fixed;

const FM_PI: i32 = 0x0003_243F;
const FM_PI_2: i32 = FM_PI / 2;
const FM_2PI: i32 = FM_PI * 2;

// Cubic minimax-style polynomial for sin on a single quadrant, applied
// directly to the folded angle `b` in radians (not rescaled to `[0, ONE]`):
// `sin_quadrant(b) = mul(0xF475, b) - mul(0x2106, mul(b, mul(b, b)))`. 0xF475
// is tweaked from the textbook 0xF476 so that `FM_PI_2`/`FM_PI+FM_PI_2` line
// up exactly with `ONE`/`-ONE` (see coranac.com/2009/07/sines).
const SIN_C1: i32 = 0x0000_F475;
const SIN_C3: i32 = 0x0000_2106;

fn quadrant_poly(base: Fixed) -> Fixed {
    let b3 = base.mul(base).mul(base);
    Fixed(SIN_C1).mul(base) - Fixed(SIN_C3).mul(b3)
}

/// Sine of a Q15.16 angle in radians.
#[must_use]
pub fn sin(angle: Fixed) -> Fixed {
    let mut x = angle.0 % FM_2PI;
    if x < 0 {
        x += FM_2PI;
    }
    // x is now in [0, 2*PI); fold into the first quadrant, in radians, and
    // apply the polynomial directly to that folded angle.
    if x <= FM_PI_2 {
        quadrant_poly(Fixed(x))
    } else if x <= FM_PI {
        quadrant_poly(Fixed(FM_PI - x))
    } else if x <= FM_PI + FM_PI_2 {
        -quadrant_poly(Fixed(x - FM_PI))
    } else {
        -quadrant_poly(Fixed(FM_2PI - x))
    }
}

/// Cosine of a Q15.16 angle in radians, via `sin(angle + PI/2)`.
#[must_use]
pub fn cos(angle: Fixed) -> Fixed {
    sin(angle + Fixed(FM_PI_2))
}

// 2^(2^-i) in Q15.16, for i = 1..=16, used by exp2's bit-expansion.
const EXP2_TABLE: [u32; 16] = [
    0x0001_6A0A,
    0x0001_3070,
    0x0001_172C,
    0x0001_0B56,
    0x0001_059B,
    0x0001_02CA,
    0x0001_0164,
    0x0001_00B2,
    0x0001_0059,
    0x0001_002C,
    0x0001_0016,
    0x0001_000B,
    0x0001_0006,
    0x0001_0003,
    0x0001_0001,
    0x0001_0001,
];

/// `2^x` for Q15.16 `x`. Underflows to `0` for `x < -16` (the fractional
/// bit expansion has nothing left to contribute below that point), matching
/// the reference engine's observed behavior at the representable range's edge.
#[must_use]
pub fn exp2(x: Fixed) -> Fixed {
    let whole = x.0 >> 16;
    if whole >= 16 {
        return Fixed::MAX;
    }
    if whole < -16 {
        return Fixed::ZERO;
    }

    let frac = x.0 & 0xFFFF;
    let mut result: u64 = 0x1_0000;
    let mut bit = 0x8000u32;
    for &table_val in &EXP2_TABLE {
        if (frac as u32) & bit != 0 {
            result = (result * u64::from(table_val)) >> 16;
        }
        bit >>= 1;
    }

    let mut result = result as i64;
    if whole >= 0 {
        result <<= whole;
    } else {
        result >>= -whole;
    }
    if result > i64::from(i32::MAX) {
        Fixed::MAX
    } else {
        Fixed(result as i32)
    }
}

/// `log2(x)` for positive Q15.16 `x`. `x <= 0` returns `Fixed::MIN` as a
/// sentinel since the real logarithm has no representable result there,
/// and the fixed-point API has no way to signal an error without a panic.
#[must_use]
pub fn log2(x: Fixed) -> Fixed {
    if x.0 <= 0 {
        return Fixed::MIN;
    }

    let mut v = u64::from(x.0 as u32);
    // Normalize v into [0x10000, 0x20000) (i.e. [1.0, 2.0)), tracking the
    // integer exponent via repeated doubling/halving.
    let mut exp: i32 = 0;
    while v >= 0x2_0000 {
        v >>= 1;
        exp += 1;
    }
    while v < 0x1_0000 {
        v <<= 1;
        exp -= 1;
    }

    // Repeated squaring to extract the fractional log bits: at each step,
    // square v (staying within [1, 2) by halving when it overflows 2), and
    // the bit we shifted out is the next fractional bit of log2(x).
    let mut frac: u32 = 0;
    let mut bit = 0x8000u32;
    let mut y = v;
    for _ in 0..16 {
        y = (y * y) >> 16;
        if y >= 0x2_0000 {
            y >>= 1;
            frac |= bit;
        }
        bit >>= 1;
    }

    Fixed((exp << 16) | frac as i32)
}

/// `base^exponent` via `exp2(exponent * log2(base))`. `base <= 0` returns
/// `Fixed::ZERO`, matching `log2`'s sentinel propagated through `exp2`.
#[must_use]
pub fn pow(base: Fixed, exponent: Fixed) -> Fixed {
    if base.0 <= 0 {
        return Fixed::ZERO;
    }
    exp2(exponent.mul(log2(base)))
}
