//! Timing curves: pure functions `Fixed -> Fixed` over `t` in `[0, ONE]`.
//!
//! Any such function is an acceptable curve; `linear` is the default.
//! `ease_in_quad`/`ease_out_quad`/`ease_in_out_quad` supplement the linear
//! default with the small fixed set of eased curves retained-mode engines
//! of this class typically ship beyond identity, computed as exact Q15.16
//! squares instead of floats.

use crate::fixed::Fixed;

/// A timing curve: `t in [0, ONE]` to an eased `t` in the same range.
pub type Curve = fn(Fixed) -> Fixed;

/// Identity; the default curve.
#[must_use]
pub fn linear(t: Fixed) -> Fixed {
    t
}

/// `t^2`.
#[must_use]
pub fn ease_in_quad(t: Fixed) -> Fixed {
    t.mul(t)
}

/// `1 - (1-t)^2`.
#[must_use]
pub fn ease_out_quad(t: Fixed) -> Fixed {
    let inv = Fixed::ONE - t;
    Fixed::ONE - inv.mul(inv)
}

/// `2t^2` below the midpoint, mirrored above it.
#[must_use]
pub fn ease_in_out_quad(t: Fixed) -> Fixed {
    if t < Fixed::HALF {
        Fixed::from_int(2).mul(t).mul(t)
    } else {
        let inv = Fixed::ONE - t;
        Fixed::ONE - Fixed::from_int(2).mul(inv).mul(inv)
    }
}
