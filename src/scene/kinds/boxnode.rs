//! Box: a filled rectangle, recognizing the darker-sentinel colors.

use crate::color::Color;
use crate::geom::Size;

pub struct BoxState {
    pub size: Size,
    pub color: Color,
}

impl BoxState {
    #[must_use]
    pub fn new(size: Size, color: Color) -> Self {
        Self { size, color }
    }
}
