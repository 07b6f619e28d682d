//! Fill: paints the entire fragment with one color.

use crate::color::Color;

pub struct FillState {
    pub color: Color,
}

impl FillState {
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}
