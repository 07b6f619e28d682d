//! Image: a decoded pixel buffer plus a tint color.

use std::rc::Rc;

use crate::color::Color;
use crate::image::ImageData;

pub struct ImageState {
    pub data: Rc<ImageData>,
    pub tint: Color,
}

impl ImageState {
    #[must_use]
    pub fn new(data: Rc<ImageData>, tint: Color) -> Self {
        Self { data, tint }
    }
}
