//! Actions: the per-property interpolators an animation drives each tick.
//!
//! Three universal constructors exist — one per interpolable shape (color,
//! point, size) — rather than one per concrete property, since every
//! animatable property on every node kind reduces to one of these three
//! shapes. Each constructor closes over a kind-specific setter so the
//! interpolated value lands wherever that property actually lives
//! (`NodeEntry::position` for point actions, kind-state fields for the
//! rest).

use crate::color::Color;
use crate::fixed::Fixed;
use crate::geom::{Point, Size};
use crate::scene::node::NodeEntry;

/// One interpolator attached to an [`super::Animation`]; called once per
/// active tick with the animation's already-curved `t`.
pub struct Action {
    apply: Box<dyn FnMut(&mut NodeEntry, Fixed)>,
}

impl Action {
    pub fn new(apply: impl FnMut(&mut NodeEntry, Fixed) + 'static) -> Self {
        Self {
            apply: Box::new(apply),
        }
    }

    pub fn apply(&mut self, entry: &mut NodeEntry, t: Fixed) {
        (self.apply)(entry, t);
    }
}

/// Interpolates a color property via [`Color::lerp`].
pub fn color_action(
    start: Color,
    end: Color,
    set: impl Fn(&mut NodeEntry, Color) + 'static,
) -> Action {
    Action::new(move |entry, t| set(entry, start.lerp(end, t)))
}

/// Interpolates a point property via `Fixed::scalar` on each axis.
pub fn point_action(
    start: Point,
    end: Point,
    set: impl Fn(&mut NodeEntry, Point) + 'static,
) -> Action {
    Action::new(move |entry, t| {
        let x = i32::from(start.x) + Fixed::scalar(i32::from(end.x) - i32::from(start.x), t);
        let y = i32::from(start.y) + Fixed::scalar(i32::from(end.y) - i32::from(start.y), t);
        set(entry, Point::new(x as i16, y as i16));
    })
}

/// Interpolates a size property via `Fixed::scalar` on each axis.
pub fn size_action(
    start: Size,
    end: Size,
    set: impl Fn(&mut NodeEntry, Size) + 'static,
) -> Action {
    Action::new(move |entry, t| {
        let w = i32::from(start.width) + Fixed::scalar(i32::from(end.width) - i32::from(start.width), t);
        let h =
            i32::from(start.height) + Fixed::scalar(i32::from(end.height) - i32::from(start.height), t);
        set(entry, Size::new(w.max(0) as u16, h.max(0) as u16));
    })
}
