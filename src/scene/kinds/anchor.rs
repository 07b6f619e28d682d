//! Anchor: wraps exactly one child plus a tag and an opaque payload.

use std::any::Any;

use crate::scene::NodeKey;

pub struct AnchorState {
    pub child: NodeKey,
    pub tag: u32,
    pub payload: Option<Box<dyn Any>>,
}

impl AnchorState {
    #[must_use]
    pub fn new(child: NodeKey, tag: u32, payload: Option<Box<dyn Any>>) -> Self {
        Self { child, tag, payload }
    }
}
