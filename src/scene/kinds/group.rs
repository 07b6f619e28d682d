//! Group: an ordered child list.

use crate::scene::NodeKey;

/// Children in insertion order. A `Vec` gives the same document-order
/// traversal and O(n) removal-scan the reference engine's intrusive
/// singly-linked child list does, without hand-rolled intrusive links.
#[derive(Default)]
pub struct GroupState {
    pub children: Vec<NodeKey>,
}

impl GroupState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
