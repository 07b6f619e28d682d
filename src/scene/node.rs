//! Node header, flags, and the closed node-kind substrate.
//!
//! A `NodeKey` plus the `SlotMap` that owns `NodeEntry` values together
//! stand in for a `(vtable*, handle)` pair: the key's generation makes a
//! stale handle a detectable `None` on lookup rather than a dangling-pointer
//! read, and `NodeKind` is a closed Rust enum rather than a function-pointer
//! vtable, so dispatch is an exhaustive match instead of an indirect call.

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::animation::Animation;
use crate::geom::Point;
use crate::scene::kinds::{AnchorState, BoxState, FillState, GroupState, ImageState, LabelState};

new_key_type! {
    /// A generational handle to a node, meaningless outside the scene that
    /// created it.
    pub struct NodeKey;
}

bitflags! {
    /// Per-node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Set once the node has been appended to a group (or wrapped by an anchor).
        const HAS_PARENT = 0b0000_0001;
        /// Scheduled for removal; unlinked and freed on the next parent sequence.
        const REMOVE = 0b0000_0010;
        /// Excluded from rendering (still sequenced/traversed).
        const HIDDEN = 0b0000_0100;
    }
}

/// A node's header plus its kind-specific state, one `SlotMap` entry per node.
pub struct NodeEntry {
    pub position: Point,
    pub flags: NodeFlags,
    /// Non-null while a `Scene::animate` capture block is open on this node;
    /// the capture-aware setters check this to decide whether to apply a
    /// value immediately or attach an `Action` to the draft animation.
    pub pending_animation: Option<Box<Animation>>,
    pub kind: NodeKind,
}

impl NodeEntry {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            position: Point::default(),
            flags: NodeFlags::empty(),
            pending_animation: None,
            kind,
        }
    }

    #[must_use]
    pub fn is_removing(&self) -> bool {
        self.flags.contains(NodeFlags::REMOVE)
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(NodeFlags::HIDDEN)
    }

    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.pending_animation.is_some()
    }
}

/// The closed set of concrete node kinds. A node's kind never changes after
/// creation, so a typed accessor either matches its expected variant or
/// returns `None` — there is no runtime kind tag to keep in sync separately.
pub enum NodeKind {
    Group(GroupState),
    Fill(FillState),
    Box(BoxState),
    Label(LabelState),
    Image(ImageState),
    Anchor(AnchorState),
}

impl NodeKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Group(_) => "Group",
            NodeKind::Fill(_) => "Fill",
            NodeKind::Box(_) => "Box",
            NodeKind::Label(_) => "Label",
            NodeKind::Image(_) => "Image",
            NodeKind::Anchor(_) => "Anchor",
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&GroupState> {
        match self {
            NodeKind::Group(g) => Some(g),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_group_mut(&mut self) -> Option<&mut GroupState> {
        match self {
            NodeKind::Group(g) => Some(g),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_anchor(&self) -> Option<&AnchorState> {
        match self {
            NodeKind::Anchor(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_anchor_mut(&mut self) -> Option<&mut AnchorState> {
        match self {
            NodeKind::Anchor(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_fill(&self) -> Option<&FillState> {
        match self {
            NodeKind::Fill(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_fill_mut(&mut self) -> Option<&mut FillState> {
        match self {
            NodeKind::Fill(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_box(&self) -> Option<&BoxState> {
        match self {
            NodeKind::Box(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_box_mut(&mut self) -> Option<&mut BoxState> {
        match self {
            NodeKind::Box(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_label(&self) -> Option<&LabelState> {
        match self {
            NodeKind::Label(l) => Some(l),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_label_mut(&mut self) -> Option<&mut LabelState> {
        match self {
            NodeKind::Label(l) => Some(l),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_image(&self) -> Option<&ImageState> {
        match self {
            NodeKind::Image(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_image_mut(&mut self) -> Option<&mut ImageState> {
        match self {
            NodeKind::Image(i) => Some(i),
            _ => None,
        }
    }
}
