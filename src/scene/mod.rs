//! The node substrate and the scene that owns it.

pub mod kinds;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;

pub use kinds::{AnchorState, BoxState, FillState, GroupState, ImageState, LabelState};
pub use node::{NodeEntry, NodeFlags, NodeKey, NodeKind};
pub use scene::{Scene, SceneConfig};
