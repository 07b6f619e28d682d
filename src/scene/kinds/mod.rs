//! Concrete node kinds: state structs plus their sequence/render logic.

pub mod anchor;
pub mod boxnode;
pub mod fill;
pub mod group;
pub mod image;
pub mod label;

pub use anchor::AnchorState;
pub use boxnode::BoxState;
pub use fill::FillState;
pub use group::GroupState;
pub use image::ImageState;
pub use label::LabelState;
