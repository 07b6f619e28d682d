#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! emberscene: a retained-mode 2D scene graph and fixed-point software
//! rasterizer for small embedded displays.
//!
//! A [`scene::Scene`] owns a tree of [`scene::NodeKey`]-addressed nodes
//! (`Group`/`Fill`/`Box`/`Label`/`Image`/`Anchor`), a capture-based
//! animation engine, and the render list its `sequence` step produces each
//! frame. `render` replays that list against caller-owned
//! [`render::FrameBuffer`] fragments, so one sequence can drive many
//! output strips without re-walking the tree.

pub mod animation;
pub mod color;
pub mod errors;
pub mod fixed;
pub mod font;
pub mod geom;
pub mod image;
pub mod render;
pub mod scene;
pub mod utils;

pub use animation::{
    color_action, point_action, size_action, Action, ActionList, Animation, AnimationHooks,
    AnimationSubmitter, Curve, DispatchArg, NodeAnimationInfo, NoopHooks, OnComplete, StopCode,
};
pub use color::{Color, HsvaComponents, RgbaComponents, COLOR_TRANSPARENT, OPACITY_MAX};
pub use errors::{EmberError, Result};
pub use fixed::Fixed;
pub use font::{DefaultAsciiFont, Font, FontMetrics, Glyph, GlyphSource};
pub use geom::{clip, Clip, Point, Size};
pub use image::ImageData;
pub use render::{FrameBuffer, HAlign, PixelBuffer, RenderRecord, VAlign};
pub use scene::{
    AnchorState, BoxState, FillState, GroupState, ImageState, LabelState, NodeEntry, NodeFlags,
    NodeKey, NodeKind, Scene, SceneConfig,
};
pub use utils::{HostClock, ManualClock, SystemClock};
