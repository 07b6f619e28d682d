//! The animation engine: capture-based property interpolation with a
//! bounded, non-blocking submission queue as the sole cross-thread entry
//! point.
//!
//! - [`animation::Animation`] / [`animation::NodeAnimationInfo`] — the
//!   time-bounded block of actions and its delay/duration/curve/completion
//!   info.
//! - [`action::Action`] — one interpolator, built by `color_action`/
//!   `point_action`/`size_action`.
//! - [`queue`] — the bounded MPSC submission queue and its cross-thread
//!   handle.
//! - [`curve`] — timing curve functions (`linear` is the default).

pub mod action;
#[allow(clippy::module_inception)]
pub mod animation;
pub mod curve;
pub mod queue;

pub use action::{color_action, point_action, size_action, Action};
pub use animation::{
    ActionList, Animation, AnimationHooks, DispatchArg, NodeAnimationInfo, NoopHooks, OnComplete, StopCode,
};
pub use curve::Curve;
pub use queue::{AnimationSubmitter, ControlMessage, MAX_ANIMATION_BACKLOG};
