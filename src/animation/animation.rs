//! The animation record itself, its completion hook seam, and stop codes.

use smallvec::SmallVec;

use crate::animation::action::Action;
use crate::animation::curve::{linear, Curve};
use crate::scene::node::NodeKey;

/// Most animations drive a handful of properties on one node (position plus
/// one or two colors); inlining up to 4 actions avoids a heap allocation for
/// the common case.
pub type ActionList = SmallVec<[Action; 4]>;

/// The two ways an active animation can be stopped early, plus the default
/// `Normal` completion code. Advance is not a stop code at all here — it is
/// its own [`super::queue::ControlMessage`] variant, since shifting a
/// start time backward has nothing to do with ending the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopCode {
    #[default]
    Normal = 0,
    StopCurrent = 0b10,
    StopFinal = 0b11,
}

/// Opaque token threaded from [`AnimationHooks::setup`] (called at
/// submission) through to [`AnimationHooks::dispatch`] (called at
/// completion), letting a host stash a handle to its own bookkeeping
/// (e.g. an index into a host-side animation table) without this crate
/// needing to know its shape.
pub type DispatchArg = u64;

/// The completion callback; invoked exactly once per accepted animation,
/// either directly or by routing through [`AnimationHooks::dispatch`].
pub type OnComplete = Box<dyn FnMut(NodeKey, StopCode)>;

/// Per-animation timing and completion info, filled in by the `setup`
/// closure passed to `Scene::animate` or [`super::queue::AnimationSubmitter::animate`].
pub struct NodeAnimationInfo {
    pub delay: i64,
    pub duration: i64,
    pub curve: Curve,
    pub on_complete: Option<OnComplete>,
}

impl Default for NodeAnimationInfo {
    fn default() -> Self {
        Self {
            delay: 0,
            duration: 0,
            curve: linear,
            on_complete: None,
        }
    }
}

/// A time-bounded block of [`Action`]s targeting one node.
pub struct Animation {
    pub node: NodeKey,
    pub start_time: i64,
    pub stop: StopCode,
    pub info: NodeAnimationInfo,
    pub dispatch_arg: DispatchArg,
    pub actions: ActionList,
}

impl Animation {
    pub(crate) fn new(node: NodeKey) -> Self {
        Self {
            node,
            start_time: 0,
            stop: StopCode::Normal,
            info: NodeAnimationInfo::default(),
            dispatch_arg: 0,
            actions: ActionList::new(),
        }
    }
}

/// Host integration seam for routing animation submission/completion
/// through application-specific bookkeeping. The default, [`NoopHooks`],
/// invokes `on_complete` directly on the scene thread with no indirection.
pub trait AnimationHooks {
    /// Called once, synchronously, when `Scene::animate` submits the
    /// animation; the returned token is replayed to `dispatch` at
    /// completion.
    #[allow(unused_variables)]
    fn setup(&mut self, node: NodeKey, info: &NodeAnimationInfo) -> DispatchArg {
        0
    }

    /// Called once per completed animation in place of invoking
    /// `on_complete` directly.
    fn dispatch(
        &mut self,
        arg: DispatchArg,
        node: NodeKey,
        stop: StopCode,
        on_complete: Option<OnComplete>,
    ) {
        let _ = arg;
        if let Some(mut cb) = on_complete {
            cb(node, stop);
        }
    }
}

/// The default hook set: no setup bookkeeping, direct dispatch.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl AnimationHooks for NoopHooks {}
