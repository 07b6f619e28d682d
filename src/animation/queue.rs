//! The bounded, non-blocking MPSC submission queue: the only cross-thread
//! boundary into the scene. Built on `flume`, which gives us a `Sender` that
//! is `Clone` and `Send` without pulling in a full async runtime just to
//! hand messages from a worker thread to the scene thread.

use crate::animation::animation::{Animation, NodeAnimationInfo, StopCode};
use crate::scene::node::NodeKey;

/// Default bounded queue depth. Large enough that a burst of a few dozen
/// simultaneous property animations on a busy frame doesn't overflow, small
/// enough that a producer that never gets drained can't grow unbounded.
pub const MAX_ANIMATION_BACKLOG: usize = 32;

/// One submission-queue entry. Modeling stop/advance as their own variants
/// alongside `Start`/`StartRemote`, rather than as sentinel `Animation`
/// records sharing one homogeneous queue, keeps each case holding exactly
/// the data it needs while still preserving a single total order between
/// new animations and control operations from every producer.
pub enum ControlMessage {
    Start(Box<Animation>),
    StartRemote {
        node: NodeKey,
        setup: Box<dyn FnOnce(&mut NodeAnimationInfo) + Send>,
    },
    Stop { node: NodeKey, code: StopCode },
    Advance { node: NodeKey, ticks: i64 },
}

/// A cheap, cloneable, `Send` handle for submitting animations, stops, and
/// advances from threads other than the scene thread. `animate()`'s
/// closure-based capture form stays scene-thread-only because its setup
/// closure takes `&mut Scene` and can attach actions that close over
/// `NodeEntry` mutators, neither of which is `Send`; the `animate` method
/// here instead carries a `Send` closure that can only touch timing fields
/// (`delay`, `duration`, `curve`, `on_complete`) through `NodeAnimationInfo`,
/// and is applied against the real node only once the scene thread drains
/// the queue.
#[derive(Clone)]
pub struct AnimationSubmitter {
    tx: flume::Sender<ControlMessage>,
}

impl AnimationSubmitter {
    pub(crate) fn new(tx: flume::Sender<ControlMessage>) -> Self {
        Self { tx }
    }

    /// Submits a new animation on `node` from any thread. `setup` runs on
    /// the scene thread against the real `NodeAnimationInfo` once the queue
    /// is drained; it can set timing and the completion callback but cannot
    /// attach property actions, since doing so would require `&mut Scene`.
    /// Non-blocking; returns `false` (and logs) on queue overflow.
    pub fn animate(
        &self,
        node: NodeKey,
        setup: impl FnOnce(&mut NodeAnimationInfo) + Send + 'static,
    ) -> bool {
        send(&self.tx, ControlMessage::StartRemote { node, setup: Box::new(setup) })
    }

    /// Requests that all active animations on `node` stop with `code`.
    /// Non-blocking; returns `false` (and logs) on queue overflow.
    pub fn stop(&self, node: NodeKey, code: StopCode) -> bool {
        send(&self.tx, ControlMessage::Stop { node, code })
    }

    /// Requests that all active animations on `node` shift their start
    /// time backward by `ticks`.
    pub fn advance(&self, node: NodeKey, ticks: i64) -> bool {
        send(&self.tx, ControlMessage::Advance { node, ticks })
    }
}

pub(crate) fn send(tx: &flume::Sender<ControlMessage>, msg: ControlMessage) -> bool {
    match tx.try_send(msg) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("animation submission queue overflow; message dropped");
            false
        }
    }
}

/// Builds the bounded channel pair backing one [`crate::scene::Scene`].
pub(crate) fn channel(depth: usize) -> (flume::Sender<ControlMessage>, flume::Receiver<ControlMessage>) {
    flume::bounded(depth.max(1))
}
