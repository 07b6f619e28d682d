//! The scene: node storage, tree mutation, the animation step, and the
//! sequencer/render-list pipeline.

use std::any::Any;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::animation::action::{color_action, point_action, size_action};
use crate::animation::animation::{Animation, AnimationHooks, NodeAnimationInfo, NoopHooks, StopCode};
use crate::animation::queue::{self, AnimationSubmitter, ControlMessage, MAX_ANIMATION_BACKLOG};
use crate::color::Color;
use crate::fixed::Fixed;
use crate::font::{DefaultAsciiFont, Font, GlyphSource};
use crate::geom::{clip, Point, Size};
use crate::image::ImageData;
use crate::render::{FrameBuffer, HAlign, RenderRecord, VAlign};
use crate::scene::kinds::{AnchorState, BoxState, FillState, GroupState, ImageState, LabelState};
use crate::scene::node::{NodeEntry, NodeFlags, NodeKey, NodeKind};
use crate::utils::HostClock;

/// The reference output surface, used only to cull boxes/images whose
/// rectangle is fully outside the overall canvas at sequence time so the
/// render list doesn't carry entries no fragment could ever draw. Per-
/// fragment clipping happens separately at render time regardless of this
/// value (see `render.rs`).
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(240, 240);

/// Host configuration for a [`Scene`]: the submission queue depth, the
/// logical canvas size used for off-screen culling, and the two host
/// integration seams (animation hooks, glyph lookup).
pub struct SceneConfig {
    pub queue_depth: usize,
    pub canvas_size: Size,
    pub hooks: Box<dyn AnimationHooks>,
    pub glyphs: Box<dyn GlyphSource>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            queue_depth: MAX_ANIMATION_BACKLOG,
            canvas_size: DEFAULT_CANVAS_SIZE,
            hooks: Box::new(NoopHooks),
            glyphs: Box::new(DefaultAsciiFont),
        }
    }
}

/// The scene graph, its animation engine, and the render list it produces
/// each sequence.
pub struct Scene {
    nodes: SlotMap<NodeKey, NodeEntry>,
    root: NodeKey,
    tick: i64,
    canvas_size: Size,
    animations: Vec<Animation>,
    render_list: Vec<RenderRecord>,
    queue_tx: flume::Sender<ControlMessage>,
    queue_rx: flume::Receiver<ControlMessage>,
    hooks: Box<dyn AnimationHooks>,
    glyphs: Box<dyn GlyphSource>,
}

impl Scene {
    /// Builds a scene with an empty root [`GroupState`]. Infallible: every
    /// allocation here (`SlotMap::with_key`, the bounded channel) always
    /// succeeds, and there is no partial-allocation state to unwind on
    /// failure.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeEntry::new(NodeKind::Group(GroupState::new())));
        let (queue_tx, queue_rx) = queue::channel(config.queue_depth);
        Self {
            nodes,
            root,
            tick: 0,
            canvas_size: config.canvas_size,
            animations: Vec::new(),
            render_list: Vec::new(),
            queue_tx,
            queue_rx,
            hooks: config.hooks,
            glyphs: config.glyphs,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    #[must_use]
    pub fn tick(&self) -> i64 {
        self.tick
    }

    /// A cheap, cloneable, `Send` handle for submitting animations, stops,
    /// and advances from threads other than the scene thread.
    #[must_use]
    pub fn submitter(&self) -> AnimationSubmitter {
        AnimationSubmitter::new(self.queue_tx.clone())
    }

    fn submit(&self, msg: ControlMessage) -> bool {
        queue::send(&self.queue_tx, msg)
    }

    // ---- node substrate --------------------------------------------------

    #[must_use]
    pub fn kind_name(&self, node: NodeKey) -> Option<&'static str> {
        self.nodes.get(node).map(|e| e.kind.name())
    }

    #[must_use]
    pub fn is_hidden(&self, node: NodeKey) -> bool {
        self.nodes.get(node).is_some_and(NodeEntry::is_hidden)
    }

    pub fn set_hidden(&mut self, node: NodeKey, hidden: bool) -> bool {
        let Some(entry) = self.nodes.get_mut(node) else {
            log::warn!("set_hidden: unknown node {node:?}");
            return false;
        };
        entry.flags.set(NodeFlags::HIDDEN, hidden);
        true
    }

    #[must_use]
    pub fn position(&self, node: NodeKey) -> Option<Point> {
        self.nodes.get(node).map(|e| e.position)
    }

    /// Capture-aware: applies immediately unless an `animate` block is open
    /// on `node`, in which case a point action is attached instead.
    pub fn set_position(&mut self, node: NodeKey, pos: Point) -> bool {
        let Some(entry) = self.nodes.get_mut(node) else {
            log::warn!("set_position: unknown node {node:?}");
            return false;
        };
        let start = entry.position;
        if let Some(anim) = entry.pending_animation.as_mut() {
            anim.actions.push(point_action(start, pos, |e, p| e.position = p));
        } else {
            entry.position = pos;
        }
        true
    }

    /// Marks `node` for removal. It is not unlinked or freed immediately;
    /// its parent group frees it during its next `sequence` pass, which
    /// keeps removal safe to call from within a traversal callback.
    /// Removing the root is rejected.
    pub fn remove(&mut self, node: NodeKey) -> bool {
        if node == self.root {
            log::error!("remove: refusing to remove the scene root");
            return false;
        }
        let Some(entry) = self.nodes.get_mut(node) else {
            log::warn!("remove: unknown or already-freed node {node:?}");
            return false;
        };
        entry.flags.insert(NodeFlags::REMOVE);
        true
    }

    /// Appends `child` to `group`'s child list. Rejected without modifying
    /// either side if `group` is not a `Group`, if `child` already has a
    /// parent, or if `child == group`: every node has at most one parent,
    /// so reparenting must go through an explicit remove first.
    pub fn append(&mut self, group: NodeKey, child: NodeKey) -> bool {
        if group == child {
            log::warn!("append: cannot append a node to itself");
            return false;
        }
        let child_has_parent = match self.nodes.get(child) {
            Some(e) => e.flags.contains(NodeFlags::HAS_PARENT),
            None => {
                log::warn!("append: unknown child {child:?}");
                return false;
            }
        };
        if child_has_parent {
            log::warn!("append: child {child:?} already has a parent");
            return false;
        }
        let Some(entry) = self.nodes.get_mut(group) else {
            log::warn!("append: unknown group {group:?}");
            return false;
        };
        let Some(g) = entry.kind.as_group_mut() else {
            log::warn!("append: {group:?} is not a Group");
            return false;
        };
        g.children.push(child);
        self.nodes[child].flags.insert(NodeFlags::HAS_PARENT);
        true
    }

    /// Pre/post-order depth-first walk. Either callback may return `false`
    /// to abort; `false` propagates up through the recursion.
    pub fn walk(
        &self,
        root: NodeKey,
        mut enter: impl FnMut(&Scene, NodeKey) -> bool,
        mut exit: impl FnMut(&Scene, NodeKey) -> bool,
    ) -> bool {
        self.walk_inner(root, &mut enter, &mut exit)
    }

    fn walk_inner(
        &self,
        key: NodeKey,
        enter: &mut dyn FnMut(&Scene, NodeKey) -> bool,
        exit: &mut dyn FnMut(&Scene, NodeKey) -> bool,
    ) -> bool {
        let Some(entry) = self.nodes.get(key) else {
            return true;
        };
        if !enter(self, key) {
            return false;
        }
        let continued = match &entry.kind {
            NodeKind::Group(g) => {
                let mut ok = true;
                for &child in &g.children {
                    if !self.walk_inner(child, enter, exit) {
                        ok = false;
                        break;
                    }
                }
                ok
            }
            NodeKind::Anchor(a) => self.walk_inner(a.child, enter, exit),
            _ => true,
        };
        if !continued {
            return false;
        }
        exit(self, key)
    }

    /// First anchor with matching `tag` in pre-order, starting from the
    /// root.
    #[must_use]
    pub fn find_anchor(&self, tag: u32) -> Option<NodeKey> {
        let mut found = None;
        self.walk(
            self.root,
            |scene, key| {
                if let Some(a) = scene.nodes.get(key).and_then(|e| e.kind.as_anchor()) {
                    if a.tag == tag {
                        found = Some(key);
                        return false;
                    }
                }
                true
            },
            |_, _| true,
        );
        found
    }

    /// Pre-order text dump, one `<Kind pos=XxY>` line per node, indented by
    /// depth. An empty scene dumps a single root line.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_inner(self.root, 0, &mut out);
        out
    }

    fn dump_inner(&self, key: NodeKey, depth: usize, out: &mut String) {
        let Some(entry) = self.nodes.get(key) else {
            return;
        };
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&format!(
            "<{} pos={}x{}>\n",
            entry.kind.name(),
            entry.position.x,
            entry.position.y
        ));
        match &entry.kind {
            NodeKind::Group(g) => {
                for &child in &g.children {
                    self.dump_inner(child, depth + 1, out);
                }
            }
            NodeKind::Anchor(a) => self.dump_inner(a.child, depth + 1, out),
            _ => {}
        }
    }

    // ---- node factories ---------------------------------------------------

    pub fn create_group(&mut self) -> NodeKey {
        self.nodes.insert(NodeEntry::new(NodeKind::Group(GroupState::new())))
    }

    pub fn create_fill(&mut self, color: Color) -> NodeKey {
        self.nodes.insert(NodeEntry::new(NodeKind::Fill(FillState::new(color))))
    }

    pub fn create_box(&mut self, size: Size, color: Color) -> NodeKey {
        self.nodes
            .insert(NodeEntry::new(NodeKind::Box(BoxState::new(size, color))))
    }

    pub fn create_label(&mut self, font: Font, text_color: Color, outline_color: Color) -> NodeKey {
        self.nodes.insert(NodeEntry::new(NodeKind::Label(LabelState::new(
            font,
            text_color,
            outline_color,
        ))))
    }

    pub fn create_image(&mut self, data: Rc<ImageData>, tint: Color) -> NodeKey {
        self.nodes
            .insert(NodeEntry::new(NodeKind::Image(ImageState::new(data, tint))))
    }

    /// Wraps `child` in a new anchor, which takes ownership of its
    /// lifetime. Rejected (returning `None`, child untouched) if `child`
    /// already has a parent.
    pub fn create_anchor(
        &mut self,
        child: NodeKey,
        tag: u32,
        payload: Option<Box<dyn Any>>,
    ) -> Option<NodeKey> {
        let has_parent = match self.nodes.get(child) {
            Some(e) => e.flags.contains(NodeFlags::HAS_PARENT),
            None => {
                log::warn!("create_anchor: unknown child {child:?}");
                return None;
            }
        };
        if has_parent {
            log::warn!("create_anchor: child {child:?} already has a parent");
            return None;
        }
        let anchor = self
            .nodes
            .insert(NodeEntry::new(NodeKind::Anchor(AnchorState::new(child, tag, payload))));
        self.nodes[child].flags.insert(NodeFlags::HAS_PARENT);
        Some(anchor)
    }

    // ---- typed getters/setters ---------------------------------------------

    #[must_use]
    pub fn fill_color(&self, node: NodeKey) -> Option<Color> {
        self.nodes.get(node)?.kind.as_fill().map(|f| f.color)
    }

    pub fn set_fill_color(&mut self, node: NodeKey, color: Color) -> bool {
        self.set_captured_color(node, color, |k| k.as_fill().map(|f| f.color), |k, c| {
            if let Some(f) = k.as_fill_mut() {
                f.color = c;
            }
        })
    }

    #[must_use]
    pub fn box_color(&self, node: NodeKey) -> Option<Color> {
        self.nodes.get(node)?.kind.as_box().map(|b| b.color)
    }

    pub fn set_box_color(&mut self, node: NodeKey, color: Color) -> bool {
        self.set_captured_color(node, color, |k| k.as_box().map(|b| b.color), |k, c| {
            if let Some(b) = k.as_box_mut() {
                b.color = c;
            }
        })
    }

    /// Box opacity is folded into the color's opacity field rather than
    /// stored separately, so it rides the same capture/animation path as
    /// any other color setter.
    pub fn set_box_opacity(&mut self, node: NodeKey, opacity: u8) -> bool {
        let Some(current) = self.box_color(node) else {
            log::warn!("set_box_opacity: {node:?} is not a Box");
            return false;
        };
        self.set_box_color(node, current.with_opacity(opacity))
    }

    #[must_use]
    pub fn box_size(&self, node: NodeKey) -> Option<Size> {
        self.nodes.get(node)?.kind.as_box().map(|b| b.size)
    }

    pub fn set_box_size(&mut self, node: NodeKey, size: Size) -> bool {
        let Some(entry) = self.nodes.get_mut(node) else {
            log::warn!("set_box_size: unknown node {node:?}");
            return false;
        };
        let Some(start) = entry.kind.as_box().map(|b| b.size) else {
            log::warn!("set_box_size: {node:?} is not a Box");
            return false;
        };
        if let Some(anim) = entry.pending_animation.as_mut() {
            anim.actions.push(size_action(start, size, |e, s| {
                if let Some(b) = e.kind.as_box_mut() {
                    b.size = s;
                }
            }));
        } else if let Some(b) = entry.kind.as_box_mut() {
            b.size = size;
        }
        true
    }

    #[must_use]
    pub fn label_text_color(&self, node: NodeKey) -> Option<Color> {
        self.nodes.get(node)?.kind.as_label().map(|l| l.text_color)
    }

    pub fn set_label_text_color(&mut self, node: NodeKey, color: Color) -> bool {
        self.set_captured_color(
            node,
            color,
            |k| k.as_label().map(|l| l.text_color),
            |k, c| {
                if let Some(l) = k.as_label_mut() {
                    l.text_color = c;
                }
            },
        )
    }

    #[must_use]
    pub fn label_outline_color(&self, node: NodeKey) -> Option<Color> {
        self.nodes.get(node)?.kind.as_label().map(|l| l.outline_color)
    }

    pub fn set_label_outline_color(&mut self, node: NodeKey, color: Color) -> bool {
        self.set_captured_color(
            node,
            color,
            |k| k.as_label().map(|l| l.outline_color),
            |k, c| {
                if let Some(l) = k.as_label_mut() {
                    l.outline_color = c;
                }
            },
        )
    }

    /// Label opacity is folded into the text color's opacity field rather
    /// than stored separately.
    pub fn set_label_opacity(&mut self, node: NodeKey, opacity: u8) -> bool {
        let Some(current) = self.label_text_color(node) else {
            log::warn!("set_label_opacity: {node:?} is not a Label");
            return false;
        };
        self.set_label_text_color(node, current.with_opacity(opacity))
    }

    #[must_use]
    pub fn label_halign(&self, node: NodeKey) -> Option<HAlign> {
        self.nodes.get(node)?.kind.as_label().map(|l| l.halign)
    }

    pub fn set_label_halign(&mut self, node: NodeKey, halign: HAlign) -> bool {
        self.with_label_mut(node, |l| l.halign = halign)
    }

    pub fn set_label_valign(&mut self, node: NodeKey, valign: VAlign) -> bool {
        self.with_label_mut(node, |l| l.valign = valign)
    }

    #[must_use]
    pub fn label_text(&self, node: NodeKey) -> Option<&[u8]> {
        self.nodes.get(node)?.kind.as_label().map(LabelState::text)
    }

    pub fn set_label_text(&mut self, node: NodeKey, text: &str) -> bool {
        self.with_label_mut(node, |l| l.set_text(text))
    }

    pub fn append_label_text(&mut self, node: NodeKey, text: &str) -> bool {
        self.with_label_mut(node, |l| l.append_text(text))
    }

    pub fn insert_label_text(&mut self, node: NodeKey, at: usize, text: &str) -> bool {
        self.with_label_mut(node, |l| l.insert_text(at, text))
    }

    pub fn snip_label_text(&mut self, node: NodeKey, range: std::ops::Range<usize>) -> bool {
        self.with_label_mut(node, |l| l.snip_text(range))
    }

    fn with_label_mut(&mut self, node: NodeKey, f: impl FnOnce(&mut LabelState)) -> bool {
        let Some(entry) = self.nodes.get_mut(node) else {
            log::warn!("label mutator: unknown node {node:?}");
            return false;
        };
        let Some(l) = entry.kind.as_label_mut() else {
            log::warn!("label mutator: {node:?} is not a Label");
            return false;
        };
        f(l);
        true
    }

    #[must_use]
    pub fn image_tint(&self, node: NodeKey) -> Option<Color> {
        self.nodes.get(node)?.kind.as_image().map(|i| i.tint)
    }

    pub fn set_image_tint(&mut self, node: NodeKey, tint: Color) -> bool {
        self.set_captured_color(node, tint, |k| k.as_image().map(|i| i.tint), |k, c| {
            if let Some(i) = k.as_image_mut() {
                i.tint = c;
            }
        })
    }

    /// Shared capture-aware color setter: reads the current value via
    /// `get`, then applies directly or attaches a `color_action` depending
    /// on whether `node` is currently capturing. `set` must write through
    /// whichever `NodeKind` variant `get` reads from.
    fn set_captured_color(
        &mut self,
        node: NodeKey,
        end: Color,
        get: impl Fn(&NodeKind) -> Option<Color>,
        set: impl Fn(&mut NodeKind, Color) + Copy + 'static,
    ) -> bool {
        let Some(entry) = self.nodes.get_mut(node) else {
            log::warn!("color setter: unknown node {node:?}");
            return false;
        };
        let Some(start) = get(&entry.kind) else {
            log::warn!("color setter: {node:?} has no matching color property");
            return false;
        };
        if let Some(anim) = entry.pending_animation.as_mut() {
            anim.actions.push(color_action(start, end, move |e, c| set(&mut e.kind, c)));
        } else {
            set(&mut entry.kind, end);
        }
        true
    }

    // ---- animation submission ---------------------------------------------

    /// Opens a capture block on `node`, runs `setup` (during which property
    /// setters called through `self` attach actions instead of applying
    /// immediately), then submits the finished animation. Returns `false`
    /// (animation dropped) if `node` is unknown, already capturing, or the
    /// submission queue is full.
    ///
    /// Scene-thread-only: `setup` takes `&mut Scene` and its attached
    /// actions close over `NodeEntry` mutators, neither of which is `Send`.
    /// A caller on another thread should go through
    /// [`AnimationSubmitter::animate`] instead.
    pub fn animate(
        &mut self,
        node: NodeKey,
        setup: impl FnOnce(&mut Scene, NodeKey, &mut NodeAnimationInfo),
    ) -> bool {
        let Some(entry) = self.nodes.get_mut(node) else {
            log::warn!("animate: unknown node {node:?}");
            return false;
        };
        if entry.pending_animation.is_some() {
            log::warn!("animate: node {node:?} is already capturing");
            return false;
        }
        entry.pending_animation = Some(Box::new(Animation::new(node)));

        let mut info = NodeAnimationInfo::default();
        setup(self, node, &mut info);

        let Some(entry) = self.nodes.get_mut(node) else {
            return false;
        };
        let Some(mut animation) = entry.pending_animation.take() else {
            return false;
        };
        let dispatch_arg = self.hooks.setup(node, &info);
        animation.info = info;
        animation.dispatch_arg = dispatch_arg;
        self.submit(ControlMessage::Start(animation))
    }

    /// Requests that all active animations on `node` stop with `code`.
    pub fn stop(&self, node: NodeKey, code: StopCode) -> bool {
        self.submit(ControlMessage::Stop { node, code })
    }

    /// Requests that all active animations on `node` shift `start_time`
    /// backward by `ticks`.
    pub fn advance(&self, node: NodeKey, ticks: i64) -> bool {
        self.submit(ControlMessage::Advance { node, ticks })
    }

    // ---- sequencer ----------------------------------------------------------

    /// Advances the scene by one frame: refreshes the clock, runs the
    /// animation step, then rebuilds the render list from scratch.
    ///
    /// The clock is refreshed *before* the animation step here, not after:
    /// refreshing after would make every animation's progress trail the
    /// clock by one `sequence` call, so a 10-tick animation primed at t=0
    /// would reach its exact midpoint one tick later than callers expect.
    /// Recorded in DESIGN.md.
    pub fn sequence(&mut self, clock: &mut dyn HostClock) {
        self.tick = clock.now();
        self.run_animation_step();
        self.render_list.clear();
        self.sequence_node(self.root, Point::new(0, 0), false);
    }

    fn run_animation_step(&mut self) {
        let now = self.tick;

        while let Ok(msg) = self.queue_rx.try_recv() {
            match msg {
                ControlMessage::Start(mut animation) => {
                    animation.start_time = now;
                    self.animations.push(*animation);
                }
                ControlMessage::StartRemote { node, setup } => {
                    if self.nodes.get(node).is_none_or(NodeEntry::is_removing) {
                        log::warn!("animate: unknown node {node:?}");
                        continue;
                    }
                    let mut animation = Animation::new(node);
                    setup(&mut animation.info);
                    animation.start_time = now;
                    animation.dispatch_arg = self.hooks.setup(node, &animation.info);
                    self.animations.push(animation);
                }
                ControlMessage::Stop { node, code } => {
                    for anim in &mut self.animations {
                        if anim.node == node {
                            anim.stop = code;
                        }
                    }
                }
                ControlMessage::Advance { node, ticks } => {
                    for anim in &mut self.animations {
                        if anim.node == node {
                            anim.start_time -= ticks;
                        }
                    }
                }
            }
        }

        let mut completed = Vec::new();
        let mut still_active = Vec::with_capacity(self.animations.len());

        for mut anim in std::mem::take(&mut self.animations) {
            let node_gone = self.nodes.get(anim.node).is_none_or(NodeEntry::is_removing);
            if node_gone {
                anim.stop = StopCode::Normal;
                completed.push(anim);
                continue;
            }

            let delay_end = anim.start_time + anim.info.delay;
            if now < delay_end && anim.stop == StopCode::Normal {
                still_active.push(anim);
                continue;
            }

            if anim.stop == StopCode::StopCurrent {
                completed.push(anim);
                continue;
            }

            let n = now - anim.info.delay;
            let end_time = anim.start_time + anim.info.duration;
            let force_final = anim.stop == StopCode::StopFinal;

            let t = if force_final || anim.info.duration <= 0 {
                Fixed::ONE
            } else {
                let remaining = (end_time - n) as i32;
                (Fixed::ONE - Fixed::ratio(remaining, anim.info.duration as i32))
                    .clamp(Fixed::ZERO, Fixed::ONE)
            };
            let curved = (anim.info.curve)(t);

            if let Some(entry) = self.nodes.get_mut(anim.node) {
                for action in &mut anim.actions {
                    action.apply(entry, curved);
                }
            }

            // Strict `>` rather than `>=`: the property reaches its end
            // value on the sequence where `n == end_time`, but completion
            // (and on_complete) fires one sequence later, so a freshly
            // completed animation's final value is still observable before
            // its callback runs. Recorded in DESIGN.md.
            if force_final || n > end_time {
                completed.push(anim);
            } else {
                still_active.push(anim);
            }
        }

        self.animations = still_active;

        for mut anim in completed {
            let on_complete = anim.info.on_complete.take();
            self.hooks.dispatch(anim.dispatch_arg, anim.node, anim.stop, on_complete);
        }
    }

    fn sequence_node(&mut self, key: NodeKey, world: Point, ancestor_hidden: bool) {
        enum Branch {
            Group(Vec<NodeKey>),
            Anchor(NodeKey),
            Leaf,
        }

        let own_hidden;
        let local_pos;
        let branch;
        {
            let Some(entry) = self.nodes.get(key) else {
                return;
            };
            own_hidden = entry.is_hidden();
            local_pos = entry.position;
            branch = match &entry.kind {
                NodeKind::Group(g) => Branch::Group(g.children.clone()),
                NodeKind::Anchor(a) => Branch::Anchor(a.child),
                _ => Branch::Leaf,
            };
        }
        let world = world.translate(local_pos);
        let hidden = ancestor_hidden || own_hidden;

        match branch {
            Branch::Group(children) => self.prune_and_sequence_children(key, children, world, hidden),
            Branch::Anchor(child) => self.sequence_node(child, world, hidden),
            Branch::Leaf => {
                if !hidden {
                    self.emit_leaf_render(key, world);
                }
            }
        }
    }

    /// Scans `group`'s child list once, unlinking and freeing any child
    /// flagged `Remove`, then sequences the survivors. Pruning runs
    /// regardless of `hidden`: hidden only gates leaf render emission,
    /// never tree traversal.
    fn prune_and_sequence_children(
        &mut self,
        group: NodeKey,
        children: Vec<NodeKey>,
        world: Point,
        hidden: bool,
    ) {
        let mut survivors = Vec::with_capacity(children.len());
        for child in children {
            let remove = self.nodes.get(child).is_none_or(NodeEntry::is_removing);
            if remove {
                self.free_subtree(child);
            } else {
                survivors.push(child);
            }
        }
        if let Some(g) = self.nodes.get_mut(group).and_then(|e| e.kind.as_group_mut()) {
            g.children.clone_from(&survivors);
        }
        for child in survivors {
            self.sequence_node(child, world, hidden);
        }
    }

    /// Recursively frees `key` and everything it owns. Rust's `Drop`
    /// releases each node's heap state (a label's text buffer, an image's
    /// `Rc<ImageData>`) automatically — there is no explicit teardown
    /// callback to write or forget to call.
    fn free_subtree(&mut self, key: NodeKey) {
        let children: Vec<NodeKey> = match self.nodes.get(key) {
            Some(entry) => match &entry.kind {
                NodeKind::Group(g) => g.children.clone(),
                NodeKind::Anchor(a) => vec![a.child],
                _ => Vec::new(),
            },
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
        self.nodes.remove(key);
    }

    fn emit_leaf_render(&mut self, key: NodeKey, world: Point) {
        let Some(entry) = self.nodes.get(key) else {
            return;
        };
        match &entry.kind {
            NodeKind::Fill(f) => self.render_list.push(RenderRecord::Fill { color: f.color }),
            NodeKind::Box(b) => {
                let visible = !b.color.is_transparent()
                    && clip(world, b.size, Point::new(0, 0), self.canvas_size).width != 0;
                if visible {
                    self.render_list.push(RenderRecord::Box {
                        origin: world,
                        size: b.size,
                        color: b.color,
                    });
                }
            }
            NodeKind::Label(l) => {
                let metrics = self.glyphs.metrics(l.font);
                self.render_list.push(RenderRecord::Label {
                    origin: world,
                    font: l.font,
                    metrics,
                    text: Rc::from(l.text()),
                    text_color: l.text_color,
                    outline_color: l.outline_color,
                    halign: l.halign,
                    valign: l.valign,
                });
            }
            NodeKind::Image(img) => {
                let size = Size::new(img.data.width, img.data.height);
                let visible = !img.tint.is_transparent()
                    && clip(world, size, Point::new(0, 0), self.canvas_size).width != 0;
                if visible {
                    self.render_list.push(RenderRecord::Image {
                        origin: world,
                        tint: img.tint,
                        data: Rc::clone(&img.data),
                    });
                }
            }
            NodeKind::Group(_) | NodeKind::Anchor(_) => {}
        }
    }

    /// Replays the current render list against one fragment. Re-entrant
    /// across fragments; all clipping is against `(origin, size)`.
    pub fn render(&self, fb: &mut dyn FrameBuffer, origin: Point, size: Size) {
        for record in &self.render_list {
            record.render(fb, origin, size, self.glyphs.as_ref());
        }
    }

    #[must_use]
    pub fn render_list_len(&self) -> usize {
        self.render_list.len()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
