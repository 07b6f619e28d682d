//! Scene Graph Integration Tests
//!
//! Tests for:
//! - Node creation/removal and the deferred-deletion discipline
//! - Append/parent-ownership invariants
//! - Group child-list ordering and pruning
//! - Anchor ownership and `find_anchor` lookup
//! - `walk`/`dump` traversal
//! - Hidden-flag semantics (gates rendering, not traversal/pruning)

use emberscene::{Color, ManualClock, NodeKey, Point, Scene, SceneConfig, Size};

fn scene() -> Scene {
    Scene::new(SceneConfig::default())
}

fn tick(scene: &mut Scene, clock: &mut ManualClock) {
    scene.sequence(clock);
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn fresh_scene_has_only_the_root() {
    let s = scene();
    assert_eq!(s.node_count(), 1);
    assert_eq!(s.kind_name(s.root()), Some("Group"));
}

#[test]
fn created_nodes_are_not_attached_until_appended() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(255, 0, 0));
    assert_eq!(s.node_count(), 2);
    // Unattached nodes still exist and can be queried...
    assert_eq!(s.kind_name(fill), Some("Fill"));
    // ...but are absent from the tree walk, since walk starts at the root.
    let mut seen = 0;
    s.walk(s.root(), |_, _| { seen += 1; true }, |_, _| true);
    assert_eq!(seen, 1); // root only
}

#[test]
fn remove_defers_unlink_and_free_to_the_next_sequence() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(0, 255, 0));
    s.append(s.root(), fill);

    assert!(s.remove(fill));
    // Not yet freed: still queryable, still in the child list.
    assert_eq!(s.kind_name(fill), Some("Fill"));

    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);
    assert_eq!(s.kind_name(fill), None, "node must be freed after the next sequence");
}

#[test]
fn removing_the_root_is_rejected() {
    let mut s = scene();
    let root = s.root();
    assert!(!s.remove(root));
    assert_eq!(s.kind_name(root), Some("Group"));
}

#[test]
fn removing_an_unknown_or_already_freed_node_is_a_survivable_noop() {
    let mut s = scene();
    let fill = s.create_fill(Color::default());
    s.append(s.root(), fill);
    s.remove(fill);
    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);

    // fill is now freed; removing it again must not panic and must return false.
    assert!(!s.remove(fill));
}

#[test]
fn removing_a_subtree_frees_every_descendant() {
    let mut s = scene();
    let group = s.create_group();
    s.append(s.root(), group);
    let child = s.create_fill(Color::default());
    s.append(group, child);
    let anchor_child = s.create_fill(Color::default());
    let anchor = s.create_anchor(anchor_child, 1, None).unwrap();
    s.append(group, anchor);

    s.remove(group);
    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);

    assert_eq!(s.kind_name(group), None);
    assert_eq!(s.kind_name(child), None);
    assert_eq!(s.kind_name(anchor), None);
}

// ============================================================================
// Parent / Append Invariants
// ============================================================================

#[test]
fn append_rejects_a_child_that_already_has_a_parent() {
    let mut s = scene();
    let group_a = s.create_group();
    let group_b = s.create_group();
    s.append(s.root(), group_a);
    s.append(s.root(), group_b);

    let child = s.create_fill(Color::rgb(1, 2, 3));
    assert!(s.append(group_a, child));
    assert!(
        !s.append(group_b, child),
        "a node must have at most one parent"
    );
    // Neither side was modified by the rejected append.
    assert_eq!(s.kind_name(child), Some("Fill"));
}

#[test]
fn append_rejects_a_node_appended_to_itself() {
    let mut s = scene();
    let group = s.create_group();
    assert!(!s.append(group, group));
}

#[test]
fn append_rejects_appending_to_a_non_group() {
    let mut s = scene();
    let fill = s.create_fill(Color::default());
    let other = s.create_fill(Color::default());
    assert!(!s.append(fill, other));
}

#[test]
fn appending_an_unknown_node_is_a_survivable_noop() {
    let mut s = scene();
    let group = s.create_group();
    s.append(s.root(), group);
    let bogus: NodeKey = {
        // Build a handle to a node that has since been freed to get an
        // unknown-but-validly-typed key, rather than relying on any crate
        // internals to fabricate one.
        let throwaway = s.create_fill(Color::default());
        s.append(group, throwaway);
        s.remove(throwaway);
        let mut clock = ManualClock(0);
        tick(&mut s, &mut clock);
        throwaway
    };
    assert!(!s.append(group, bogus));
}

// ============================================================================
// Group Ordering & Pruning
// ============================================================================

#[test]
fn group_sequences_children_in_insertion_order() {
    // document order == insertion order == render (painter's) order: the
    // three boxes at distinct positions appear in the render list in the
    // order they were appended.
    let mut s = scene();
    let a = s.create_box(Size::new(5, 5), Color::rgb(255, 0, 0));
    let b = s.create_box(Size::new(5, 5), Color::rgb(0, 255, 0));
    s.set_position(a, Point::new(0, 0));
    s.set_position(b, Point::new(10, 0));
    s.append(s.root(), a);
    s.append(s.root(), b);

    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);
    assert_eq!(s.render_list_len(), 2);
}

#[test]
fn removing_the_first_of_two_children_leaves_only_the_second() {
    let mut s = scene();
    let a = s.create_fill(Color::rgb(255, 0, 0));
    let b = s.create_fill(Color::rgb(0, 0, 255));
    s.append(s.root(), a);
    s.append(s.root(), b);

    s.remove(a);
    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);

    assert_eq!(s.kind_name(a), None);
    assert_eq!(s.kind_name(b), Some("Fill"));
    assert_eq!(s.render_list_len(), 1);
}

#[test]
fn hidden_group_still_prunes_removed_descendants_every_sequence() {
    let mut s = scene();
    let group = s.create_group();
    s.append(s.root(), group);
    s.set_hidden(group, true);

    let child = s.create_fill(Color::default());
    s.append(group, child);
    s.remove(child);

    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);
    assert_eq!(s.kind_name(child), None, "pruning must not be gated on visibility");
}

#[test]
fn hidden_nodes_are_excluded_from_the_render_list_but_still_sequenced() {
    let mut s = scene();
    let b = s.create_box(Size::new(10, 10), Color::rgb(255, 0, 0));
    s.append(s.root(), b);
    s.set_hidden(b, true);

    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);
    assert_eq!(s.render_list_len(), 0);
}

// ============================================================================
// Anchors
// ============================================================================

#[test]
fn find_anchor_returns_the_first_preorder_match() {
    let mut s = scene();
    let inner = s.create_fill(Color::default());
    let anchor = s.create_anchor(inner, 42, None).unwrap();
    s.append(s.root(), anchor);

    assert_eq!(s.find_anchor(42), Some(anchor));
    assert_eq!(s.find_anchor(7), None);
}

#[test]
fn create_anchor_rejects_an_already_parented_child() {
    let mut s = scene();
    let group = s.create_group();
    s.append(s.root(), group);
    let child = s.create_fill(Color::default());
    s.append(group, child);

    assert!(s.create_anchor(child, 1, None).is_none());
}

#[test]
fn anchor_owns_its_childs_lifetime() {
    let mut s = scene();
    let child = s.create_fill(Color::default());
    let anchor = s.create_anchor(child, 1, None).unwrap();
    s.append(s.root(), anchor);

    s.remove(anchor);
    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);
    assert_eq!(s.kind_name(anchor), None);
    assert_eq!(s.kind_name(child), None);
}

// ============================================================================
// Walk / Dump
// ============================================================================

#[test]
fn empty_scene_dumps_a_single_root_line() {
    let s = scene();
    assert_eq!(s.dump(), "<Group pos=0x0>\n");
}

#[test]
fn walk_enter_can_abort_the_traversal_early() {
    let mut s = scene();
    let a = s.create_fill(Color::default());
    let b = s.create_fill(Color::default());
    s.append(s.root(), a);
    s.append(s.root(), b);

    let mut visited = Vec::new();
    s.walk(
        s.root(),
        |_, key| {
            visited.push(key);
            // Abort right after the root so neither child is visited.
            visited.len() < 1
        },
        |_, _| true,
    );
    assert_eq!(visited, vec![s.root()]);
}

#[test]
fn walk_recurses_into_anchors_and_groups() {
    let mut s = scene();
    let group = s.create_group();
    s.append(s.root(), group);
    let child = s.create_fill(Color::default());
    let anchor = s.create_anchor(child, 9, None).unwrap();
    s.append(group, anchor);

    let mut count = 0;
    s.walk(s.root(), |_, _| { count += 1; true }, |_, _| true);
    assert_eq!(count, 4); // root, group, anchor, child
}

// ============================================================================
// Position Composition
// ============================================================================

#[test]
fn child_world_position_composes_through_nested_groups() {
    let mut s = scene();
    let group = s.create_group();
    s.set_position(group, Point::new(10, 10));
    s.append(s.root(), group);

    let b = s.create_box(Size::new(5, 5), Color::rgb(0, 0, 255));
    s.set_position(b, Point::new(5, 5));
    s.append(group, b);

    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);
    // (10,10) + (5,5) = (15,15); a 5x5 box there is on-canvas and visible.
    assert_eq!(s.render_list_len(), 1);
}

#[test]
fn off_canvas_box_is_culled_from_the_render_list() {
    let mut s = scene();
    let b = s.create_box(Size::new(10, 10), Color::rgb(255, 0, 0));
    s.set_position(b, Point::new(1000, 1000));
    s.append(s.root(), b);

    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);
    assert_eq!(s.render_list_len(), 0);
}

#[test]
fn render_list_is_rebuilt_from_scratch_every_sequence() {
    let mut s = scene();
    let b = s.create_box(Size::new(10, 10), Color::rgb(255, 0, 0));
    s.append(s.root(), b);

    let mut clock = ManualClock(0);
    tick(&mut s, &mut clock);
    assert_eq!(s.render_list_len(), 1);

    s.remove(b);
    tick(&mut s, &mut clock);
    assert_eq!(s.render_list_len(), 0, "render list must not outlive the next sequence");
}
