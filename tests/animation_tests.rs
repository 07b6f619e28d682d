//! Animation Engine Integration Tests
//!
//! Tests for:
//! - Capture semantics: property setters apply immediately outside a
//!   capture block, attach actions inside one
//! - Submission queue ordering and overflow reporting
//! - Per-sequence animation step: delay, progress, completion
//! - Stop (`StopCurrent`/`StopFinal`) and `advance` control messages
//! - Completion dispatch firing exactly once
//! - Multiple animations queued on the same node

use std::cell::RefCell;
use std::rc::Rc;

use emberscene::{Color, ManualClock, Point, Scene, SceneConfig, StopCode};

fn scene() -> Scene {
    Scene::new(SceneConfig::default())
}

// ============================================================================
// Capture Semantics
// ============================================================================

#[test]
fn setter_applies_immediately_outside_a_capture_block() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(0, 0, 0));
    s.append(s.root(), fill);
    s.set_fill_color(fill, Color::rgb(10, 20, 30));
    assert_eq!(s.fill_color(fill).unwrap().parse_rgb().r, 10);
}

#[test]
fn setter_attaches_an_action_inside_a_capture_block_instead_of_applying() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(0, 0, 0));
    s.append(s.root(), fill);

    s.animate(fill, |scene, node, info| {
        info.duration = 10;
        scene.set_fill_color(node, Color::rgb(255, 0, 0));
    });

    // The submitted animation hasn't been drained into the active list yet,
    // and even once active its first action only applies at the next
    // sequence — so the property must still read the pre-animation value.
    assert_eq!(s.fill_color(fill).unwrap().parse_rgb().r, 0);
}

// ============================================================================
// Per-Sequence Animation Step: Progress and Completion
// ============================================================================

#[test]
fn scenario_s6_color_animation_reaches_the_expected_midpoint_and_endpoint() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(0, 0, 0));
    s.append(s.root(), fill);

    let mut clock = ManualClock(0);
    let completed = Rc::new(RefCell::new(Vec::new()));
    let completed_cb = Rc::clone(&completed);

    s.animate(fill, move |scene, node, info| {
        info.duration = 10;
        info.on_complete = Some(Box::new(move |n, code| completed_cb.borrow_mut().push((n, code))));
        scene.set_fill_color(node, Color::rgb(0, 0, 255));
    });

    s.sequence(&mut clock); // establishes start_time, doesn't advance progress

    for _ in 0..5 {
        clock.advance(1);
        s.sequence(&mut clock);
    }
    assert_eq!(s.fill_color(fill).unwrap().parse_rgb().b, 127);

    for _ in 0..5 {
        clock.advance(1);
        s.sequence(&mut clock);
    }
    assert_eq!(s.fill_color(fill).unwrap().parse_rgb().b, 255);
    assert!(completed.borrow().is_empty(), "not complete until one more sequence");

    clock.advance(1);
    s.sequence(&mut clock);
    assert_eq!(completed.borrow().as_slice(), &[(fill, StopCode::Normal)]);
}

#[test]
fn delayed_animation_does_not_progress_before_its_delay_elapses() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(0, 0, 0));
    s.append(s.root(), fill);

    let mut clock = ManualClock(0);
    s.animate(fill, |scene, node, info| {
        info.delay = 5;
        info.duration = 10;
        scene.set_fill_color(node, Color::rgb(255, 0, 0));
    });
    s.sequence(&mut clock);

    for _ in 0..5 {
        clock.advance(1);
        s.sequence(&mut clock);
    }
    assert_eq!(
        s.fill_color(fill).unwrap().parse_rgb().r,
        0,
        "property must not move during the delay window"
    );
}

// ============================================================================
// Stop Codes
// ============================================================================

#[test]
fn scenario_s7_two_animations_on_one_node_both_complete_on_stop_final() {
    let mut s = scene();
    let b = s.create_box(emberscene::Size::new(5, 5), Color::rgb(0, 0, 0));
    s.set_position(b, Point::new(0, 0));
    s.append(s.root(), b);

    let color_done = Rc::new(RefCell::new(None));
    let pos_done = Rc::new(RefCell::new(None));
    let color_cb = Rc::clone(&color_done);
    let pos_cb = Rc::clone(&pos_done);

    let mut clock = ManualClock(0);
    s.animate(b, move |scene, node, info| {
        info.duration = 100;
        info.on_complete = Some(Box::new(move |n, code| *color_cb.borrow_mut() = Some((n, code))));
        scene.set_box_color(node, Color::rgb(255, 0, 0));
    });
    s.animate(b, move |scene, node, info| {
        info.duration = 100;
        info.on_complete = Some(Box::new(move |n, code| *pos_cb.borrow_mut() = Some((n, code))));
        scene.set_position(node, Point::new(50, 50));
    });

    s.stop(b, StopCode::StopFinal);
    s.sequence(&mut clock);

    assert_eq!(s.box_color(b).unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(s.position(b).unwrap(), Point::new(50, 50));
    assert_eq!(*color_done.borrow(), Some((b, StopCode::StopFinal)));
    assert_eq!(*pos_done.borrow(), Some((b, StopCode::StopFinal)));
}

#[test]
fn stop_current_freezes_the_property_at_its_latest_interpolated_value() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(0, 0, 0));
    s.append(s.root(), fill);

    let done = Rc::new(RefCell::new(None));
    let done_cb = Rc::clone(&done);

    let mut clock = ManualClock(0);
    s.animate(fill, move |scene, node, info| {
        info.duration = 10;
        info.on_complete = Some(Box::new(move |n, code| *done_cb.borrow_mut() = Some((n, code))));
        scene.set_fill_color(node, Color::rgb(0, 0, 255));
    });
    s.sequence(&mut clock);

    for _ in 0..5 {
        clock.advance(1);
        s.sequence(&mut clock);
    }
    let mid = s.fill_color(fill).unwrap();
    assert_eq!(mid.parse_rgb().b, 127);

    s.stop(fill, StopCode::StopCurrent);
    clock.advance(1);
    s.sequence(&mut clock);

    assert_eq!(
        s.fill_color(fill).unwrap(),
        mid,
        "StopCurrent must leave the property at its last interpolated value"
    );
    assert_eq!(*done.borrow(), Some((fill, StopCode::StopCurrent)));
}

// ============================================================================
// Advance
// ============================================================================

#[test]
fn advance_shifts_start_time_backward_for_active_animations_on_the_node() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(0, 0, 0));
    s.append(s.root(), fill);

    let mut clock = ManualClock(0);
    s.animate(fill, |scene, node, info| {
        info.duration = 10;
        scene.set_fill_color(node, Color::rgb(0, 0, 255));
    });
    s.sequence(&mut clock); // animation becomes active with start_time = 0

    // Advancing by 5 ticks should behave exactly like having already run 5
    // ticks of wall-clock time, without the clock itself moving.
    s.advance(fill, 5);
    s.sequence(&mut clock);
    assert_eq!(s.fill_color(fill).unwrap().parse_rgb().b, 127);
}

#[test]
fn stop_or_advance_submitted_before_animate_does_not_retroactively_apply() {
    // A stop/advance drained in the same sequence call that accepts a new
    // `animate` submission only targets animations that were already
    // active at that moment -- the new animation submitted afterward is
    // unaffected.
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(0, 0, 0));
    s.append(s.root(), fill);

    let mut clock = ManualClock(0);
    s.stop(fill, StopCode::StopFinal);
    s.animate(fill, |scene, node, info| {
        info.duration = 10;
        scene.set_fill_color(node, Color::rgb(0, 0, 255));
    });
    s.sequence(&mut clock);

    // The StopFinal message drains first but matches nothing (no animation
    // was active yet), so the freshly submitted animation must still be
    // running normally afterward.
    clock.advance(1);
    s.sequence(&mut clock);
    assert!(s.fill_color(fill).unwrap().parse_rgb().b > 0);
    assert!(s.fill_color(fill).unwrap().parse_rgb().b < 255);
}

// ============================================================================
// Node Removal Cancels Animations
// ============================================================================

#[test]
fn removing_a_node_completes_its_animations_normally_without_applying_actions() {
    let mut s = scene();
    let fill = s.create_fill(Color::rgb(10, 10, 10));
    s.append(s.root(), fill);

    let done = Rc::new(RefCell::new(None));
    let done_cb = Rc::clone(&done);
    let mut clock = ManualClock(0);
    s.animate(fill, move |scene, node, info| {
        info.duration = 10;
        info.on_complete = Some(Box::new(move |n, code| *done_cb.borrow_mut() = Some((n, code))));
        scene.set_fill_color(node, Color::rgb(0, 0, 255));
    });
    s.sequence(&mut clock);

    s.remove(fill);
    clock.advance(1);
    s.sequence(&mut clock);

    assert_eq!(s.kind_name(fill), None);
    assert_eq!(*done.borrow(), Some((fill, StopCode::Normal)));
}

// ============================================================================
// Queue Overflow
// ============================================================================

#[test]
fn submission_queue_overflow_drops_the_animation_without_losing_earlier_ones() {
    let mut s = Scene::new(SceneConfig {
        queue_depth: 1,
        ..SceneConfig::default()
    });
    let fill = s.create_fill(Color::rgb(0, 0, 0));
    s.append(s.root(), fill);

    let first_ok = s.animate(fill, |scene, node, info| {
        info.duration = 10;
        scene.set_fill_color(node, Color::rgb(255, 0, 0));
    });
    let second_ok = s.animate(fill, |scene, node, info| {
        info.duration = 10;
        scene.set_fill_color(node, Color::rgb(0, 255, 0));
    });

    assert!(first_ok, "the queue must accept at least its configured depth");
    assert!(!second_ok, "overflow must be reported rather than silently dropped");
}
