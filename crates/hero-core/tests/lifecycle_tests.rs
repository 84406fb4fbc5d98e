mod common;

use common::{call_log, FakeHost, FakeSurface, RecordingRenderer};
use hero_core::lifecycle::{activate, CancelToken, FrameLoop, Lifetime, Mount, Subscription};
use hero_core::{Cursor, HeroError, HeroParams, PointerSample};

fn mount(log: &common::CallLog, host: &mut FakeHost) -> Mount<RecordingRenderer, FakeSurface> {
    activate(
        host,
        Lifetime::new(),
        HeroParams::default(),
        RecordingRenderer { log: log.clone() },
        FakeSurface::new(log),
        1280,
        720,
    )
}

fn position(events: &[String], name: &str) -> usize {
    events
        .iter()
        .position(|e| e == name)
        .unwrap_or_else(|| panic!("missing event {name}: {events:?}"))
}

#[test]
fn activation_wires_listeners_frames_and_model_request() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let m = mount(&log, &mut host);

    assert_eq!(m.active_subscriptions(), 4);
    assert!(m.lifetime().is_alive());
    assert_eq!(m.surface().cursor.get(), Some(Cursor::Grab));
    assert!(!host.frame_token.as_ref().unwrap().is_cancelled());
    assert_eq!(log.borrow().models_requested, vec!["/concrete.glb".to_string()]);
    assert_eq!(log.borrow().resizes, vec![(1280, 720)]);
}

#[test]
fn frames_render_without_a_model() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let m = mount(&log, &mut host);
    assert!(m.hero().borrow_mut().advance(0.016));
    assert!(m.hero().borrow_mut().advance(0.032));
    assert_eq!(log.borrow().renders, 2);
    let hero = m.hero().borrow();
    assert!(hero.model().is_none());
    assert_eq!(hero.frames_rendered(), 2);
}

#[test]
fn skipped_frames_are_not_counted() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let m = mount(&log, &mut host);
    let mut hero = m.hero().borrow_mut();
    assert!(hero.advance(0.016));

    log.borrow_mut().skip_frames = true;
    assert!(!hero.advance(0.032));
    assert_eq!(hero.frames_rendered(), 1);
    assert_eq!(hero.renderer().log.borrow().renders, 2);

    log.borrow_mut().skip_frames = false;
    assert!(hero.advance(0.048));
    assert_eq!(hero.frames_rendered(), 2);
}

#[test]
fn resize_updates_camera_and_renderer() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let m = mount(&log, &mut host);
    let mut hero = m.hero().borrow_mut();

    hero.resized(800, 400);
    assert_eq!(hero.camera().aspect, 2.0);
    assert_eq!(log.borrow().resizes.last(), Some(&(800, 400)));

    // a collapsed container keeps the last usable aspect
    hero.resized(800, 0);
    assert_eq!(hero.camera().aspect, 2.0);
}

#[test]
fn teardown_runs_in_order() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let mut m = mount(&log, &mut host);
    m.hero()
        .borrow_mut()
        .model_loaded(Ok(common::two_material_box()));
    m.teardown();

    let events = log.borrow().events.clone();
    let unsubscribed = position(&events, "unsubscribe:pointermove");
    let cancelled = position(&events, "cancel-frames");
    let detached = position(&events, "detach");
    let first_dispose = position(&events, "dispose-geometry");
    let released = position(&events, "release");
    assert!(unsubscribed < cancelled);
    assert!(cancelled < detached);
    assert!(detached < first_dispose);
    assert_eq!(released, events.len() - 1);

    assert!(!m.lifetime().is_alive());
    assert_eq!(m.active_subscriptions(), 0);
    assert!(host.frame_token.as_ref().unwrap().is_cancelled());
}

#[test]
fn teardown_disposes_model_and_backdrop_resources() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let mut m = mount(&log, &mut host);
    assert!(m
        .hero()
        .borrow_mut()
        .model_loaded(Ok(common::two_material_box())));
    m.teardown();

    let calls = log.borrow();
    // wall + floor + model geometry; wall + floor + both model materials
    assert_eq!(calls.geometries.len(), 3);
    assert_eq!(calls.materials.len(), 4);
    assert_eq!(calls.releases, 1);
    drop(calls);

    let hero = m.hero().borrow();
    assert!(hero.scene().is_empty());
    assert_eq!(hero.scene().geometry_count(), 0);
    assert_eq!(hero.scene().material_count(), 0);
}

#[test]
fn teardown_twice_is_a_no_op() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let mut m = mount(&log, &mut host);
    m.teardown();
    let events = log.borrow().events.len();
    m.teardown();
    drop(m);
    assert_eq!(log.borrow().events.len(), events);
    assert_eq!(log.borrow().releases, 1);
}

#[test]
fn already_detached_surface_does_not_stop_teardown() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let mut m = mount(&log, &mut host);
    m.surface().attached.set(false);
    m.teardown();
    assert_eq!(log.borrow().releases, 1);
    assert!(m.is_torn_down());
}

#[test]
fn late_callbacks_after_teardown_do_nothing() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let mut m = mount(&log, &mut host);
    m.teardown();

    let hero = host.hero.as_ref().unwrap();
    let renders = log.borrow().renders;
    let sample = PointerSample::new(100.0, 100.0, 1280.0, 720.0);
    let mut h = hero.borrow_mut();
    h.pointer_moved(&sample);
    assert_eq!(h.pointer_pressed(&sample, true), None);
    assert_eq!(h.pointer_released(), None);
    h.resized(10, 10);
    assert!(!h.advance(1.0));
    assert!(!h.frame());

    assert_eq!(h.tracker().raw(), glam::Vec2::ZERO);
    assert!(!h.tracker().is_dragging());
    assert_eq!(log.borrow().renders, renders);
    assert_eq!(log.borrow().resizes, vec![(1280, 720)]);
}

#[test]
fn model_resolving_after_teardown_is_discarded() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let mut m = mount(&log, &mut host);
    m.teardown();

    let hero = host.hero.as_ref().unwrap();
    assert!(!hero.borrow_mut().model_loaded(Ok(common::two_material_box())));
    let h = hero.borrow();
    assert!(h.model().is_none());
    assert!(h.scene().roots().is_empty());
    assert_eq!(h.scene().geometry_count(), 0);
}

#[test]
fn download_finishing_after_teardown_is_not_parsed() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let mut m = mount(&log, &mut host);

    m.teardown();
    let hero = host.hero.as_ref().unwrap();
    assert!(!hero.borrow_mut().model_fetched(Ok(common::box_glb(4))));
    let h = hero.borrow();
    assert!(h.model().is_none());
    assert_eq!(h.scene().geometry_count(), 0);
}

#[test]
fn downloaded_model_is_parsed_and_installed() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let m = mount(&log, &mut host);
    let mut hero = m.hero().borrow_mut();
    assert!(!hero.model_fetched(Ok(b"not a glb".to_vec())));
    assert!(hero.model().is_none());
    assert!(hero.model_fetched(Ok(common::box_glb(4))));
    assert!(hero.model().is_some());
}

#[test]
fn failed_load_leaves_backdrop_rendering() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let m = mount(&log, &mut host);
    let loaded = m.hero().borrow_mut().model_loaded(Err(HeroError::Fetch {
        path: "/concrete.glb".into(),
        reason: "404".into(),
    }));
    assert!(!loaded);
    let mut hero = m.hero().borrow_mut();
    assert!(hero.model().is_none());
    assert!(hero.advance(0.5));
    assert_eq!(hero.scene().roots().len(), 5);
}

#[test]
fn at_most_one_model_group_per_activation() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let m = mount(&log, &mut host);
    let mut hero = m.hero().borrow_mut();
    assert!(hero.model_loaded(Ok(common::two_material_box())));
    let group = hero.model().unwrap().group;
    assert!(!hero.model_loaded(Ok(common::two_material_box())));
    assert_eq!(hero.model().unwrap().group, group);
    // wall, floor, ambient, spot target, spot, model group
    assert_eq!(hero.scene().roots().len(), 6);
}

#[test]
fn dropping_the_mount_tears_it_down() {
    let log = call_log();
    let mut host = FakeHost::new(&log);
    let m = mount(&log, &mut host);
    let lifetime = m.lifetime().clone();
    drop(m);
    assert!(!lifetime.is_alive());
    assert_eq!(log.borrow().releases, 1);
    assert!(host.surface.as_ref().map(|s| !s.attached.get()).unwrap_or(false));
}

#[test]
fn subscription_removes_its_listener_once() {
    let removed = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = removed.clone();
    let mut sub = Subscription::new("pointermove", move || counter.set(counter.get() + 1));
    assert_eq!(sub.label(), "pointermove");
    assert!(sub.is_active());

    sub.unsubscribe();
    sub.unsubscribe();
    drop(sub);
    assert_eq!(removed.get(), 1);
}

#[test]
fn frame_loop_cancels_its_token_once() {
    let cancels = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = cancels.clone();
    let token = CancelToken::new();
    let mut frames = FrameLoop::new(token.clone(), move || counter.set(counter.get() + 1));
    assert!(frames.is_running());
    assert!(!frames.token().is_cancelled());

    frames.cancel();
    assert!(!frames.is_running());
    assert!(frames.token().is_cancelled());
    assert!(token.is_cancelled());
    drop(frames);
    assert_eq!(cancels.get(), 1);
}

#[test]
fn lifetime_ends_exactly_once() {
    let lifetime = Lifetime::new();
    let other = lifetime.clone();
    assert!(lifetime.end());
    assert!(!other.end());
    assert!(!other.is_alive());
}
