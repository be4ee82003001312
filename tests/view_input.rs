use egui::{Pos2, Rect, Vec2};
use mindful_canvas::input::{Gesture, GestureRecognizer, TouchPhase, TouchPoint, TouchTracker};
use mindful_canvas::view::{ViewTransform, MAX_ZOOM, MIN_ZOOM};

fn touch(id: u64, x: f32, y: f32, phase: TouchPhase) -> TouchPoint {
    TouchPoint {
        id,
        pos: Pos2::new(x, y),
        phase,
    }
}

fn frame(tracker: &mut TouchTracker, points: &[TouchPoint]) {
    tracker.clear_frame();
    for point in points {
        tracker.apply(*point);
    }
}

fn approx(a: Pos2, b: Pos2) -> bool {
    a.distance(b) < 1e-3
}

#[test]
fn test_view_round_trip() {
    let view = ViewTransform::new(2.0, Vec2::new(30.0, -12.0));
    let canvas = Pos2::new(123.0, 45.5);
    let screen = view.canvas_to_screen(canvas);
    assert_eq!(screen, Pos2::new(276.0, 79.0));
    assert!(approx(view.screen_to_canvas(screen), canvas));
}

#[test]
fn test_zoom_keeps_anchor_fixed() {
    let mut view = ViewTransform::default();
    let anchor = Pos2::new(200.0, 150.0);
    let under = view.screen_to_canvas(anchor);

    view.zoom_at(anchor, 2.5);
    assert!((view.zoom() - 2.5).abs() < 1e-6);
    assert!(approx(view.screen_to_canvas(anchor), under));

    view.pan_by(Vec2::new(10.0, 0.0));
    assert!(approx(view.screen_to_canvas(anchor + Vec2::new(10.0, 0.0)), under));
}

#[test]
fn test_zoom_is_clamped() {
    let mut view = ViewTransform::default();
    view.zoom_at(Pos2::ZERO, 1000.0);
    assert_eq!(view.zoom(), MAX_ZOOM);
    view.zoom_at(Pos2::ZERO, 1e-6);
    assert_eq!(view.zoom(), MIN_ZOOM);
    assert_eq!(ViewTransform::new(f32::NAN, Vec2::ZERO).zoom(), 1.0);
}

#[test]
fn test_fit_centers_canvas() {
    let mut view = ViewTransform::default();
    let viewport = Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(800.0, 600.0));
    let canvas = Vec2::new(1600.0, 600.0);

    view.fit(canvas, viewport);
    // Width is the limiting side
    assert!((view.zoom() - 0.5 * 0.95).abs() < 1e-6);
    let on_screen = view.canvas_rect_to_screen(Rect::from_min_size(Pos2::ZERO, canvas));
    assert!(approx(on_screen.center(), viewport.center()));
    assert!(viewport.contains_rect(on_screen));

    view.reset(canvas, viewport);
    assert_eq!(view.zoom(), 1.0);
    assert!(approx(view.canvas_to_screen(Pos2::new(800.0, 300.0)), viewport.center()));
}

#[test]
fn test_pinch_zoom_gesture() {
    let mut tracker = TouchTracker::new();
    let mut gestures = GestureRecognizer::new();

    frame(
        &mut tracker,
        &[touch(1, 0.0, 0.0, TouchPhase::Started), touch(2, 100.0, 0.0, TouchPhase::Started)],
    );
    assert!(gestures.update(&tracker, 0.0).is_empty());

    frame(
        &mut tracker,
        &[touch(1, -50.0, 0.0, TouchPhase::Moved), touch(2, 150.0, 0.0, TouchPhase::Moved)],
    );
    let recognized = gestures.update(&tracker, 0.016);
    assert_eq!(
        recognized,
        vec![Gesture::Pinch {
            center: Pos2::new(50.0, 0.0),
            scale: 2.0,
        }]
    );
    assert!(gestures.is_engaged());

    frame(
        &mut tracker,
        &[touch(1, -50.0, 0.0, TouchPhase::Ended), touch(2, 150.0, 0.0, TouchPhase::Ended)],
    );
    assert!(gestures.update(&tracker, 0.032).is_empty());
    assert!(!gestures.is_engaged());
    assert_eq!(tracker.count(), 0);
}

#[test]
fn test_two_finger_pan() {
    let mut tracker = TouchTracker::new();
    let mut gestures = GestureRecognizer::new();

    frame(
        &mut tracker,
        &[touch(1, 0.0, 0.0, TouchPhase::Started), touch(2, 100.0, 0.0, TouchPhase::Started)],
    );
    gestures.update(&tracker, 0.0);

    // Below the pan threshold: nothing yet
    frame(
        &mut tracker,
        &[touch(1, 2.0, 0.0, TouchPhase::Moved), touch(2, 102.0, 0.0, TouchPhase::Moved)],
    );
    assert!(gestures.update(&tracker, 0.016).is_empty());
    assert!(!gestures.is_engaged());

    frame(
        &mut tracker,
        &[touch(1, 20.0, 10.0, TouchPhase::Moved), touch(2, 120.0, 10.0, TouchPhase::Moved)],
    );
    let recognized = gestures.update(&tracker, 0.032);
    assert_eq!(recognized, vec![Gesture::Pan { delta: Vec2::new(20.0, 10.0) }]);
}

#[test]
fn test_single_and_double_tap() {
    let mut tracker = TouchTracker::new();
    let mut gestures = GestureRecognizer::new();

    frame(&mut tracker, &[touch(1, 10.0, 10.0, TouchPhase::Started)]);
    assert!(gestures.update(&tracker, 0.0).is_empty());
    frame(&mut tracker, &[touch(1, 11.0, 10.0, TouchPhase::Ended)]);
    assert_eq!(
        gestures.update(&tracker, 0.1),
        vec![Gesture::Tap {
            position: Pos2::new(11.0, 10.0),
            count: 1,
        }]
    );

    frame(&mut tracker, &[touch(2, 10.0, 10.0, TouchPhase::Started)]);
    gestures.update(&tracker, 0.2);
    frame(&mut tracker, &[touch(2, 10.0, 10.0, TouchPhase::Ended)]);
    assert_eq!(
        gestures.update(&tracker, 0.25),
        vec![Gesture::Tap {
            position: Pos2::new(10.0, 10.0),
            count: 2,
        }]
    );
}

#[test]
fn test_long_press_is_not_a_tap() {
    let mut tracker = TouchTracker::new();
    let mut gestures = GestureRecognizer::new();

    frame(&mut tracker, &[touch(1, 10.0, 10.0, TouchPhase::Started)]);
    gestures.update(&tracker, 0.0);
    frame(&mut tracker, &[touch(1, 10.0, 10.0, TouchPhase::Ended)]);
    assert!(gestures.update(&tracker, 1.0).is_empty());
}

#[test]
fn test_cancelled_touch_is_released() {
    let mut tracker = TouchTracker::new();
    frame(
        &mut tracker,
        &[touch(1, 0.0, 0.0, TouchPhase::Started), touch(2, 5.0, 5.0, TouchPhase::Started)],
    );
    assert_eq!(tracker.positions(), vec![Pos2::new(0.0, 0.0), Pos2::new(5.0, 5.0)]);

    frame(&mut tracker, &[touch(2, 5.0, 5.0, TouchPhase::Cancelled)]);
    assert_eq!(tracker.count(), 1);
    assert_eq!(tracker.frame_events().len(), 1);
}
