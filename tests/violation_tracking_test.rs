//! Tests for the violation state machine over synthetic signal streams

use proctor_signal::config::Thresholds;
use proctor_signal::signal::FrameSignal;
use proctor_signal::violation_tracker::{ViolationCategory, ViolationTracker};

const FRAME_INTERVAL: f64 = 0.05;

fn blank_signal(timestamp: f64) -> FrameSignal {
    FrameSignal {
        timestamp,
        gaze_h: None,
        gaze_v: None,
        yaw: None,
        pitch: None,
        roll: None,
        num_faces: 1,
    }
}

fn new_tracker() -> ViolationTracker {
    ViolationTracker::new(Thresholds::default(), 0.15)
}

#[test]
fn test_sustained_gaze_right_emits_single_event() {
    let thresholds = Thresholds::default();
    let mut tracker = new_tracker();
    let above = thresholds.eye_horizontal + 1.0;

    // Hold the gaze above threshold for 0.20s, then return to center
    let mut t = 0.0;
    while t <= 0.20 + 1e-9 {
        let mut signal = blank_signal(t);
        signal.gaze_h = Some(above);
        tracker.update(&signal);
        t += FRAME_INTERVAL;
    }
    let mut signal = blank_signal(t);
    signal.gaze_h = Some(0.0);
    tracker.update(&signal);
    tracker.finalize();

    let events = tracker.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].category, ViolationCategory::GazeRight);
    assert!((events[0].duration - 0.2).abs() < 1e-9);
    assert_eq!(events[0].intensity, Some(above));
}

#[test]
fn test_span_below_debounce_floor_is_discarded() {
    let mut tracker = new_tracker();

    // Only 0.10s above threshold
    for i in 0..3 {
        let mut signal = blank_signal(f64::from(i) * FRAME_INTERVAL);
        signal.gaze_h = Some(15.0);
        tracker.update(&signal);
    }
    let mut signal = blank_signal(0.15);
    signal.gaze_h = Some(0.0);
    tracker.update(&signal);
    tracker.finalize();

    assert!(tracker.events().is_empty());
}

#[test]
fn test_finalize_flushes_active_face_missing() {
    let mut tracker = new_tracker();

    let mut signal = blank_signal(2.0);
    signal.num_faces = 0;
    tracker.update(&signal);
    let mut signal = blank_signal(3.5);
    signal.num_faces = 0;
    tracker.update(&signal);
    tracker.finalize();

    let events = tracker.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].category, ViolationCategory::FaceMissing);
    assert_eq!(events[0].start_time, 2.0);
    assert!((events[0].duration - 1.5).abs() < 1e-9);
    assert_eq!(events[0].intensity, None);
}

#[test]
fn test_finalize_is_idempotent() {
    let mut tracker = new_tracker();
    let mut signal = blank_signal(0.0);
    signal.num_faces = 0;
    tracker.update(&signal);
    let mut signal = blank_signal(1.0);
    signal.num_faces = 0;
    tracker.update(&signal);

    tracker.finalize();
    tracker.finalize();
    assert_eq!(tracker.events().len(), 1);
}

#[test]
fn test_absent_gaze_forces_end_transition() {
    let mut tracker = new_tracker();

    let mut signal = blank_signal(0.0);
    signal.gaze_h = Some(-12.0);
    tracker.update(&signal);
    let mut signal = blank_signal(0.3);
    signal.gaze_h = Some(-12.0);
    tracker.update(&signal);

    // Dropout: the active gaze_left span ends at the absent reading
    tracker.update(&blank_signal(0.6));

    assert_eq!(tracker.events().len(), 1);
    assert_eq!(tracker.events()[0].category, ViolationCategory::GazeLeft);
    assert!((tracker.events()[0].duration - 0.3).abs() < 1e-9);

    // Absent readings cannot start a new span
    tracker.update(&blank_signal(0.9));
    tracker.finalize();
    assert_eq!(tracker.events().len(), 1);
}

#[test]
fn test_opposite_directions_are_independent_events() {
    let mut tracker = new_tracker();

    for i in 0..5 {
        let mut signal = blank_signal(f64::from(i) * 0.1);
        signal.yaw = Some(-45.0);
        tracker.update(&signal);
    }
    // Turn from left to right on adjacent frames
    for i in 5..10 {
        let mut signal = blank_signal(f64::from(i) * 0.1);
        signal.yaw = Some(45.0);
        tracker.update(&signal);
    }
    tracker.finalize();

    let categories: Vec<_> = tracker.events().iter().map(|e| e.category).collect();
    assert_eq!(
        categories,
        vec![ViolationCategory::HeadLeft, ViolationCategory::HeadRight]
    );
}

#[test]
fn test_concurrent_categories_track_independently() {
    let mut tracker = new_tracker();

    // Simultaneous pitch violation and multiple faces
    for i in 0..6 {
        let mut signal = blank_signal(f64::from(i) * 0.1);
        signal.pitch = Some(25.0);
        signal.num_faces = 2;
        tracker.update(&signal);
    }
    tracker.finalize();

    assert_eq!(tracker.count(ViolationCategory::HeadDown), 1);
    assert_eq!(tracker.count(ViolationCategory::MultipleFaces), 1);
    assert_eq!(tracker.events().len(), 2);
}

#[test]
fn test_boundary_values_do_not_trigger() {
    let thresholds = Thresholds::default();
    let mut tracker = new_tracker();

    // Exactly at threshold is not a violation (strict comparison)
    for i in 0..10 {
        let mut signal = blank_signal(f64::from(i) * 0.1);
        signal.gaze_h = Some(thresholds.eye_horizontal);
        signal.yaw = Some(thresholds.yaw);
        tracker.update(&signal);
    }
    tracker.finalize();

    assert!(tracker.events().is_empty());
}

#[test]
fn test_event_intensity_is_peak_absolute_angle() {
    let mut tracker = new_tracker();

    let angles = [-9.0, -14.5, -11.0, -9.5];
    for (i, angle) in angles.iter().enumerate() {
        let mut signal = blank_signal(f64::from(i as u32) * 0.1);
        signal.gaze_h = Some(*angle);
        tracker.update(&signal);
    }
    tracker.finalize();

    assert_eq!(tracker.events().len(), 1);
    assert_eq!(tracker.events()[0].intensity, Some(14.5));
}
