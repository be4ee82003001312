use egui::{Pos2, Vec2};

use super::state::{TouchPhase, TouchTracker};

/// Represents a recognized gesture
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Pinch gesture for zooming; `scale` is relative to the previous frame
    Pinch { center: Pos2, scale: f32 },
    /// Two-finger pan for moving the view; `delta` since the previous frame
    Pan { delta: Vec2 },
    /// Quick single-finger tap
    Tap { position: Pos2, count: u8 },
}

/// Configuration for gesture recognition
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Minimum distance the fingers' center travels before panning starts
    pub min_pan_distance: f32,
    /// Minimum scale difference before pinching starts
    pub min_pinch_scale: f32,
    /// Maximum time between taps for multi-tap (seconds)
    pub multi_tap_time: f64,
    /// Maximum press duration still counted as a tap (seconds)
    pub max_tap_time: f64,
    /// Maximum finger travel still counted as a tap
    pub tap_slop: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_pan_distance: 5.0,
            min_pinch_scale: 0.05,
            multi_tap_time: 0.3,
            max_tap_time: 0.25,
            tap_slop: 8.0,
        }
    }
}

/// Recognizes pinch, pan and tap gestures from touch input
#[derive(Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    last_distance: Option<f32>,
    last_center: Option<Pos2>,
    accumulated_scale: f32,
    accumulated_pan: Vec2,
    engaged: bool,
    tap_start: Option<(f64, Pos2)>,
    last_tap_time: Option<f64>,
    tap_count: u8,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            last_distance: None,
            last_center: None,
            accumulated_scale: 1.0,
            accumulated_pan: Vec2::ZERO,
            engaged: false,
            tap_start: None,
            last_tap_time: None,
            tap_count: 0,
        }
    }

    /// True while a two-finger gesture owns the input
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Update gesture state and return the gestures recognized this frame
    pub fn update(&mut self, touches: &TouchTracker, now: f64) -> Vec<Gesture> {
        let mut gestures = Vec::new();
        if let Some(tap) = self.detect_tap(touches, now) {
            gestures.push(tap);
        }

        let positions = touches.positions();
        if positions.len() != 2 {
            self.reset_multi_touch();
            return gestures;
        }
        // A second finger can't be part of a tap
        self.tap_start = None;

        let (p1, p2) = (positions[0], positions[1]);
        let center = p1 + (p2 - p1) / 2.0;
        let distance = p1.distance(p2);

        if let (Some(last_distance), Some(last_center)) = (self.last_distance, self.last_center) {
            let scale = if last_distance > f32::EPSILON { distance / last_distance } else { 1.0 };
            let delta = center - last_center;

            if self.engaged {
                gestures.extend(Self::frame_gestures(center, scale, delta));
            } else {
                self.accumulated_scale *= scale;
                self.accumulated_pan += delta;
                if (self.accumulated_scale - 1.0).abs() >= self.config.min_pinch_scale
                    || self.accumulated_pan.length() >= self.config.min_pan_distance
                {
                    self.engaged = true;
                    gestures.extend(Self::frame_gestures(
                        center,
                        self.accumulated_scale,
                        self.accumulated_pan,
                    ));
                }
            }
        }

        self.last_distance = Some(distance);
        self.last_center = Some(center);
        gestures
    }

    fn frame_gestures(center: Pos2, scale: f32, delta: Vec2) -> Vec<Gesture> {
        let mut gestures = Vec::new();
        if (scale - 1.0).abs() > f32::EPSILON {
            gestures.push(Gesture::Pinch { center, scale });
        }
        if delta != Vec2::ZERO {
            gestures.push(Gesture::Pan { delta });
        }
        gestures
    }

    fn reset_multi_touch(&mut self) {
        self.last_distance = None;
        self.last_center = None;
        self.accumulated_scale = 1.0;
        self.accumulated_pan = Vec2::ZERO;
        self.engaged = false;
    }

    fn detect_tap(&mut self, touches: &TouchTracker, now: f64) -> Option<Gesture> {
        let mut tap = None;
        for event in touches.frame_events() {
            match event.phase {
                TouchPhase::Started if touches.count() <= 1 => {
                    self.tap_start = Some((now, event.pos));
                }
                TouchPhase::Moved => {
                    if let Some((_, start)) = self.tap_start {
                        if start.distance(event.pos) > self.config.tap_slop {
                            self.tap_start = None;
                        }
                    }
                }
                TouchPhase::Ended => {
                    if let Some((start_time, start)) = self.tap_start.take() {
                        if now - start_time <= self.config.max_tap_time
                            && start.distance(event.pos) <= self.config.tap_slop
                        {
                            tap = Some(self.register_tap(event.pos, now));
                        }
                    }
                }
                TouchPhase::Cancelled => self.tap_start = None,
                TouchPhase::Started => {}
            }
        }
        tap
    }

    fn register_tap(&mut self, position: Pos2, now: f64) -> Gesture {
        match self.last_tap_time {
            Some(last) if now - last <= self.config.multi_tap_time => {
                self.tap_count = self.tap_count.saturating_add(1);
            }
            _ => self.tap_count = 1,
        }
        self.last_tap_time = Some(now);
        Gesture::Tap {
            position,
            count: self.tap_count,
        }
    }
}
