use egui::{Modifiers, Pos2};
use std::collections::BTreeMap;

/// A single touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub pos: Pos2,
    pub phase: TouchPhase,
}

/// Phase of a touch interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

impl From<egui::TouchPhase> for TouchPhase {
    fn from(phase: egui::TouchPhase) -> Self {
        match phase {
            egui::TouchPhase::Start => TouchPhase::Started,
            egui::TouchPhase::Move => TouchPhase::Moved,
            egui::TouchPhase::End => TouchPhase::Ended,
            egui::TouchPhase::Cancel => TouchPhase::Cancelled,
        }
    }
}

/// Touches currently on the screen, plus what changed this frame
#[derive(Debug, Default, Clone)]
pub struct TouchTracker {
    active: BTreeMap<u64, Pos2>,
    frame: Vec<TouchPoint>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one touch event
    pub fn apply(&mut self, point: TouchPoint) {
        match point.phase {
            TouchPhase::Started | TouchPhase::Moved => {
                self.active.insert(point.id, point.pos);
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.active.remove(&point.id);
            }
        }
        self.frame.push(point);
    }

    /// Forget the previous frame's events, keeping the fingers that are down
    pub fn clear_frame(&mut self) {
        self.frame.clear();
    }

    /// Collect this frame's touch events from egui
    pub fn begin_frame(&mut self, ctx: &egui::Context) {
        self.clear_frame();
        let events: Vec<TouchPoint> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { id, phase, pos, .. } => Some(TouchPoint {
                        id: id.0,
                        pos: *pos,
                        phase: (*phase).into(),
                    }),
                    _ => None,
                })
                .collect()
        });
        for point in events {
            self.apply(point);
        }
    }

    /// Positions of the fingers still down, ordered by touch id
    pub fn positions(&self) -> Vec<Pos2> {
        self.active.values().copied().collect()
    }

    pub fn count(&self) -> usize {
        self.active.len()
    }

    /// Events seen since the last [`Self::begin_frame`]
    pub fn frame_events(&self) -> &[TouchPoint] {
        &self.frame
    }
}

/// Returns true if Shift is held (constrain shapes)
pub fn is_constrained(modifiers: &Modifiers) -> bool {
    modifiers.shift
}
