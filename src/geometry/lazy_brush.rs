use egui::Pos2;
use serde::{Deserialize, Serialize};

/// Stabilizes free-hand input: the brush trails the pointer on an
/// imaginary string of length `radius`, and only moves once the string
/// is pulled tight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LazyBrush {
    pub enabled: bool,
    pub radius: f32,
    /// 0 = brush catches up fully each update, values toward 1 make it
    /// lag further behind.
    pub friction: f32,
    #[serde(skip)]
    pointer: Pos2,
    #[serde(skip)]
    brush: Pos2,
}

impl Default for LazyBrush {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 30.0,
            friction: 0.0,
            pointer: Pos2::ZERO,
            brush: Pos2::ZERO,
        }
    }
}

impl LazyBrush {
    pub fn new(radius: f32, friction: f32) -> Self {
        Self {
            enabled: true,
            radius: radius.max(0.0),
            friction: friction.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Place both pointer and brush at `pos` (start of a stroke).
    pub fn reset(&mut self, pos: Pos2) {
        self.pointer = pos;
        self.brush = pos;
    }

    pub fn pointer(&self) -> Pos2 {
        self.pointer
    }

    pub fn brush(&self) -> Pos2 {
        self.brush
    }

    /// Feed a new pointer position. Returns true when the brush moved.
    pub fn update(&mut self, pointer: Pos2) -> bool {
        self.pointer = pointer;
        if !self.enabled || self.radius <= 0.0 {
            let moved = self.brush != pointer;
            self.brush = pointer;
            return moved;
        }

        let offset = pointer - self.brush;
        let distance = offset.length();
        if distance <= self.radius {
            return false;
        }

        let travel = (distance - self.radius) * (1.0 - self.friction.clamp(0.0, 1.0));
        if travel <= f32::EPSILON {
            return false;
        }
        self.brush += offset / distance * travel;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_radius_follows_pointer() {
        let mut lazy = LazyBrush::new(0.0, 0.5);
        lazy.reset(Pos2::ZERO);
        for target in [Pos2::new(3.0, 4.0), Pos2::new(-7.5, 2.0), Pos2::new(100.0, 0.0)] {
            assert!(lazy.update(target));
            assert_eq!(lazy.brush(), target);
        }
        assert!(!lazy.update(Pos2::new(100.0, 0.0)));
    }

    #[test]
    fn brush_waits_inside_radius() {
        let mut lazy = LazyBrush::new(10.0, 0.0);
        lazy.reset(Pos2::ZERO);
        assert!(!lazy.update(Pos2::new(6.0, 8.0)));
        assert_eq!(lazy.brush(), Pos2::ZERO);
        assert_eq!(lazy.pointer(), Pos2::new(6.0, 8.0));

        // Pulled 5 past the string's length
        assert!(lazy.update(Pos2::new(15.0, 0.0)));
        assert_eq!(lazy.brush(), Pos2::new(5.0, 0.0));
    }

    #[test]
    fn disabled_brush_is_direct() {
        let mut lazy = LazyBrush::default();
        lazy.reset(Pos2::ZERO);
        lazy.update(Pos2::new(2.0, 2.0));
        assert_eq!(lazy.brush(), Pos2::new(2.0, 2.0));
    }
}
