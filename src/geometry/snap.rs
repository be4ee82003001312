use egui::Pos2;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Spacing between grid lines, in canvas units
    pub size: f32,
    pub visible: bool,
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            visible: false,
            snap: false,
        }
    }
}

impl GridSettings {
    /// Snap `pos` when snapping is on, otherwise hand it back untouched.
    pub fn apply(&self, pos: Pos2) -> Pos2 {
        if self.snap { snap_to_grid(pos, self.size) } else { pos }
    }
}

/// Round both coordinates to the nearest multiple of `size`.
/// A non-positive size disables snapping.
pub fn snap_to_grid(pos: Pos2, size: f32) -> Pos2 {
    if size.is_nan() || size <= 0.0 {
        return pos;
    }
    Pos2::new((pos.x / size).round() * size, (pos.y / size).round() * size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_to_nearest_line() {
        assert_eq!(snap_to_grid(Pos2::new(29.0, 31.0), 20.0), Pos2::new(20.0, 40.0));
        assert_eq!(snap_to_grid(Pos2::new(-11.0, 9.0), 20.0), Pos2::new(-20.0, 0.0));
    }

    #[test]
    fn non_positive_size_leaves_point_alone() {
        let pos = Pos2::new(13.3, 7.7);
        assert_eq!(snap_to_grid(pos, 0.0), pos);
        assert_eq!(snap_to_grid(pos, -5.0), pos);
        assert_eq!(snap_to_grid(pos, f32::NAN), pos);
    }

    #[test]
    fn snapping_off_passes_through() {
        let mut grid = GridSettings::default();
        let pos = Pos2::new(13.0, 7.0);
        assert_eq!(grid.apply(pos), pos);
        grid.snap = true;
        assert_eq!(grid.apply(pos), Pos2::new(20.0, 0.0));
    }
}
