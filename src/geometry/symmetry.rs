use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

pub const MIN_RADIAL_SEGMENTS: u8 = 2;
pub const MAX_RADIAL_SEGMENTS: u8 = 12;

/// How a stroke is repeated around the canvas center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymmetryMode {
    #[default]
    None,
    /// Mirrored across the vertical center line (left/right)
    Horizontal,
    /// Mirrored across the horizontal center line (top/bottom)
    Vertical,
    /// Both mirrors, four copies
    Quad,
    /// `n` copies rotated evenly around the center
    Radial(u8),
}

impl SymmetryMode {
    pub fn radial(segments: u8) -> Self {
        SymmetryMode::Radial(segments.clamp(MIN_RADIAL_SEGMENTS, MAX_RADIAL_SEGMENTS))
    }

    pub fn label(&self) -> String {
        match self {
            SymmetryMode::None => "Off".to_owned(),
            SymmetryMode::Horizontal => "Left / right".to_owned(),
            SymmetryMode::Vertical => "Top / bottom".to_owned(),
            SymmetryMode::Quad => "Four-way".to_owned(),
            SymmetryMode::Radial(n) => format!("Radial ×{n}"),
        }
    }

    /// Number of copies drawn for each stroke, including the original.
    pub fn copies(&self) -> usize {
        match self {
            SymmetryMode::None => 1,
            SymmetryMode::Horizontal | SymmetryMode::Vertical => 2,
            SymmetryMode::Quad => 4,
            SymmetryMode::Radial(n) => (*n).clamp(MIN_RADIAL_SEGMENTS, MAX_RADIAL_SEGMENTS) as usize,
        }
    }

    /// Map `point` into copy number `copy` (copy 0 is the identity).
    pub fn map_point(&self, copy: usize, point: Pos2, center: Pos2) -> Pos2 {
        let flip_x = |p: Pos2| Pos2::new(2.0 * center.x - p.x, p.y);
        let flip_y = |p: Pos2| Pos2::new(p.x, 2.0 * center.y - p.y);
        match (self, copy) {
            (_, 0) => point,
            (SymmetryMode::Horizontal, _) => flip_x(point),
            (SymmetryMode::Vertical, _) => flip_y(point),
            (SymmetryMode::Quad, 1) => flip_x(point),
            (SymmetryMode::Quad, 2) => flip_y(point),
            (SymmetryMode::Quad, _) => flip_x(flip_y(point)),
            (SymmetryMode::Radial(_), k) => {
                let angle = TAU * k as f32 / self.copies() as f32;
                rotate_about(point, center, angle)
            }
            (SymmetryMode::None, _) => point,
        }
    }

    /// Whether copy `copy` keeps axis-aligned rectangles axis-aligned.
    pub fn preserves_axes(&self, copy: usize) -> bool {
        match self {
            SymmetryMode::Radial(_) => {
                let quarter_turns = 4.0 * copy as f32 / self.copies() as f32;
                (quarter_turns - quarter_turns.round()).abs() < 1e-4
            }
            _ => true,
        }
    }

    /// All copies of `point`, the original first.
    pub fn mirror_point(&self, point: Pos2, center: Pos2) -> Vec<Pos2> {
        (0..self.copies()).map(|copy| self.map_point(copy, point, center)).collect()
    }

    /// Guide lines to draw over the canvas, as (start, end) pairs in canvas space.
    pub fn guides(&self, center: Pos2, half_extent: Vec2) -> Vec<(Pos2, Pos2)> {
        let vertical = (center - Vec2::new(0.0, half_extent.y), center + Vec2::new(0.0, half_extent.y));
        let horizontal = (center - Vec2::new(half_extent.x, 0.0), center + Vec2::new(half_extent.x, 0.0));
        match self {
            SymmetryMode::None => Vec::new(),
            SymmetryMode::Horizontal => vec![vertical],
            SymmetryMode::Vertical => vec![horizontal],
            SymmetryMode::Quad => vec![vertical, horizontal],
            SymmetryMode::Radial(_) => {
                let reach = half_extent.length();
                (0..self.copies())
                    .map(|k| {
                        let angle = TAU * k as f32 / self.copies() as f32;
                        let tip = center + Vec2::angled(angle - TAU / 4.0) * reach;
                        (center, tip)
                    })
                    .collect()
            }
        }
    }
}

pub fn rotate_about(point: Pos2, center: Pos2, angle: f32) -> Pos2 {
    let (sin, cos) = angle.sin_cos();
    let d = point - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}
