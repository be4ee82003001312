//! Gradient definitions and the geometry needed to render them.

use egui::{Color32, Mesh, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::color::{self, lerp_color, parse_hex};

pub const MIN_STOPS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: Color32,
    /// Percent along the gradient line, `[0, 100]`
    pub position: f32,
}

impl ColorStop {
    pub fn new(color: Color32, position: f32) -> Self {
        Self {
            color,
            position: clamp_position(position),
        }
    }
}

fn clamp_position(position: f32) -> f32 {
    if position.is_nan() { 0.0 } else { position.clamp(0.0, 100.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GradientKind {
    /// CSS convention: 0deg points up, angles grow clockwise
    Linear { angle_deg: f32 },
    /// Center in percent of the filled rect
    Radial { center: (f32, f32) },
}

impl Default for GradientKind {
    fn default() -> Self {
        GradientKind::Linear { angle_deg: 90.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub name: String,
    pub kind: GradientKind,
    stops: Vec<ColorStop>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self::linear("Custom", 90.0, vec![
            ColorStop::new(Color32::from_rgb(0x80, 0xde, 0xea), 0.0),
            ColorStop::new(Color32::from_rgb(0xce, 0x93, 0xd8), 100.0),
        ])
    }
}

impl Gradient {
    pub fn new(name: impl Into<String>, kind: GradientKind, stops: Vec<ColorStop>) -> Self {
        let mut gradient = Self {
            name: name.into(),
            kind,
            stops: stops.into_iter().map(|s| ColorStop::new(s.color, s.position)).collect(),
        };
        // A gradient with fewer than two stops is padded with its own ends
        while gradient.stops.len() < MIN_STOPS {
            let color = gradient.stops.first().map_or(Color32::WHITE, |s| s.color);
            let position = if gradient.stops.is_empty() { 0.0 } else { 100.0 };
            gradient.stops.push(ColorStop::new(color, position));
        }
        gradient.sort_stops();
        gradient
    }

    pub fn linear(name: impl Into<String>, angle_deg: f32, stops: Vec<ColorStop>) -> Self {
        Self::new(name, GradientKind::Linear { angle_deg }, stops)
    }

    pub fn radial(name: impl Into<String>, center: (f32, f32), stops: Vec<ColorStop>) -> Self {
        Self::new(name, GradientKind::Radial { center }, stops)
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    fn sort_stops(&mut self) {
        self.stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    }

    /// Insert a stop and return its index after sorting.
    pub fn add_stop(&mut self, color: Color32, position: f32) -> usize {
        let stop = ColorStop::new(color, position);
        self.stops.push(stop);
        self.sort_stops();
        self.stops.iter().rposition(|s| *s == stop).unwrap_or(0)
    }

    /// Remove a stop. Refused (returns `None`) when it would leave fewer
    /// than two stops.
    pub fn remove_stop(&mut self, index: usize) -> Option<ColorStop> {
        if self.stops.len() <= MIN_STOPS || index >= self.stops.len() {
            return None;
        }
        Some(self.stops.remove(index))
    }

    /// Move a stop; returns the stop's new index.
    pub fn set_stop_position(&mut self, index: usize, position: f32) -> Option<usize> {
        let stop = self.stops.get_mut(index)?;
        stop.position = clamp_position(position);
        let moved = *stop;
        self.sort_stops();
        self.stops.iter().position(|s| *s == moved)
    }

    pub fn set_stop_color(&mut self, index: usize, color: Color32) {
        if let Some(stop) = self.stops.get_mut(index) {
            stop.color = color;
        }
    }

    /// Color at `t` in `[0, 1]` along the gradient.
    pub fn sample(&self, t: f32) -> Color32 {
        let percent = t.clamp(0.0, 1.0) * 100.0;
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color32::TRANSPARENT;
        };
        if percent <= first.position {
            return first.color;
        }
        if percent >= last.position {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if percent >= a.position && percent <= b.position {
                let span = b.position - a.position;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return lerp_color(a.color, b.color, (percent - a.position) / span);
            }
        }
        last.color
    }

    /// A CSS-style description, e.g. `linear-gradient(90deg, #ff0000 0%, #0000ff 100%)`.
    pub fn to_css(&self) -> String {
        let stops = self
            .stops
            .iter()
            .map(|s| format!("{} {}%", color::to_hex(s.color), s.position))
            .collect::<Vec<_>>()
            .join(", ");
        match self.kind {
            GradientKind::Linear { angle_deg } => format!("linear-gradient({angle_deg}deg, {stops})"),
            GradientKind::Radial { center: (x, y) } => {
                format!("radial-gradient(circle at {x}% {y}%, {stops})")
            }
        }
    }

    /// Start and end of the gradient line for a linear gradient filling `rect`.
    /// The line passes through the center and is long enough that the
    /// corners get the first and last stop colors.
    pub fn linear_endpoints(angle_deg: f32, rect: Rect) -> (Pos2, Pos2) {
        let direction = angle_direction(angle_deg);
        let length = (rect.width() * direction.x).abs() + (rect.height() * direction.y).abs();
        let half = direction * (length / 2.0);
        (rect.center() - half, rect.center() + half)
    }

    pub fn radial_center(center: (f32, f32), rect: Rect) -> Pos2 {
        rect.min + Vec2::new(rect.width() * center.0 / 100.0, rect.height() * center.1 / 100.0)
    }

    /// Radius reaching the farthest corner of `rect`.
    pub fn radial_radius(center: Pos2, rect: Rect) -> f32 {
        [rect.left_top(), rect.right_top(), rect.left_bottom(), rect.right_bottom()]
            .into_iter()
            .map(|corner| corner.distance(center))
            .fold(0.0, f32::max)
    }

    /// Position along the gradient (0..=1) of `pos` when the gradient fills `rect`.
    pub fn t_at(&self, pos: Pos2, rect: Rect) -> f32 {
        match self.kind {
            GradientKind::Linear { angle_deg } => {
                let (start, end) = Self::linear_endpoints(angle_deg, rect);
                let line = end - start;
                let length_sq = line.length_sq();
                if length_sq <= f32::EPSILON {
                    return 0.0;
                }
                ((pos - start).dot(line) / length_sq).clamp(0.0, 1.0)
            }
            GradientKind::Radial { center } => {
                let center = Self::radial_center(center, rect);
                let radius = Self::radial_radius(center, rect);
                if radius <= f32::EPSILON {
                    return 0.0;
                }
                (pos.distance(center) / radius).clamp(0.0, 1.0)
            }
        }
    }

    pub fn color_at(&self, pos: Pos2, rect: Rect) -> Color32 {
        self.sample(self.t_at(pos, rect))
    }

    /// Mesh filling `rect`, subdivided finely enough that per-vertex
    /// interpolation follows multi-stop and radial gradients.
    pub fn to_mesh(&self, rect: Rect, opacity: f32) -> Mesh {
        const CELLS: usize = 24;
        let mut mesh = Mesh::default();
        for row in 0..=CELLS {
            for col in 0..=CELLS {
                let pos = rect.min
                    + Vec2::new(
                        rect.width() * col as f32 / CELLS as f32,
                        rect.height() * row as f32 / CELLS as f32,
                    );
                mesh.colored_vertex(pos, color::with_opacity(self.color_at(pos, rect), opacity));
            }
        }
        let stride = (CELLS + 1) as u32;
        for row in 0..CELLS as u32 {
            for col in 0..CELLS as u32 {
                let i = row * stride + col;
                mesh.add_triangle(i, i + 1, i + stride);
                mesh.add_triangle(i + 1, i + stride + 1, i + stride);
            }
        }
        mesh
    }

    /// Fan-triangulated mesh for a star-shaped polygon (convex shapes,
    /// ellipses and stars all qualify), colored by `rect` = its bounds.
    pub fn fill_polygon_mesh(&self, polygon: &[Pos2], rect: Rect, opacity: f32) -> Mesh {
        let mut mesh = Mesh::default();
        if polygon.len() < 3 {
            return mesh;
        }
        let center = rect.center();
        mesh.colored_vertex(center, color::with_opacity(self.color_at(center, rect), opacity));
        for &point in polygon {
            mesh.colored_vertex(point, color::with_opacity(self.color_at(point, rect), opacity));
        }
        let n = polygon.len() as u32;
        for i in 0..n {
            mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
        }
        mesh
    }
}

/// Unit vector for a CSS gradient angle in screen space (y grows down).
pub fn angle_direction(angle_deg: f32) -> Vec2 {
    let radians = angle_deg.to_radians();
    Vec2::new(radians.sin(), -radians.cos())
}

fn stops_from_hex(hexes: &[&str]) -> Vec<ColorStop> {
    let last = hexes.len().saturating_sub(1).max(1) as f32;
    hexes
        .iter()
        .enumerate()
        .filter_map(|(i, hex)| parse_hex(hex).map(|c| ColorStop::new(c, i as f32 * 100.0 / last)))
        .collect()
}

/// Built-in gradients offered alongside the user's custom ones
pub fn presets() -> Vec<Gradient> {
    vec![
        Gradient::linear("Sunrise", 180.0, stops_from_hex(&["#ffecd2", "#fcb69f", "#ff8a80"])),
        Gradient::linear("Ocean", 135.0, stops_from_hex(&["#e0f7fa", "#4fc3f7", "#01579b"])),
        Gradient::linear("Forest", 90.0, stops_from_hex(&["#dcedc8", "#66bb6a", "#1b5e20"])),
        Gradient::radial("Lavender", (50.0, 50.0), stops_from_hex(&["#f3e5f5", "#b39ddb", "#5e35b1"])),
        Gradient::linear("Twilight", 45.0, stops_from_hex(&["#2c3e50", "#8e44ad", "#fd746c"])),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_sort_and_clamp() {
        let gradient = Gradient::linear("t", 0.0, vec![
            ColorStop::new(Color32::RED, 150.0),
            ColorStop::new(Color32::BLUE, -20.0),
        ]);
        let positions: Vec<f32> = gradient.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 100.0]);
        assert_eq!(gradient.stops()[0].color, Color32::BLUE);
    }

    #[test]
    fn too_few_stops_are_padded() {
        let gradient = Gradient::linear("t", 0.0, vec![ColorStop::new(Color32::RED, 30.0)]);
        assert_eq!(gradient.stops().len(), MIN_STOPS);
    }

    fn red_to_blue(angle_deg: f32) -> Gradient {
        Gradient::linear("t", angle_deg, vec![
            ColorStop::new(Color32::RED, 0.0),
            ColorStop::new(Color32::BLUE, 100.0),
        ])
    }

    fn close(a: Pos2, b: Pos2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn css_description() {
        assert_eq!(red_to_blue(90.0).to_css(), "linear-gradient(90deg, #ff0000 0%, #0000ff 100%)");
        let radial = Gradient::radial("r", (50.0, 25.0), red_to_blue(0.0).stops().to_vec());
        assert_eq!(radial.to_css(), "radial-gradient(circle at 50% 25%, #ff0000 0%, #0000ff 100%)");
    }

    #[test]
    fn linear_angles_follow_css() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0));

        let (start, end) = Gradient::linear_endpoints(90.0, rect);
        assert!(close(start, Pos2::new(0.0, 25.0)), "{start:?}");
        assert!(close(end, Pos2::new(100.0, 25.0)), "{end:?}");

        // 0deg runs bottom to top
        let (start, end) = Gradient::linear_endpoints(0.0, rect);
        assert!(close(start, Pos2::new(50.0, 50.0)), "{start:?}");
        assert!(close(end, Pos2::new(50.0, 0.0)), "{end:?}");

        let gradient = red_to_blue(90.0);
        assert_eq!(gradient.color_at(Pos2::new(0.0, 10.0), rect), Color32::RED);
        assert_eq!(gradient.color_at(Pos2::new(100.0, 40.0), rect), Color32::BLUE);
    }

    #[test]
    fn sample_interpolates_between_stops() {
        let gradient = red_to_blue(90.0);
        assert_eq!(gradient.sample(0.0), Color32::RED);
        assert_eq!(gradient.sample(1.0), Color32::BLUE);
        assert_eq!(gradient.sample(0.5), Color32::from_rgb(128, 0, 128));
        // Out of range is clamped
        assert_eq!(gradient.sample(-3.0), Color32::RED);
        assert_eq!(gradient.sample(7.0), Color32::BLUE);
    }

    #[test]
    fn remove_stop_keeps_two() {
        let mut gradient = red_to_blue(90.0);
        assert_eq!(gradient.remove_stop(0), None);
        assert_eq!(gradient.stops().len(), 2);

        let index = gradient.add_stop(Color32::GREEN, 50.0);
        assert_eq!(index, 1);
        assert_eq!(gradient.remove_stop(5), None);
        assert_eq!(gradient.remove_stop(1).map(|s| s.color), Some(Color32::GREEN));
        assert_eq!(gradient.remove_stop(1), None);
    }

    #[test]
    fn moving_a_stop_resorts() {
        let mut gradient = red_to_blue(90.0);
        gradient.add_stop(Color32::GREEN, 50.0);
        assert_eq!(gradient.set_stop_position(0, 75.0), Some(1));
        assert_eq!(gradient.stops()[0].color, Color32::GREEN);
        assert_eq!(gradient.stops()[1].color, Color32::RED);
        assert_eq!(gradient.set_stop_position(2, -10.0), Some(0));
        assert_eq!(gradient.stops()[0].position, 0.0);
    }

    #[test]
    fn presets_have_stops_at_both_ends() {
        for preset in presets() {
            assert_eq!(preset.stops().first().map(|s| s.position), Some(0.0), "{}", preset.name);
            assert_eq!(preset.stops().last().map(|s| s.position), Some(100.0), "{}", preset.name);
        }
    }
}
