use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt::Write as _;

use crate::geometry::{self, SymmetryMode};
use crate::gradient::Gradient;
use crate::id_generator::generate_id;

pub type PathId = usize;

/// Segments used to approximate an ellipse outline
const ELLIPSE_SEGMENTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushKind {
    #[default]
    Pen,
    Marker,
    Pencil,
    Watercolor,
    Calligraphy,
}

impl BrushKind {
    pub const ALL: [BrushKind; 5] = [
        BrushKind::Pen,
        BrushKind::Marker,
        BrushKind::Pencil,
        BrushKind::Watercolor,
        BrushKind::Calligraphy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BrushKind::Pen => "Pen",
            BrushKind::Marker => "Marker",
            BrushKind::Pencil => "Pencil",
            BrushKind::Watercolor => "Watercolor",
            BrushKind::Calligraphy => "Calligraphy",
        }
    }

    /// Opacity multiplier applied on top of the path's own opacity
    pub fn opacity_factor(&self) -> f32 {
        match self {
            BrushKind::Pen | BrushKind::Calligraphy => 1.0,
            BrushKind::Marker => 0.6,
            BrushKind::Pencil => 0.85,
            BrushKind::Watercolor => 0.25,
        }
    }

    pub fn width_factor(&self) -> f32 {
        match self {
            BrushKind::Pen | BrushKind::Calligraphy => 1.0,
            BrushKind::Marker => 1.8,
            BrushKind::Pencil => 0.6,
            BrushKind::Watercolor => 2.2,
        }
    }

    /// Watercolor is laid down as several translucent passes of
    /// decreasing width; everything else is a single pass.
    pub fn passes(&self) -> &'static [f32] {
        match self {
            BrushKind::Watercolor => &[1.0, 0.75, 0.5],
            _ => &[1.0],
        }
    }

    /// Width of a calligraphy nib for a segment heading in `direction`.
    pub fn nib_width(width: f32, direction: Vec2) -> f32 {
        if direction == Vec2::ZERO {
            return width;
        }
        // Nib held at 45 degrees: thickest on the diagonal perpendicular to it
        let angle = direction.angle() - PI / 4.0;
        width * (0.3 + 0.7 * angle.sin().abs())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fill {
    Solid(Color32),
    Gradient(Gradient),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub color: Color32,
    pub width: f32,
    pub brush: BrushKind,
    /// `[0, 1]`
    pub opacity: f32,
    pub fill: Option<Fill>,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: Color32::from_rgb(0x2e, 0x7d, 0x32),
            width: 6.0,
            brush: BrushKind::Pen,
            opacity: 1.0,
            fill: None,
        }
    }
}

impl PathStyle {
    /// Width actually painted, after the brush's multiplier
    pub fn effective_width(&self) -> f32 {
        self.width * self.brush.width_factor()
    }

    pub fn effective_opacity(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0) * self.brush.opacity_factor()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathShape {
    Freehand(Vec<Pos2>),
    Line { start: Pos2, end: Pos2 },
    Rectangle { min: Pos2, max: Pos2 },
    Ellipse { center: Pos2, radii: Vec2 },
    Star { center: Pos2, outer: f32, inner: f32, points: u32 },
    /// Closed outline; what rotated rectangles, ellipses and stars become
    Polygon(Vec<Pos2>),
}

impl PathShape {
    /// Rectangle with `min`/`max` normalized.
    pub fn rectangle(a: Pos2, b: Pos2) -> Self {
        PathShape::Rectangle {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Ellipse inscribed in the box spanned by `a` and `b`.
    pub fn ellipse(a: Pos2, b: Pos2) -> Self {
        let rect = Rect::from_two_pos(a, b);
        PathShape::Ellipse {
            center: rect.center(),
            radii: rect.size() / 2.0,
        }
    }

    /// Star centered at `center` reaching out to `tip`.
    pub fn star(center: Pos2, tip: Pos2, points: u32) -> Self {
        let outer = center.distance(tip);
        PathShape::Star {
            center,
            outer,
            inner: outer * 0.45,
            points: points.max(3),
        }
    }

    pub fn is_closed(&self) -> bool {
        !matches!(self, PathShape::Freehand(_) | PathShape::Line { .. })
    }

    /// Polyline approximation of the shape, in canvas coordinates.
    pub fn outline(&self) -> Vec<Pos2> {
        match self {
            PathShape::Freehand(points) | PathShape::Polygon(points) => points.clone(),
            PathShape::Line { start, end } => vec![*start, *end],
            PathShape::Rectangle { min, max } => vec![
                *min,
                Pos2::new(max.x, min.y),
                *max,
                Pos2::new(min.x, max.y),
            ],
            PathShape::Ellipse { center, radii } => (0..ELLIPSE_SEGMENTS)
                .map(|i| {
                    let angle = TAU * i as f32 / ELLIPSE_SEGMENTS as f32;
                    Pos2::new(center.x + radii.x * angle.cos(), center.y + radii.y * angle.sin())
                })
                .collect(),
            PathShape::Star { center, outer, inner, points } => {
                let vertices = points * 2;
                (0..vertices)
                    .map(|i| {
                        let radius = if i % 2 == 0 { *outer } else { *inner };
                        // First tip points straight up
                        let angle = TAU * i as f32 / vertices as f32 - PI / 2.0;
                        *center + Vec2::angled(angle) * radius
                    })
                    .collect()
            }
        }
    }

    /// Apply a point mapping. Rectangles and ellipses keep their kind
    /// only when `preserves_axes` is set; otherwise they become polygons.
    pub fn map(&self, preserves_axes: bool, f: impl Fn(Pos2) -> Pos2) -> PathShape {
        match self {
            PathShape::Freehand(points) => PathShape::Freehand(points.iter().map(|p| f(*p)).collect()),
            PathShape::Line { start, end } => PathShape::Line {
                start: f(*start),
                end: f(*end),
            },
            PathShape::Rectangle { min, max } if preserves_axes => PathShape::rectangle(f(*min), f(*max)),
            PathShape::Ellipse { center, radii } if preserves_axes => {
                // A quarter turn swaps the axes
                let axis = f(*center + Vec2::X) - f(*center);
                let radii = if axis.x.abs() < 0.5 { Vec2::new(radii.y, radii.x) } else { *radii };
                PathShape::Ellipse {
                    center: f(*center),
                    radii,
                }
            }
            other => PathShape::Polygon(other.outline().into_iter().map(f).collect()),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            PathShape::Freehand(points) | PathShape::Polygon(points) => {
                for point in points {
                    *point += delta;
                }
            }
            PathShape::Line { start, end } => {
                *start += delta;
                *end += delta;
            }
            PathShape::Rectangle { min, max } => {
                *min += delta;
                *max += delta;
            }
            PathShape::Ellipse { center, .. } | PathShape::Star { center, .. } => *center += delta,
        }
    }
}

/// A drawn stroke or shape: geometry plus style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub id: PathId,
    pub shape: PathShape,
    pub style: PathStyle,
}

impl Path {
    pub fn new(shape: PathShape, style: PathStyle) -> Self {
        Self {
            id: generate_id(),
            shape,
            style,
        }
    }

    /// Same geometry and style under a new id
    pub fn with_fresh_id(&self) -> Self {
        Self::new(self.shape.clone(), self.style.clone())
    }

    pub fn is_closed(&self) -> bool {
        self.shape.is_closed()
    }

    pub fn outline(&self) -> Vec<Pos2> {
        self.shape.outline()
    }

    pub fn bounds(&self) -> Rect {
        geometry::calculate_bounds(&self.outline(), self.style.effective_width() / 2.0)
    }

    /// Whether `pos` touches the painted stroke (or the fill of a filled shape).
    pub fn hit_test(&self, pos: Pos2, tolerance: f32) -> bool {
        let outline = self.outline();
        if self.style.fill.is_some() && self.is_closed() && geometry::point_in_polygon(pos, &outline) {
            return true;
        }
        let reach = self.style.effective_width() / 2.0 + tolerance;
        geometry::distance_to_polyline(pos, &outline, self.is_closed()) <= reach
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.shape.translate(delta);
    }

    /// This path repeated per `mode` around `center`; the original comes first.
    pub fn mirrored(&self, mode: SymmetryMode, center: Pos2) -> Vec<Path> {
        std::iter::once(self.clone())
            .chain((1..mode.copies()).map(|copy| {
                let shape = self
                    .shape
                    .map(mode.preserves_axes(copy), |p| mode.map_point(copy, p, center));
                Path::new(shape, self.style.clone())
            }))
            .collect()
    }

    /// SVG path data (`d` attribute) describing the geometry.
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        match &self.shape {
            PathShape::Ellipse { center, radii } => {
                let (rx, ry) = (num(radii.x), num(radii.y));
                let _ = write!(
                    d,
                    "M {} {} A {rx} {ry} 0 1 0 {} {} A {rx} {ry} 0 1 0 {} {} Z",
                    num(center.x - radii.x),
                    num(center.y),
                    num(center.x + radii.x),
                    num(center.y),
                    num(center.x - radii.x),
                    num(center.y),
                );
            }
            shape => {
                let mut points = shape.outline();
                if points.len() == 1 {
                    // A dot: zero-length segment so round caps still paint
                    points.push(points[0]);
                }
                for (i, p) in points.iter().enumerate() {
                    let command = if i == 0 { "M" } else { "L" };
                    if i > 0 {
                        d.push(' ');
                    }
                    let _ = write!(d, "{command} {} {}", num(p.x), num(p.y));
                }
                if shape.is_closed() && !points.is_empty() {
                    d.push_str(" Z");
                }
            }
        }
        d
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros.
pub(crate) fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_owned() } else { text.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(10.5), "10.5");
        assert_eq!(num(1.234), "1.23");
        assert_eq!(num(-0.001), "0");
    }

    fn svg(shape: PathShape) -> String {
        Path::new(shape, PathStyle::default()).to_svg_d()
    }

    #[test]
    fn svg_data_for_open_and_closed_shapes() {
        assert_eq!(
            svg(PathShape::Freehand(vec![pos2(1.0, 2.0), pos2(3.5, 4.0), pos2(5.0, 6.25)])),
            "M 1 2 L 3.5 4 L 5 6.25"
        );
        assert_eq!(svg(PathShape::Line { start: pos2(0.0, 0.0), end: pos2(10.0, 5.0) }), "M 0 0 L 10 5");
        assert_eq!(
            svg(PathShape::rectangle(pos2(30.0, 30.0), pos2(10.0, 10.0))),
            "M 10 10 L 30 10 L 30 30 L 10 30 Z"
        );
        // A single tap still produces a visible dot
        assert_eq!(svg(PathShape::Freehand(vec![pos2(4.0, 4.0)])), "M 4 4 L 4 4");
    }

    #[test]
    fn ellipse_is_two_arcs() {
        let ellipse = PathShape::ellipse(pos2(10.0, 15.0), pos2(30.0, 25.0));
        assert_eq!(svg(ellipse), "M 10 20 A 10 5 0 1 0 30 20 A 10 5 0 1 0 10 20 Z");
    }

    #[test]
    fn calligraphy_nib_varies_with_direction() {
        let along = BrushKind::nib_width(10.0, Vec2::new(1.0, 1.0));
        let across = BrushKind::nib_width(10.0, Vec2::new(1.0, -1.0));
        assert!(across > along);
    }

    #[test]
    fn star_outline_alternates_radii() {
        let star = PathShape::star(pos2(0.0, 0.0), pos2(0.0, -10.0), 5);
        let outline = star.outline();
        assert_eq!(outline.len(), 10);
        assert!((outline[0].distance(pos2(0.0, 0.0)) - 10.0).abs() < 1e-4);
        assert!((outline[1].distance(pos2(0.0, 0.0)) - 4.5).abs() < 1e-4);
    }
}
