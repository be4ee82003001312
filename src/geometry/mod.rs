use egui::{Pos2, Rect};

pub mod lazy_brush;
pub mod snap;
pub mod symmetry;

pub use lazy_brush::LazyBrush;
pub use snap::{snap_to_grid, GridSettings};
pub use symmetry::SymmetryMode;

/// Calculate distance from a point to a line segment
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = (point_vec.dot(line_vec) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Distance from `point` to the nearest segment of a polyline.
pub fn distance_to_polyline(point: Pos2, points: &[Pos2], closed: bool) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => point.distance(*only),
        _ => {
            let open = points
                .windows(2)
                .map(|w| distance_to_line_segment(point, w[0], w[1]))
                .fold(f32::INFINITY, f32::min);
            if closed {
                let closing = distance_to_line_segment(point, points[points.len() - 1], points[0]);
                open.min(closing)
            } else {
                open
            }
        }
    }
}

/// Even-odd point in polygon test
pub fn point_in_polygon(point: Pos2, polygon: &[Pos2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Calculate the bounding box for a set of points
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}
