use egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, Stroke};

use crate::color::with_opacity;
use crate::document::Document;
use crate::geometry::{GridSettings, SymmetryMode};
use crate::path::{BrushKind, Fill, Path};
use crate::view::ViewTransform;

/// Grid lines closer than this on screen are skipped
const MIN_GRID_SPACING_PX: f32 = 6.0;
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 60, 80, 40);
const GUIDE_COLOR: Color32 = Color32::from_rgba_premultiplied(120, 80, 200, 120);
const CANVAS_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 40);

/// What to draw over the document besides its layers
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlays {
    pub grid: GridSettings,
    pub symmetry: SymmetryMode,
    pub show_symmetry_guides: bool,
}

/// Paints documents onto an egui painter through a [`ViewTransform`]
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    view: ViewTransform,
}

impl Renderer {
    pub fn new(view: ViewTransform) -> Self {
        Self { view }
    }

    /// Canvas background, layers bottom to top, then overlays
    pub fn render(&self, painter: &Painter, document: &Document, overlays: &Overlays) {
        let canvas = self.view.canvas_rect_to_screen(document.canvas_rect());
        painter.rect_filled(canvas.translate(egui::vec2(3.0, 3.0)), 2.0, CANVAS_SHADOW);
        painter.rect_filled(canvas, 0.0, document.background);

        let clipped = painter.with_clip_rect(canvas.intersect(painter.clip_rect()));
        for layer in document.layers().iter().filter(|l| l.visible) {
            for path in &layer.paths {
                self.paint_path(&clipped, path, layer.opacity());
            }
        }

        if overlays.grid.visible {
            self.paint_grid(&clipped, document, overlays.grid.size);
        }
        if overlays.show_symmetry_guides {
            self.paint_symmetry_guides(&clipped, document, overlays.symmetry);
        }
    }

    /// Paint a single path; `layer_opacity` multiplies the path's own opacity
    pub fn paint_path(&self, painter: &Painter, path: &Path, layer_opacity: f32) {
        let points: Vec<Pos2> = path
            .outline()
            .into_iter()
            .map(|p| self.view.canvas_to_screen(p))
            .collect();
        if points.is_empty() {
            return;
        }
        let style = &path.style;
        let opacity = layer_opacity.clamp(0.0, 1.0) * style.effective_opacity();

        if let Some(fill) = &style.fill {
            if path.is_closed() {
                let bounds = Rect::from_points(&points);
                let mesh = match fill {
                    Fill::Solid(color) => solid_fan_mesh(&points, bounds.center(), with_opacity(*color, opacity)),
                    Fill::Gradient(gradient) => gradient.fill_polygon_mesh(&points, bounds, opacity),
                };
                painter.add(Shape::mesh(mesh));
            }
        }

        let width = self.view.scale(style.effective_width());
        let color = with_opacity(style.color, opacity);

        if points.len() == 1 {
            painter.circle_filled(points[0], width / 2.0, color);
            return;
        }

        if style.brush == BrushKind::Calligraphy {
            for segment in points.windows(2) {
                let nib = BrushKind::nib_width(width, segment[1] - segment[0]);
                painter.line_segment([segment[0], segment[1]], Stroke::new(nib, color));
            }
            return;
        }

        for pass in style.brush.passes() {
            let stroke = Stroke::new(width * pass, color);
            if path.is_closed() {
                painter.add(Shape::closed_line(points.clone(), stroke));
            } else {
                painter.add(Shape::line(points.clone(), stroke));
            }
        }

        // Round caps for opaque open strokes; translucent ones would double up
        if !path.is_closed() && color.is_opaque() && width > 2.0 {
            for end in [points[0], points[points.len() - 1]] {
                painter.circle_filled(end, width / 2.0, color);
            }
        }
    }

    /// Paint tool previews over the document
    pub fn paint_preview(&self, painter: &Painter, paths: &[Path]) {
        for path in paths {
            self.paint_path(painter, path, 1.0);
        }
    }

    /// Circle showing the lazy brush string, plus the string itself
    pub fn paint_lazy_brush(&self, painter: &Painter, pointer: Pos2, brush: Pos2, radius: f32) {
        let pointer = self.view.canvas_to_screen(pointer);
        let brush = self.view.canvas_to_screen(brush);
        let stroke = Stroke::new(1.0, GUIDE_COLOR);
        painter.circle_stroke(brush, self.view.scale(radius), stroke);
        painter.line_segment([brush, pointer], stroke);
        painter.circle_filled(brush, 2.5, GUIDE_COLOR);
    }

    pub fn paint_grid(&self, painter: &Painter, document: &Document, size: f32) {
        if size <= 0.0 || self.view.scale(size) < MIN_GRID_SPACING_PX {
            return;
        }
        let canvas = document.canvas_rect();
        let stroke = Stroke::new(1.0, GRID_COLOR);

        let mut x = 0.0;
        while x <= canvas.max.x {
            let top = self.view.canvas_to_screen(Pos2::new(x, canvas.min.y));
            let bottom = self.view.canvas_to_screen(Pos2::new(x, canvas.max.y));
            painter.line_segment([top, bottom], stroke);
            x += size;
        }
        let mut y = 0.0;
        while y <= canvas.max.y {
            let left = self.view.canvas_to_screen(Pos2::new(canvas.min.x, y));
            let right = self.view.canvas_to_screen(Pos2::new(canvas.max.x, y));
            painter.line_segment([left, right], stroke);
            y += size;
        }
    }

    pub fn paint_symmetry_guides(&self, painter: &Painter, document: &Document, mode: SymmetryMode) {
        let stroke = Stroke::new(1.0, GUIDE_COLOR);
        for (start, end) in mode.guides(document.center(), document.canvas_size / 2.0) {
            painter.line_segment(
                [self.view.canvas_to_screen(start), self.view.canvas_to_screen(end)],
                stroke,
            );
        }
    }
}

/// Fan-triangulated single color mesh around `center`
fn solid_fan_mesh(points: &[Pos2], center: Pos2, color: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    if points.len() < 3 {
        return mesh;
    }
    mesh.colored_vertex(center, color);
    for &point in points {
        mesh.colored_vertex(point, color);
    }
    let n = points.len() as u32;
    for i in 0..n {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{PathShape, PathStyle};
    use egui::{pos2, vec2};

    fn test_painter() -> Painter {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0));
        Painter::new(ctx, egui::LayerId::background(), rect)
    }

    #[test]
    fn test_render_basics() {
        let mut document = Document::new(vec2(400.0, 300.0));
        let layer = document.active_layer_id();
        let stroke = Path::new(
            PathShape::Freehand(vec![pos2(10.0, 10.0), pos2(50.0, 40.0)]),
            PathStyle::default(),
        );
        document.add_path(layer, stroke).unwrap();
        let mut filled = Path::new(PathShape::rectangle(pos2(60.0, 60.0), pos2(120.0, 90.0)), PathStyle::default());
        filled.style.fill = Some(Fill::Solid(Color32::LIGHT_BLUE));
        document.add_path(layer, filled).unwrap();

        let overlays = Overlays {
            grid: GridSettings { visible: true, ..Default::default() },
            symmetry: SymmetryMode::Quad,
            show_symmetry_guides: true,
        };
        Renderer::new(ViewTransform::default()).render(&test_painter(), &document, &overlays);
    }

    #[test]
    fn solid_fan_covers_every_edge() {
        let square = [pos2(0.0, 0.0), pos2(1.0, 0.0), pos2(1.0, 1.0), pos2(0.0, 1.0)];
        let mesh = solid_fan_mesh(&square, pos2(0.5, 0.5), Color32::RED);
        assert_eq!(mesh.vertices.len(), 5);
        assert_eq!(mesh.indices.len(), 12);
        assert!(solid_fan_mesh(&square[..2], pos2(0.5, 0.5), Color32::RED).is_empty());
    }
}
