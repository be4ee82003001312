use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;
/// Multiplier applied per zoom-in / zoom-out button press
pub const ZOOM_STEP: f32 = 1.2;

/// Maps canvas coordinates to screen coordinates:
/// `screen = canvas * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    zoom: f32,
    pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() { 1.0 } else { zoom.clamp(MIN_ZOOM, MAX_ZOOM) }
}

impl ViewTransform {
    pub fn new(zoom: f32, pan: Vec2) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn canvas_to_screen(&self, canvas: Pos2) -> Pos2 {
        (canvas.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    pub fn screen_to_canvas(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    pub fn canvas_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.canvas_to_screen(rect.min), self.canvas_to_screen(rect.max))
    }

    /// Scale lengths (stroke widths, radii) into screen space
    pub fn scale(&self, length: f32) -> f32 {
        length * self.zoom
    }

    /// Zoom by `factor`, keeping the canvas point under `screen_anchor` fixed.
    pub fn zoom_at(&mut self, screen_anchor: Pos2, factor: f32) {
        let anchored = self.screen_to_canvas(screen_anchor);
        self.zoom = clamp_zoom(self.zoom * factor);
        self.pan = screen_anchor.to_vec2() - anchored.to_vec2() * self.zoom;
    }

    /// Set an absolute zoom level around `screen_anchor`.
    pub fn set_zoom(&mut self, screen_anchor: Pos2, zoom: f32) {
        let factor = clamp_zoom(zoom) / self.zoom;
        self.zoom_at(screen_anchor, factor);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Center the canvas in `viewport` at the current zoom.
    pub fn center_in(&mut self, canvas_size: Vec2, viewport: Rect) {
        self.pan = viewport.center().to_vec2() - canvas_size * self.zoom / 2.0;
    }

    /// Zoom so the whole canvas fits `viewport` with a small margin, and center it.
    pub fn fit(&mut self, canvas_size: Vec2, viewport: Rect) {
        const MARGIN: f32 = 0.95;
        if canvas_size.x <= 0.0 || canvas_size.y <= 0.0 {
            return;
        }
        let fit = (viewport.width() / canvas_size.x).min(viewport.height() / canvas_size.y) * MARGIN;
        self.zoom = clamp_zoom(fit);
        self.center_in(canvas_size, viewport);
    }

    pub fn reset(&mut self, canvas_size: Vec2, viewport: Rect) {
        self.zoom = 1.0;
        self.center_in(canvas_size, viewport);
    }
}
