use eframe::egui;

use crate::color::{contrast_text, to_hex};

/// Clickable color square; the hover text shows its hex code
pub struct Swatch {
    pub color: egui::Color32,
    pub selected: bool,
    pub size: f32,
}

impl Swatch {
    pub fn new(color: egui::Color32) -> Self {
        Self {
            color,
            selected: false,
            size: 22.0,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(egui::vec2(self.size, self.size), egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, 4.0, self.color);
            let border = if self.selected || response.hovered() {
                egui::Stroke::new(2.0, contrast_text(self.color))
            } else {
                egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
            };
            painter.rect_stroke(rect, 4.0, border);
        }

        response.on_hover_text(to_hex(self.color))
    }
}
