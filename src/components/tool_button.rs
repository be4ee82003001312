use eframe::egui;
use crate::tools::ToolKind;

const SELECTED_FILL: egui::Color32 = egui::Color32::from_rgb(178, 223, 219);
const SELECTED_BORDER: egui::Color32 = egui::Color32::from_rgb(0, 137, 123);

pub struct ToolButton {
    pub tool: ToolKind,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(tool: ToolKind, selected: bool) -> Self {
        Self { tool, selected }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(36.0, 36.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let visuals = ui.style().interact(&response);
            let bg_color = if self.selected {
                SELECTED_FILL
            } else if response.hovered() {
                visuals.bg_fill
            } else {
                ui.visuals().faint_bg_color
            };
            ui.painter().rect_filled(rect, 6.0, bg_color);

            let text_color = if self.selected {
                egui::Color32::BLACK
            } else {
                visuals.text_color()
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon(),
                egui::FontId::proportional(20.0),
                text_color,
            );

            if self.selected {
                ui.painter().rect_stroke(rect, 6.0, egui::Stroke::new(2.0, SELECTED_BORDER));
            }
        }

        response.on_hover_text(self.tool.label())
    }
}
