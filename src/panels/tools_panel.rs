use crate::MindfulCanvasApp;
use crate::components::ToolButton;
use crate::geometry::symmetry::MAX_RADIAL_SEGMENTS;
use crate::geometry::SymmetryMode;
use crate::path::BrushKind;
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut MindfulCanvasApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(210.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Tools");

                let active = app.tool.kind();
                ui.horizontal_wrapped(|ui| {
                    for kind in ToolKind::ALL {
                        if ToolButton::new(kind, active == kind).show(ui).clicked() {
                            app.select_tool(kind);
                        }
                    }
                });
                ui.separator();

                brush_section(app, ui);
                ui.separator();
                symmetry_section(app, ui);
                ui.separator();
                assist_section(app, ui);
                ui.separator();
                history_section(app, ui);
            });
        });
}

fn brush_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Brush");
    let style = &mut app.settings.style;
    egui::ComboBox::from_id_salt("brush_kind")
        .selected_text(style.brush.label())
        .show_ui(ui, |ui| {
            for kind in BrushKind::ALL {
                ui.selectable_value(&mut style.brush, kind, kind.label());
            }
        });
    ui.add(egui::Slider::new(&mut style.width, 1.0..=80.0).text("Size"));
    ui.add(egui::Slider::new(&mut style.opacity, 0.05..=1.0).text("Opacity"));
    ui.checkbox(&mut app.colors.fill_shapes, "Fill shapes");
}

fn symmetry_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Symmetry");
    let symmetry = &mut app.settings.symmetry;
    ui.horizontal_wrapped(|ui| {
        ui.selectable_value(symmetry, SymmetryMode::None, "Off");
        ui.selectable_value(symmetry, SymmetryMode::Horizontal, "↔");
        ui.selectable_value(symmetry, SymmetryMode::Vertical, "↕");
        ui.selectable_value(symmetry, SymmetryMode::Quad, "✚");
        let radial = matches!(symmetry, SymmetryMode::Radial(_));
        if ui.selectable_label(radial, "✺").clicked() && !radial {
            *symmetry = SymmetryMode::radial(6);
        }
    });
    if let SymmetryMode::Radial(segments) = symmetry {
        let mut count = *segments;
        ui.add(egui::Slider::new(&mut count, 2..=MAX_RADIAL_SEGMENTS).text("Segments"));
        *symmetry = SymmetryMode::radial(count);
    }
    ui.add_enabled(
        *symmetry != SymmetryMode::None,
        egui::Checkbox::new(&mut app.settings.show_symmetry_guides, "Show guides"),
    );
}

fn assist_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Assist");
    let lazy = &mut app.settings.lazy_brush;
    ui.checkbox(&mut lazy.enabled, "Lazy brush");
    ui.add_enabled_ui(lazy.enabled, |ui| {
        ui.add(egui::Slider::new(&mut lazy.radius, 0.0..=100.0).text("Radius"));
        ui.add(egui::Slider::new(&mut lazy.friction, 0.0..=0.95).text("Friction"));
    });

    let grid = &mut app.settings.grid;
    ui.checkbox(&mut grid.visible, "Show grid");
    ui.checkbox(&mut grid.snap, "Snap to grid");
    ui.add(egui::Slider::new(&mut grid.size, 5.0..=100.0).text("Grid size"));
}

fn history_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        if ui.add_enabled(app.history.can_undo(), egui::Button::new("Undo")).clicked() {
            app.undo();
        }
        if ui.add_enabled(app.history.can_redo(), egui::Button::new("Redo")).clicked() {
            app.redo();
        }
    });

    let undo = app.history.undo_labels();
    let redo = app.history.redo_labels();
    egui::CollapsingHeader::new(format!("History ({} / {})", undo.len(), redo.len()))
        .default_open(false)
        .show(ui, |ui| {
            egui::Grid::new("command_history_grid")
                .num_columns(2)
                .spacing([24.0, 4.0])
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("Undo");
                    ui.strong("Redo");
                    ui.end_row();

                    // Most recent first in both columns
                    for i in 0..undo.len().max(redo.len()) {
                        ui.label(undo.iter().rev().nth(i).map_or("", String::as_str));
                        ui.label(redo.get(i).map_or("", String::as_str));
                        ui.end_row();
                    }
                });
        });
}
