use egui::Color32;

use crate::MindfulCanvasApp;
use crate::command::Command;
use crate::components::Swatch;
use crate::export::{export_to_file, ExportFormat};
use crate::settings::{MAX_CANVAS_SIDE, MIN_CANVAS_SIDE};
use crate::view::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

const BACKGROUNDS: &[(&str, Color32)] = &[
    ("Paper", Color32::from_rgb(0xfd, 0xfb, 0xf7)),
    ("White", Color32::WHITE),
    ("Sand", Color32::from_rgb(0xf5, 0xe6, 0xca)),
    ("Mist", Color32::from_rgb(0xe3, 0xf2, 0xfd)),
    ("Sage", Color32::from_rgb(0xe8, 0xf5, 0xe9)),
    ("Night", Color32::from_rgb(0x1f, 0x23, 0x33)),
];

pub fn canvas_settings_panel(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    size_section(app, ui);
    ui.separator();
    background_section(app, ui);
    ui.separator();
    view_section(app, ui);
    ui.separator();
    export_section(app, ui);
}

fn size_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Canvas size");
    let size = &mut app.settings.canvas_size;
    ui.horizontal(|ui| {
        ui.add(egui::DragValue::new(&mut size.x).range(MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE).suffix(" px"));
        ui.label("×");
        ui.add(egui::DragValue::new(&mut size.y).range(MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE).suffix(" px"));
    });
    ui.horizontal(|ui| {
        if ui.button("New canvas").on_hover_text("Clears the drawing and its history").clicked() {
            app.new_canvas();
        }
        if ui.button("Resize current").clicked() {
            app.document.canvas_size = app.settings.canvas_size;
            app.needs_view_reset = true;
        }
    });
    ui.label(format!(
        "{} layer(s), {} path(s)",
        app.document.layer_count(),
        app.document.path_count()
    ));
}

fn background_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Background");
    let current = app.document.background;
    let mut chosen = None;
    ui.horizontal_wrapped(|ui| {
        for (name, color) in BACKGROUNDS {
            let response = Swatch::new(*color).size(26.0).selected(*color == current).show(ui);
            if response.on_hover_text(*name).clicked() {
                chosen = Some(*color);
            }
        }
    });
    if ui.button("Use stroke color").clicked() {
        chosen = Some(app.settings.style.color);
    }
    if let Some(new) = chosen.filter(|new| *new != current) {
        app.settings.background = new;
        app.execute(Command::SetBackground { old: current, new });
    }
}

fn view_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("View");
    let Some(viewport) = app.viewport else {
        return;
    };
    ui.horizontal(|ui| {
        if ui.add_enabled(app.view.zoom() > MIN_ZOOM, egui::Button::new("−")).clicked() {
            app.view.zoom_at(viewport.center(), 1.0 / ZOOM_STEP);
        }
        ui.label(format!("{:.0}%", app.view.zoom() * 100.0));
        if ui.add_enabled(app.view.zoom() < MAX_ZOOM, egui::Button::new("+")).clicked() {
            app.view.zoom_at(viewport.center(), ZOOM_STEP);
        }
        if ui.button("Fit").clicked() {
            app.view.fit(app.document.canvas_size, viewport);
        }
        if ui.button("100%").clicked() {
            app.view.reset(app.document.canvas_size, viewport);
        }
    });
}

fn export_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Export");
    ui.horizontal(|ui| {
        for format in ExportFormat::ALL {
            ui.radio_value(&mut app.settings.export_format, format, format.label());
        }
    });

    let mut dir = app.settings.export_dir.display().to_string();
    ui.horizontal(|ui| {
        ui.label("Folder");
        if ui.text_edit_singleline(&mut dir).changed() {
            app.settings.export_dir = dir.into();
        }
    });

    if ui.button("💾 Export").clicked() {
        match export_to_file(&app.document, app.settings.export_format, &app.settings.export_dir) {
            Ok(path) => app.notify(format!("Saved {}", path.display())),
            Err(err) => {
                log::warn!("Export failed: {err}");
                app.notify(format!("Export failed: {err}"));
            }
        }
    }
}
