use egui::{Color32, Sense};

use crate::MindfulCanvasApp;
use crate::color::{hsl_to_rgb, parse_hex, rgb_to_hsl, Harmony, Hsl, CALMING_PALETTES};
use crate::components::Swatch;
use crate::gradient::{presets, Gradient, GradientKind};

pub fn colors_panel(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    stroke_color_section(app, ui);
    ui.separator();
    harmony_section(app, ui);
    ui.separator();
    palette_section(app, ui);
    ui.separator();
    fill_section(app, ui);
}

fn stroke_color_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Stroke color");
    let mut color = app.settings.style.color;
    ui.horizontal(|ui| {
        if ui.color_edit_button_srgba(&mut color).changed() {
            app.set_color(color);
        }
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.colors.hex_input)
                .desired_width(80.0)
                .font(egui::TextStyle::Monospace),
        );
        if response.lost_focus() {
            match parse_hex(&app.colors.hex_input) {
                Some(parsed) => app.set_color(parsed),
                None => {
                    let input = app.colors.hex_input.clone();
                    app.set_color(app.settings.style.color);
                    app.notify(format!("\"{input}\" is not a hex color"));
                }
            }
        }
    });

    let hsl = rgb_to_hsl(app.settings.style.color);
    let (mut h, mut s, mut l) = (hsl.h, hsl.s, hsl.l);
    let mut changed = false;
    changed |= ui.add(egui::Slider::new(&mut h, 0.0..=359.0).text("Hue")).changed();
    changed |= ui.add(egui::Slider::new(&mut s, 0.0..=100.0).text("Saturation")).changed();
    changed |= ui.add(egui::Slider::new(&mut l, 0.0..=100.0).text("Lightness")).changed();
    if changed {
        app.set_color(hsl_to_rgb(Hsl::new(h, s, l)));
    }
}

fn harmony_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Harmony");
    egui::ComboBox::from_id_salt("harmony")
        .selected_text(app.colors.harmony.label())
        .show_ui(ui, |ui| {
            for harmony in Harmony::ALL {
                ui.selectable_value(&mut app.colors.harmony, harmony, harmony.label());
            }
        });
    let current = app.settings.style.color;
    ui.horizontal_wrapped(|ui| {
        for color in app.colors.harmony.colors(current) {
            if Swatch::new(color).size(28.0).selected(color == current).show(ui).clicked() {
                app.set_color(color);
            }
        }
    });
}

fn palette_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Calming palettes");
    let current = app.settings.style.color;
    for palette in CALMING_PALETTES {
        ui.label(palette.name);
        ui.horizontal(|ui| {
            for color in palette.swatches() {
                if Swatch::new(color).selected(color == current).show(ui).clicked() {
                    app.set_color(color);
                }
            }
        });
    }
}

fn fill_section(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.strong("Fill");
    ui.horizontal(|ui| {
        ui.radio_value(&mut app.colors.use_gradient, false, "Solid");
        ui.radio_value(&mut app.colors.use_gradient, true, "Gradient");
    });
    if !app.colors.use_gradient {
        ui.horizontal(|ui| {
            ui.color_edit_button_srgba(&mut app.colors.fill_color);
            if ui.button("Use stroke color").clicked() {
                app.colors.fill_color = app.settings.style.color;
            }
        });
        return;
    }

    ui.horizontal_wrapped(|ui| {
        for preset in presets() {
            if ui.button(&preset.name).clicked() {
                app.colors.gradient = preset;
            }
        }
    });
    gradient_editor(&mut app.colors.gradient, ui);

    ui.horizontal(|ui| {
        ui.label("Name");
        ui.text_edit_singleline(&mut app.colors.gradient.name);
    });
    if ui.button("Save gradient").clicked() {
        let gradient = app.colors.gradient.clone();
        let name = gradient.name.clone();
        match app.colors.custom_gradients.iter_mut().find(|g| g.name == gradient.name) {
            Some(existing) => *existing = gradient,
            None => app.colors.custom_gradients.push(gradient),
        }
        app.notify(format!("Saved gradient \"{name}\""));
    }

    if !app.colors.custom_gradients.is_empty() {
        ui.label("Saved gradients");
        let mut remove = None;
        for (index, gradient) in app.colors.custom_gradients.iter().enumerate() {
            ui.horizontal(|ui| {
                gradient_preview(gradient, ui, egui::vec2(60.0, 16.0));
                if ui.button(&gradient.name).clicked() {
                    app.colors.gradient = gradient.clone();
                }
                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                    remove = Some(index);
                }
            });
        }
        if let Some(index) = remove {
            app.colors.custom_gradients.remove(index);
        }
    }
}

fn gradient_preview(gradient: &Gradient, ui: &mut egui::Ui, size: egui::Vec2) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    if ui.is_rect_visible(rect) {
        ui.painter().add(egui::Shape::mesh(gradient.to_mesh(rect, 1.0)));
    }
    response.on_hover_text(gradient.to_css())
}

fn gradient_editor(gradient: &mut Gradient, ui: &mut egui::Ui) {
    gradient_preview(gradient, ui, egui::vec2(ui.available_width().min(240.0), 40.0));

    let linear = matches!(gradient.kind, GradientKind::Linear { .. });
    ui.horizontal(|ui| {
        if ui.radio(linear, "Linear").clicked() && !linear {
            gradient.kind = GradientKind::Linear { angle_deg: 90.0 };
        }
        if ui.radio(!linear, "Radial").clicked() && linear {
            gradient.kind = GradientKind::Radial { center: (50.0, 50.0) };
        }
    });
    match &mut gradient.kind {
        GradientKind::Linear { angle_deg } => {
            ui.add(egui::Slider::new(angle_deg, 0.0..=360.0).text("Angle").suffix("°"));
        }
        GradientKind::Radial { center } => {
            ui.add(egui::Slider::new(&mut center.0, 0.0..=100.0).text("Center X").suffix("%"));
            ui.add(egui::Slider::new(&mut center.1, 0.0..=100.0).text("Center Y").suffix("%"));
        }
    }

    let mut remove = None;
    let mut moved = None;
    let mut recolored = None;
    let can_remove = gradient.stops().len() > crate::gradient::MIN_STOPS;
    for (index, stop) in gradient.stops().iter().enumerate() {
        ui.horizontal(|ui| {
            let mut color = stop.color;
            if ui.color_edit_button_srgba(&mut color).changed() {
                recolored = Some((index, color));
            }
            let mut position = stop.position;
            if ui.add(egui::Slider::new(&mut position, 0.0..=100.0).suffix("%")).changed() {
                moved = Some((index, position));
            }
            if ui.add_enabled(can_remove, egui::Button::new("✖").small()).clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some((index, color)) = recolored {
        gradient.set_stop_color(index, color);
    }
    if let Some((index, position)) = moved {
        gradient.set_stop_position(index, position);
    }
    if let Some(index) = remove {
        gradient.remove_stop(index);
    }
    if ui.button("Add stop").clicked() {
        // New stop in the middle, colored to match
        let color: Color32 = gradient.sample(0.5);
        gradient.add_stop(color, 50.0);
    }
    ui.label(egui::RichText::new(gradient.to_css()).monospace().small());
}
