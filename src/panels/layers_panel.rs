use crate::MindfulCanvasApp;
use crate::command::Command;
use crate::layer::LayerId;

/// In-progress edits in the layers panel
#[derive(Debug, Clone, Default)]
pub struct LayersUiState {
    /// Layer being renamed and the text typed so far
    pub renaming: Option<(LayerId, String)>,
    /// Opacity of the active layer before the current slider drag
    pub opacity_before: Option<(LayerId, f32)>,
}

pub fn layers_panel(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    ui.horizontal_wrapped(|ui| {
        if ui.button("➕ New").clicked() {
            let name = app.document.next_layer_name();
            let command = Command::add_layer(&app.document, &name);
            app.execute(command);
        }
        let active = app.document.active_layer_id();
        if ui.button("⎘ Duplicate").clicked() {
            match Command::duplicate_layer(&app.document, active) {
                Ok(command) => app.execute(command),
                Err(err) => app.notify(err.to_string()),
            }
        }
        let can_delete = app.document.layer_count() > 1;
        if ui.add_enabled(can_delete, egui::Button::new("🗑 Delete")).clicked() {
            match Command::delete_layer(&app.document, active) {
                Ok(command) => app.execute(command),
                Err(err) => app.notify(err.to_string()),
            }
        }
    });
    ui.separator();

    // Top layer first, like a stack of paper
    let count = app.document.layer_count();
    let active = app.document.active_layer_id();
    let mut pending: Option<Command> = None;
    let mut activate = None;

    for index in (0..count).rev() {
        let layer = &app.document.layers()[index];
        let id = layer.id;
        ui.horizontal(|ui| {
            let eye = if layer.visible { "👁" } else { "◌" };
            if ui.small_button(eye).on_hover_text("Show / hide").clicked() {
                pending = Some(Command::SetLayerVisibility {
                    layer: id,
                    old: layer.visible,
                    new: !layer.visible,
                });
            }
            let lock = if layer.locked { "🔒" } else { "🔓" };
            if ui.small_button(lock).on_hover_text("Lock / unlock").clicked() {
                pending = Some(Command::SetLayerLocked {
                    layer: id,
                    old: layer.locked,
                    new: !layer.locked,
                });
            }

            let renaming = app.layers_ui.renaming.as_mut().filter(|(layer_id, _)| *layer_id == id);
            if let Some((_, text)) = renaming {
                let response = ui.text_edit_singleline(text);
                if response.lost_focus() {
                    let new_name = text.trim().to_owned();
                    if !new_name.is_empty() && new_name != layer.name {
                        pending = Command::rename_layer(&app.document, id, &new_name).ok();
                    }
                    app.layers_ui.renaming = None;
                } else {
                    response.request_focus();
                }
            } else {
                let label = format!("{} ({})", layer.name, layer.paths.len());
                let response = ui.selectable_label(id == active, label);
                if response.clicked() {
                    activate = Some(id);
                }
                if response.double_clicked() {
                    app.layers_ui.renaming = Some((id, layer.name.clone()));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add_enabled(index > 0, egui::Button::new("⏷").small()).clicked() {
                    pending = Some(Command::MoveLayer { from: index, to: index - 1 });
                }
                if ui.add_enabled(index + 1 < count, egui::Button::new("⏶").small()).clicked() {
                    pending = Some(Command::MoveLayer { from: index, to: index + 1 });
                }
            });
        });
    }

    if let Some(id) = activate {
        if let Err(err) = app.document.set_active(id) {
            app.notify(err.to_string());
        }
    }
    if let Some(command) = pending {
        app.execute(command);
    }

    ui.separator();
    active_layer_details(app, ui);
}

fn active_layer_details(app: &mut MindfulCanvasApp, ui: &mut egui::Ui) {
    let layer = app.document.active_layer();
    let id = layer.id;
    ui.strong(format!("Active: {}", layer.name));
    let mut opacity = layer.opacity();
    let path_count = layer.paths.len();

    let response = ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"));
    if response.drag_started() || (response.changed() && app.layers_ui.opacity_before.is_none()) {
        app.layers_ui.opacity_before = Some((id, app.document.active_layer().opacity()));
    }
    if response.changed() {
        // Live preview; the undoable command is recorded when the drag ends
        if let Err(err) = app.document.set_opacity(id, opacity) {
            app.notify(err.to_string());
        }
    }
    if !response.dragged() {
        if let Some((layer, old)) = app.layers_ui.opacity_before.take() {
            let new = app.document.layer(layer).map(|l| l.opacity()).unwrap_or(old);
            if (new - old).abs() > f32::EPSILON {
                // Put the old value back so the command applies the change itself
                let _ = app.document.set_opacity(layer, old);
                app.execute(Command::SetLayerOpacity { layer, old, new });
            }
        }
    }

    ui.horizontal(|ui| {
        if ui.add_enabled(path_count > 0, egui::Button::new("Clear layer")).clicked() {
            match Command::clear_layer(&app.document, id) {
                Ok(command) => app.execute(command),
                Err(err) => app.notify(err.to_string()),
            }
        }
        if ui.button("Rename").clicked() {
            let name = app.document.active_layer().name.clone();
            app.layers_ui.renaming = Some((id, name));
        }
    });
}
