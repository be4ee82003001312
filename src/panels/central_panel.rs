use egui::{CursorIcon, PointerButton, Pos2, Sense, Stroke};

use crate::MindfulCanvasApp;
use crate::document::Document;
use crate::geometry::SymmetryMode;
use crate::path::{Fill, PathStyle};
use crate::settings::Settings;
use crate::input::{consume_shortcuts, is_constrained, Gesture};
use crate::renderer::{Overlays, Renderer};
use crate::tools::{Tool, ToolContext, ToolKind, ToolType};

pub fn central_panel(app: &mut MindfulCanvasApp, ctx: &egui::Context) {
    let frame = egui::Frame::none().fill(ctx.style().visuals.extreme_bg_color);
    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let viewport = response.rect;
        app.viewport = Some(viewport);

        if app.needs_view_reset {
            app.view.fit(app.document.canvas_size, viewport);
            if let Some(zoom) = app.stored_zoom.take() {
                app.view.set_zoom(viewport.center(), zoom);
            }
            app.needs_view_reset = false;
        }

        for action in consume_shortcuts(ctx) {
            app.apply_shortcut(action, viewport);
        }

        let multi_touch = handle_touch(app, ctx, viewport);
        handle_view_input(app, ctx, &response);
        if multi_touch {
            // A second finger turns a stroke into a gesture; drop the stroke
            app.tool.deactivate();
        } else {
            handle_pointer(app, ctx, &response);
        }

        let renderer = Renderer::new(app.view);
        let overlays = Overlays {
            grid: app.settings.grid,
            symmetry: app.settings.symmetry,
            show_symmetry_guides: app.settings.show_symmetry_guides
                && app.settings.symmetry != SymmetryMode::None,
        };
        renderer.render(&painter, &app.document, &overlays);

        let canvas = app.view.canvas_rect_to_screen(app.document.canvas_rect());
        let clipped = painter.with_clip_rect(canvas.intersect(viewport));
        let style = app.drawing_style();
        let fill = app.current_fill();
        let tool_ctx = tool_context(&app.document, &app.settings, &style, &fill, false);
        renderer.paint_preview(&clipped, &app.tool.preview(&tool_ctx));

        if let ToolType::Brush(brush) = &app.tool {
            if let Some((pointer, tip, radius)) = brush.lazy_state() {
                renderer.paint_lazy_brush(&painter, pointer, tip, radius);
            }
        }

        if let Some(hover) = response.hover_pos() {
            match app.tool.kind() {
                ToolKind::Eraser => {
                    let radius = app.view.scale(app.settings.style.width / 2.0);
                    painter.circle_stroke(hover, radius, Stroke::new(1.0, ui.visuals().text_color()));
                    ctx.set_cursor_icon(CursorIcon::None);
                }
                ToolKind::Eyedropper | ToolKind::Fill => ctx.set_cursor_icon(CursorIcon::PointingHand),
                _ => ctx.set_cursor_icon(CursorIcon::Crosshair),
            }
        }
    });
}

fn tool_context<'a>(
    document: &'a Document,
    settings: &Settings,
    style: &'a PathStyle,
    fill: &'a Fill,
    constrain: bool,
) -> ToolContext<'a> {
    ToolContext {
        document,
        style,
        fill,
        symmetry: settings.symmetry,
        grid: settings.grid,
        lazy_brush: settings.lazy_brush,
        constrain,
    }
}

/// Feed touch events to the gesture recognizer. Returns true while more
/// than one finger is down or a gesture is in progress.
fn handle_touch(app: &mut MindfulCanvasApp, ctx: &egui::Context, viewport: egui::Rect) -> bool {
    app.touches.begin_frame(ctx);
    let now = ctx.input(|i| i.time);
    for gesture in app.gestures.update(&app.touches, now) {
        match gesture {
            Gesture::Pinch { center, scale } => app.view.zoom_at(center, scale),
            Gesture::Pan { delta } => app.view.pan_by(delta),
            Gesture::Tap { count: 2, .. } => app.view.fit(app.document.canvas_size, viewport),
            Gesture::Tap { .. } => {}
        }
    }
    app.touches.count() > 1 || app.gestures.is_engaged()
}

/// Wheel and trackpad zoom/scroll, middle-button pan
fn handle_view_input(app: &mut MindfulCanvasApp, ctx: &egui::Context, response: &egui::Response) {
    if let Some(hover) = response.hover_pos() {
        let (zoom, scroll) = ctx.input(|i| (i.zoom_delta(), i.smooth_scroll_delta));
        if zoom != 1.0 {
            app.view.zoom_at(hover, zoom);
        } else if scroll != egui::Vec2::ZERO {
            app.view.pan_by(scroll);
        }
    }
    if response.dragged_by(PointerButton::Middle) {
        app.view.pan_by(response.drag_delta());
    }
}

fn handle_pointer(app: &mut MindfulCanvasApp, ctx: &egui::Context, response: &egui::Response) {
    let (constrain, press_origin) = ctx.input(|i| (is_constrained(&i.modifiers), i.pointer.press_origin()));
    let to_canvas = |pos: Pos2| app.view.screen_to_canvas(pos);

    let mut events: Vec<(PointerEvent, Pos2)> = Vec::new();
    if response.clicked_by(PointerButton::Primary) {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push((PointerEvent::Down, to_canvas(pos)));
            events.push((PointerEvent::Up, to_canvas(pos)));
        }
    } else {
        if response.drag_started_by(PointerButton::Primary) {
            if let Some(origin) = press_origin.or(response.interact_pointer_pos()) {
                events.push((PointerEvent::Down, to_canvas(origin)));
            }
        }
        if response.dragged_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push((PointerEvent::Move, to_canvas(pos)));
            }
        }
        if response.drag_stopped_by(PointerButton::Primary) {
            let pos = response
                .interact_pointer_pos()
                .or(response.hover_pos())
                .map(to_canvas);
            if let Some(pos) = pos {
                events.push((PointerEvent::Up, pos));
            }
        }
    }

    if events.is_empty() {
        return;
    }
    let style = app.drawing_style();
    let fill = app.current_fill();
    for (event, pos) in events {
        let tool_ctx = tool_context(&app.document, &app.settings, &style, &fill, constrain);
        let action = match event {
            PointerEvent::Down => app.tool.on_pointer_down(pos, &tool_ctx),
            PointerEvent::Move => app.tool.on_pointer_move(pos, &tool_ctx),
            PointerEvent::Up => app.tool.on_pointer_up(pos, &tool_ctx),
        };
        // Commands from one event must land before the next event hit-tests
        app.handle_tool_action(action);
    }
}

#[derive(Debug, Clone, Copy)]
enum PointerEvent {
    Down,
    Move,
    Up,
}
