use egui::Color32;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use crate::audio::AmbientAudio;
use crate::color::{to_hex, Harmony};
use crate::command::{Command, CommandHistory};
use crate::document::Document;
use crate::error::CommandError;
use crate::gradient::Gradient;
use crate::input::{GestureRecognizer, ShortcutAction, TouchTracker};
use crate::mood::{Mood, MoodJournal};
use crate::panels;
use crate::path::{Fill, PathStyle};
use crate::settings::Settings;
use crate::storage;
use crate::tools::{Tool, ToolAction, ToolKind, ToolType};
use crate::util::time::{current_time_secs, timestamp_secs};
use crate::view::{ViewTransform, ZOOM_STEP};
use crate::wellness::{BreakReminder, SessionClock};

const TOAST_SECS: f64 = 3.0;
const SNOOZE_SECS: f64 = 5.0 * 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SideTab {
    #[default]
    Colors,
    Layers,
    Wellness,
    Canvas,
}

/// Color picking and gradient editing state
#[derive(Debug, Clone)]
pub struct ColorState {
    pub hex_input: String,
    pub harmony: Harmony,
    /// Fill new closed shapes with the current fill
    pub fill_shapes: bool,
    /// Fill with the edited gradient instead of `fill_color`
    pub use_gradient: bool,
    pub fill_color: Color32,
    pub gradient: Gradient,
    pub custom_gradients: Vec<Gradient>,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            hex_input: to_hex(PathStyle::default().color),
            harmony: Harmony::Complementary,
            fill_shapes: false,
            use_gradient: false,
            fill_color: Color32::from_rgb(0xb3, 0xe5, 0xfc),
            gradient: Gradient::default(),
            custom_gradients: Vec::new(),
        }
    }
}

/// Timers and the mood check-in form
#[derive(Debug, Clone)]
pub struct WellnessState {
    pub clock: SessionClock,
    pub reminder: BreakReminder,
    /// When the current breathing exercise started
    pub breathing_since: Option<f64>,
    /// Session start, in epoch seconds, for before/after mood comparison
    pub session_start: u64,
    pub mood: Mood,
    pub mood_value: u8,
    pub mood_note: String,
    pub activities: String,
}

impl Default for WellnessState {
    fn default() -> Self {
        let now = current_time_secs();
        let mut clock = SessionClock::new();
        clock.start(now);
        Self {
            clock,
            reminder: BreakReminder::new(crate::wellness::DEFAULT_BREAK_INTERVAL_SECS, now),
            breathing_since: None,
            session_start: timestamp_secs(),
            mood: Mood::Calm,
            mood_value: Mood::Calm.default_value(),
            mood_note: String::new(),
            activities: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    until: f64,
}

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct MindfulCanvasApp {
    pub settings: Settings,
    pub document: Document,
    #[serde(skip)]
    pub history: CommandHistory,
    #[serde(skip)]
    pub view: ViewTransform,
    /// Fit the canvas into the viewport on the next frame
    #[serde(skip)]
    pub needs_view_reset: bool,
    #[serde(skip)]
    pub stored_zoom: Option<f32>,
    #[serde(skip)]
    pub tool: ToolType,
    #[serde(skip)]
    pub colors: ColorState,
    #[serde(skip)]
    pub moods: MoodJournal,
    #[serde(skip)]
    pub wellness: WellnessState,
    #[serde(skip)]
    pub audio: AmbientAudio,
    #[serde(skip)]
    pub touches: TouchTracker,
    #[serde(skip)]
    pub gestures: GestureRecognizer,
    #[serde(skip)]
    pub side_tab: SideTab,
    #[serde(skip)]
    pub layers_ui: panels::LayersUiState,
    /// Screen rect of the canvas area, from the last frame
    #[serde(skip)]
    pub viewport: Option<egui::Rect>,
    #[serde(skip)]
    toast: Option<Toast>,
    #[serde(skip)]
    failure: Option<String>,
}

impl Default for MindfulCanvasApp {
    fn default() -> Self {
        let settings = Settings::default();
        Self::from_parts(settings.clone(), Document::new(settings.canvas_size))
    }
}

impl MindfulCanvasApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let Some(storage) = cc.storage else {
            return Self::default();
        };
        let restored: Self = storage::load_app_state(storage, eframe::APP_KEY).unwrap_or_default();

        let mut app = Self::from_parts(restored.settings, restored.document);
        app.stored_zoom = storage::load_zoom(storage);
        app.colors.custom_gradients = storage::load_custom_gradients(storage);
        app.moods = storage::load_mood_history(storage);
        log::info!(
            "Restored {} layer(s), {} custom gradient(s), {} mood entries",
            app.document.layer_count(),
            app.colors.custom_gradients.len(),
            app.moods.len()
        );
        app
    }

    fn from_parts(mut settings: Settings, mut document: Document) -> Self {
        settings.sanitize();
        document.repair();
        let now = current_time_secs();

        let mut wellness = WellnessState::default();
        wellness.reminder = BreakReminder::new(settings.break_interval_secs, now);
        let mut colors = ColorState::default();
        colors.hex_input = to_hex(settings.style.color);

        Self {
            tool: settings.tool.new_instance(),
            audio: AmbientAudio::new(settings.soundscape, settings.audio_volume),
            settings,
            document,
            history: CommandHistory::new(),
            view: ViewTransform::default(),
            needs_view_reset: true,
            stored_zoom: None,
            colors,
            moods: MoodJournal::new(),
            wellness,
            touches: TouchTracker::new(),
            gestures: GestureRecognizer::new(),
            side_tab: SideTab::default(),
            layers_ui: panels::LayersUiState::default(),
            viewport: None,
            toast: None,
            failure: None,
        }
    }

    /// Execute a command through the history, reporting failures as a toast
    pub fn execute(&mut self, command: Command) {
        let label = command.label();
        if let Err(err) = self.history.execute(command, &mut self.document) {
            log::warn!("{label} failed: {err}");
            self.notify(err.to_string());
        }
    }

    pub fn undo(&mut self) {
        match self.history.undo(&mut self.document) {
            Ok(()) | Err(CommandError::NothingToUndo) => {}
            Err(err) => self.notify(format!("Undo failed: {err}")),
        }
    }

    pub fn redo(&mut self) {
        match self.history.redo(&mut self.document) {
            Ok(()) | Err(CommandError::NothingToRedo) => {}
            Err(err) => self.notify(format!("Redo failed: {err}")),
        }
    }

    pub fn select_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() == kind {
            return;
        }
        log::info!("Tool selected: {}", kind.label());
        self.tool.deactivate();
        self.tool = kind.new_instance();
        self.settings.tool = kind;
    }

    pub fn set_color(&mut self, color: Color32) {
        self.settings.style.color = color;
        self.colors.hex_input = to_hex(color);
    }

    /// What the fill tool pours and shapes are filled with
    pub fn current_fill(&self) -> Fill {
        if self.colors.use_gradient {
            Fill::Gradient(self.colors.gradient.clone())
        } else {
            Fill::Solid(self.colors.fill_color)
        }
    }

    /// The brush style, with the current fill attached when shapes are filled
    pub fn drawing_style(&self) -> PathStyle {
        let mut style = self.settings.style.clone();
        style.fill = self.colors.fill_shapes.then(|| self.current_fill());
        style
    }

    pub fn handle_tool_action(&mut self, action: ToolAction) {
        match action {
            ToolAction::None => {}
            ToolAction::Command(command) => self.execute(command),
            ToolAction::PickColor(color) => {
                self.set_color(color);
                self.notify(format!("Picked {}", to_hex(color)));
            }
            ToolAction::Blocked(reason) => self.notify(reason),
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            until: current_time_secs() + TOAST_SECS,
        });
    }

    pub fn apply_shortcut(&mut self, action: ShortcutAction, viewport: egui::Rect) {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::ZoomIn => self.view.zoom_at(viewport.center(), ZOOM_STEP),
            ShortcutAction::ZoomOut => self.view.zoom_at(viewport.center(), 1.0 / ZOOM_STEP),
            ShortcutAction::ResetView => self.view.fit(self.document.canvas_size, viewport),
            ShortcutAction::Brush => self.select_tool(ToolKind::Brush),
            ShortcutAction::Eraser => self.select_tool(ToolKind::Eraser),
            ShortcutAction::Line => self.select_tool(ToolKind::Line),
            ShortcutAction::Rectangle => self.select_tool(ToolKind::Rectangle),
            ShortcutAction::Ellipse => self.select_tool(ToolKind::Ellipse),
            ShortcutAction::ToggleGrid => self.settings.grid.visible = !self.settings.grid.visible,
        }
    }

    /// Replace the drawing with an empty canvas; history is cleared
    pub fn new_canvas(&mut self) {
        self.tool.deactivate();
        self.document = Document::new(self.settings.canvas_size);
        self.document.background = self.settings.background;
        self.history.clear();
        self.needs_view_reset = true;
        log::info!("Started a new canvas");
    }

    /// Rebuild everything from defaults after a crash, keeping the mood journal
    fn reload(&mut self) {
        log::warn!("Reloading app state after failure");
        let moods = std::mem::take(&mut self.moods);
        let custom_gradients = std::mem::take(&mut self.colors.custom_gradients);
        *self = Self::default();
        self.moods = moods;
        self.colors.custom_gradients = custom_gradients;
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🌿 Mindful Canvas");
                ui.separator();
                if ui.button("New").on_hover_text("Start an empty canvas").clicked() {
                    self.new_canvas();
                }
                ui.add_enabled_ui(self.history.can_undo(), |ui| {
                    if ui.button("⟲").on_hover_text("Undo (Ctrl+Z)").clicked() {
                        self.undo();
                    }
                });
                ui.add_enabled_ui(self.history.can_redo(), |ui| {
                    if ui.button("⟳").on_hover_text("Redo (Ctrl+Shift+Z)").clicked() {
                        self.redo();
                    }
                });
                ui.separator();
                ui.label(format!("Zoom {:.0}%", self.view.zoom() * 100.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let now = current_time_secs();
                    ui.label(format!("⏱ {}", self.wellness.clock.formatted(now)));
                    egui::widgets::global_theme_preference_switch(ui);
                });
            });
        });
    }

    fn side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("side_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.side_tab, SideTab::Colors, "🎨 Colors");
                    ui.selectable_value(&mut self.side_tab, SideTab::Layers, "📚 Layers");
                    ui.selectable_value(&mut self.side_tab, SideTab::Wellness, "🧘 Wellness");
                    ui.selectable_value(&mut self.side_tab, SideTab::Canvas, "🖼 Canvas");
                });
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| match self.side_tab {
                    SideTab::Colors => panels::colors_panel(self, ui),
                    SideTab::Layers => panels::layers_panel(self, ui),
                    SideTab::Wellness => panels::wellness_panel(self, ui),
                    SideTab::Canvas => panels::canvas_settings_panel(self, ui),
                });
            });
    }

    fn break_window(&mut self, ctx: &egui::Context, now: f64) {
        if !self.wellness.reminder.due(now) {
            return;
        }
        egui::Window::new("Time for a mindful break")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("You have been drawing for a while. Rest your eyes and take a few slow breaths.");
                ui.horizontal(|ui| {
                    if ui.button("Breathe with me").clicked() {
                        self.wellness.reminder.acknowledge(now);
                        self.wellness.breathing_since = Some(now);
                        self.side_tab = SideTab::Wellness;
                    }
                    if ui.button("Done").clicked() {
                        self.wellness.reminder.acknowledge(now);
                    }
                    if ui.button("Snooze 5 min").clicked() {
                        self.wellness.reminder.snooze(now, SNOOZE_SECS);
                    }
                });
            });
    }

    fn show_toast(&mut self, ctx: &egui::Context, now: f64) {
        if self.toast.as_ref().is_some_and(|toast| now >= toast.until) {
            self.toast = None;
        }
        let Some(toast) = &self.toast else {
            return;
        };
        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(&toast.message);
                });
            });
    }

    /// Everything drawn in a normal frame
    fn frame(&mut self, ctx: &egui::Context) {
        let now = current_time_secs();

        self.top_bar(ctx);
        panels::tools_panel(self, ctx);
        self.side_panel(ctx);
        panels::central_panel(self, ctx);
        self.break_window(ctx, now);
        self.show_toast(ctx, now);

        let repaint_in = if self.wellness.breathing_since.is_some() || self.tool.is_active() {
            Duration::from_millis(33)
        } else if self.toast.is_some() || self.wellness.clock.is_running() {
            Duration::from_millis(250)
        } else {
            Duration::from_secs(5)
        };
        ctx.request_repaint_after(repaint_in);
    }

    fn failure_screen(&mut self, ctx: &egui::Context) {
        let Some(message) = self.failure.clone() else {
            return;
        };
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading("Something went wrong");
                ui.label("The canvas hit an unexpected error. Your mood journal is kept.");
                ui.add_space(8.0);
                ui.code(&message);
                ui.add_space(16.0);
                if ui.button("Reload").clicked() {
                    self.reload();
                }
            });
        });
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_owned()
    }
}

impl eframe::App for MindfulCanvasApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
        storage::save_side_data(storage, &self.view, &self.colors.custom_gradients, &self.moods);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.failure.is_some() {
            self.failure_screen(ctx);
            return;
        }
        let result = catch_unwind(AssertUnwindSafe(|| self.frame(ctx)));
        if let Err(payload) = result {
            let message = panic_message(payload.as_ref());
            log::error!("Frame panicked: {message}");
            self.failure = Some(message);
            ctx.request_repaint();
        }
    }
}
