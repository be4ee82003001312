mod gestures;
mod state;

pub use gestures::{Gesture, GestureConfig, GestureRecognizer};
pub use state::{is_constrained, TouchPhase, TouchPoint, TouchTracker};

use egui::{Key, KeyboardShortcut, Modifiers};

/// App-wide keyboard actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ResetView,
    Brush,
    Eraser,
    Line,
    Rectangle,
    Ellipse,
    ToggleGrid,
}

const SHORTCUTS: &[(KeyboardShortcut, ShortcutAction)] = &[
    // Redo shortcuts come first so Ctrl+Shift+Z isn't eaten by Ctrl+Z
    (KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z), ShortcutAction::Redo),
    (KeyboardShortcut::new(Modifiers::COMMAND, Key::Y), ShortcutAction::Redo),
    (KeyboardShortcut::new(Modifiers::COMMAND, Key::Z), ShortcutAction::Undo),
    (KeyboardShortcut::new(Modifiers::COMMAND, Key::Plus), ShortcutAction::ZoomIn),
    (KeyboardShortcut::new(Modifiers::COMMAND, Key::Equals), ShortcutAction::ZoomIn),
    (KeyboardShortcut::new(Modifiers::COMMAND, Key::Minus), ShortcutAction::ZoomOut),
    (KeyboardShortcut::new(Modifiers::COMMAND, Key::Num0), ShortcutAction::ResetView),
    (KeyboardShortcut::new(Modifiers::NONE, Key::B), ShortcutAction::Brush),
    (KeyboardShortcut::new(Modifiers::NONE, Key::E), ShortcutAction::Eraser),
    (KeyboardShortcut::new(Modifiers::NONE, Key::L), ShortcutAction::Line),
    (KeyboardShortcut::new(Modifiers::NONE, Key::R), ShortcutAction::Rectangle),
    (KeyboardShortcut::new(Modifiers::NONE, Key::O), ShortcutAction::Ellipse),
    (KeyboardShortcut::new(Modifiers::NONE, Key::G), ShortcutAction::ToggleGrid),
];

/// Consume any shortcuts pressed this frame. Single-key shortcuts are
/// ignored while a text field has focus.
pub fn consume_shortcuts(ctx: &egui::Context) -> Vec<ShortcutAction> {
    let typing = ctx.wants_keyboard_input();
    ctx.input_mut(|i| {
        SHORTCUTS
            .iter()
            .filter(|(shortcut, _)| !(typing && shortcut.modifiers.is_none()))
            .filter_map(|(shortcut, action)| i.consume_shortcut(shortcut).then_some(*action))
            .collect()
    })
}
