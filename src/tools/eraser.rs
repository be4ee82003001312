use egui::Pos2;

use super::{Tool, ToolAction, ToolContext};
use crate::command::Command;

/// Removes whole paths from the active layer, one per hit
#[derive(Debug, Clone, Default)]
pub struct EraserTool {
    erasing: bool,
}

impl EraserTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn erase_at(&self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        let layer = ctx.document.active_layer();
        let tolerance = ctx.style.width / 2.0;
        let Some(hit) = layer.hit_test(pos, tolerance) else {
            return ToolAction::None;
        };
        match Command::remove_path(ctx.document, layer.id, hit.id) {
            Ok(command) => ToolAction::Command(command),
            Err(err) => ToolAction::Blocked(err.to_string()),
        }
    }
}

impl Tool for EraserTool {
    fn name(&self) -> &'static str {
        "Eraser"
    }

    fn deactivate(&mut self) {
        self.erasing = false;
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        if let Err(reason) = ctx.ensure_editable() {
            return ToolAction::Blocked(reason);
        }
        self.erasing = true;
        self.erase_at(pos, ctx)
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        if self.erasing { self.erase_at(pos, ctx) } else { ToolAction::None }
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> ToolAction {
        self.erasing = false;
        ToolAction::None
    }

    fn is_active(&self) -> bool {
        self.erasing
    }
}
