use egui::Pos2;

use super::{Tool, ToolAction, ToolContext};
use crate::command::Command;
use crate::path::Fill;

/// Hit slack for click tools, in canvas units
const CLICK_TOLERANCE: f32 = 3.0;

/// Pours the current fill into the closed shape under the pointer
#[derive(Debug, Clone, Copy, Default)]
pub struct FillTool;

impl Tool for FillTool {
    fn name(&self) -> &'static str {
        "Fill"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        if let Err(reason) = ctx.ensure_editable() {
            return ToolAction::Blocked(reason);
        }
        let layer = ctx.document.active_layer();
        let Some(target) = layer
            .paths
            .iter()
            .rev()
            .find(|p| p.is_closed() && crate::geometry::point_in_polygon(pos, &p.outline()))
            .or_else(|| layer.hit_test(pos, CLICK_TOLERANCE).filter(|p| p.is_closed()))
        else {
            return ToolAction::None;
        };

        let mut filled = target.clone();
        filled.style.fill = Some(ctx.fill.clone());
        if filled == *target {
            return ToolAction::None;
        }
        ToolAction::Command(Command::ReplacePath {
            layer: layer.id,
            old: target.clone(),
            new: filled,
        })
    }
}

/// Picks the color of the topmost visible path under the pointer
#[derive(Debug, Clone, Copy, Default)]
pub struct EyedropperTool;

impl Tool for EyedropperTool {
    fn name(&self) -> &'static str {
        "Eyedropper"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        let Some((_, path)) = ctx.document.hit_test(pos, CLICK_TOLERANCE) else {
            return ToolAction::PickColor(ctx.document.background);
        };
        // Inside a filled shape but away from its outline: take the fill
        let on_outline = crate::geometry::distance_to_polyline(pos, &path.outline(), path.is_closed())
            <= path.style.effective_width() / 2.0 + CLICK_TOLERANCE;
        let color = match (&path.style.fill, on_outline) {
            (Some(Fill::Solid(color)), false) => *color,
            (Some(Fill::Gradient(gradient)), false) => gradient.color_at(pos, path.bounds()),
            _ => path.style.color,
        };
        ToolAction::PickColor(color)
    }
}
