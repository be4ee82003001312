use egui::Pos2;

use super::{Tool, ToolAction, ToolContext};
use crate::geometry::LazyBrush;
use crate::path::{Path, PathShape};

/// Points closer than this to the previous one are dropped
const MIN_POINT_SPACING: f32 = 0.75;

/// Free-hand drawing, stabilized by the lazy brush
#[derive(Debug, Clone, Default)]
pub struct BrushTool {
    // Transient state: the stroke being drawn (if any)
    points: Option<Vec<Pos2>>,
    lazy: LazyBrush,
}

impl BrushTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer, brush tip and string length while a stabilized stroke is in progress
    pub fn lazy_state(&self) -> Option<(Pos2, Pos2, f32)> {
        match &self.points {
            Some(_) if self.lazy.enabled => Some((self.lazy.pointer(), self.lazy.brush(), self.lazy.radius)),
            _ => None,
        }
    }

    fn push(&mut self, pos: Pos2) {
        if let Some(points) = &mut self.points {
            if points.last().is_none_or(|last| last.distance(pos) >= MIN_POINT_SPACING) {
                points.push(pos);
            }
        }
    }

    fn current_path(&self, ctx: &ToolContext<'_>) -> Option<Path> {
        let points = self.points.as_ref()?;
        if points.is_empty() {
            return None;
        }
        let mut style = ctx.style.clone();
        // Free-hand strokes are never filled
        style.fill = None;
        Some(Path::new(PathShape::Freehand(points.clone()), style))
    }
}

impl Tool for BrushTool {
    fn name(&self) -> &'static str {
        "Brush"
    }

    fn deactivate(&mut self) {
        self.points = None;
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        if let Err(reason) = ctx.ensure_editable() {
            return ToolAction::Blocked(reason);
        }
        let pos = ctx.grid.apply(pos);
        // Pick up the current stabilizer settings for this stroke
        self.lazy = ctx.lazy_brush;
        self.lazy.reset(pos);
        self.points = Some(vec![pos]);
        ToolAction::None
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        if self.points.is_some() && self.lazy.update(pos) {
            let brush = ctx.grid.apply(self.lazy.brush());
            self.push(brush);
        }
        ToolAction::None
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        self.on_pointer_move(pos, ctx);
        let action = match self.current_path(ctx) {
            Some(path) => ctx.add_with_symmetry(path, "Draw"),
            None => ToolAction::None,
        };
        self.points = None;
        action
    }

    fn preview(&self, ctx: &ToolContext<'_>) -> Vec<Path> {
        self.current_path(ctx)
            .map(|path| path.mirrored(ctx.symmetry, ctx.document.center()))
            .unwrap_or_default()
    }

    fn is_active(&self) -> bool {
        self.points.is_some()
    }
}
