use egui::{Pos2, Vec2};
use std::f32::consts::FRAC_PI_4;

use super::{Tool, ToolAction, ToolContext};
use crate::path::{Path, PathShape};

/// Shapes smaller than this (in canvas units) are discarded on release
const MIN_SHAPE_EXTENT: f32 = 1.0;
const STAR_POINTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
    Star,
}

/// Snap `end` so the line from `start` runs at a multiple of 45 degrees.
pub fn constrain_line(start: Pos2, end: Pos2) -> Pos2 {
    let delta = end - start;
    let length = delta.length();
    if length == 0.0 {
        return end;
    }
    let angle = (delta.angle() / FRAC_PI_4).round() * FRAC_PI_4;
    start + Vec2::angled(angle) * length
}

/// Move `end` so the box spanned with `start` is square, keeping the drag direction.
pub fn constrain_square(start: Pos2, end: Pos2) -> Pos2 {
    let delta = end - start;
    let side = delta.x.abs().max(delta.y.abs());
    start + Vec2::new(side.copysign(delta.x), side.copysign(delta.y))
}

/// Drag-to-draw shapes: press sets the anchor, release commits
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ShapeKind,
    anchor: Option<Pos2>,
    current: Pos2,
}

impl ShapeTool {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            anchor: None,
            current: Pos2::ZERO,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn shape(&self, anchor: Pos2, ctx: &ToolContext<'_>) -> Option<PathShape> {
        let mut end = self.current;
        if ctx.constrain {
            end = match self.kind {
                ShapeKind::Line => constrain_line(anchor, end),
                ShapeKind::Rectangle | ShapeKind::Ellipse => constrain_square(anchor, end),
                ShapeKind::Star => end,
            };
        }
        let extent = end - anchor;
        let degenerate = match self.kind {
            ShapeKind::Line | ShapeKind::Star => extent.length() < MIN_SHAPE_EXTENT,
            ShapeKind::Rectangle | ShapeKind::Ellipse => {
                extent.x.abs() < MIN_SHAPE_EXTENT || extent.y.abs() < MIN_SHAPE_EXTENT
            }
        };
        if degenerate {
            return None;
        }
        Some(match self.kind {
            ShapeKind::Line => PathShape::Line { start: anchor, end },
            ShapeKind::Rectangle => PathShape::rectangle(anchor, end),
            ShapeKind::Ellipse => PathShape::ellipse(anchor, end),
            ShapeKind::Star => PathShape::star(anchor, end, STAR_POINTS),
        })
    }

    fn current_path(&self, ctx: &ToolContext<'_>) -> Option<Path> {
        let anchor = self.anchor?;
        let shape = self.shape(anchor, ctx)?;
        let mut style = ctx.style.clone();
        if !shape.is_closed() {
            style.fill = None;
        }
        Some(Path::new(shape, style))
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        match self.kind {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Star => "Star",
        }
    }

    fn deactivate(&mut self) {
        self.anchor = None;
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        if let Err(reason) = ctx.ensure_editable() {
            return ToolAction::Blocked(reason);
        }
        let pos = ctx.grid.apply(pos);
        self.anchor = Some(pos);
        self.current = pos;
        ToolAction::None
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        if self.anchor.is_some() {
            self.current = ctx.grid.apply(pos);
        }
        ToolAction::None
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        self.on_pointer_move(pos, ctx);
        let action = match self.current_path(ctx) {
            Some(path) => ctx.add_with_symmetry(path, self.name()),
            None => ToolAction::None,
        };
        self.anchor = None;
        action
    }

    fn preview(&self, ctx: &ToolContext<'_>) -> Vec<Path> {
        self.current_path(ctx)
            .map(|path| path.mirrored(ctx.symmetry, ctx.document.center()))
            .unwrap_or_default()
    }

    fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
}
