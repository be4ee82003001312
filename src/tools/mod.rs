use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::document::Document;
use crate::geometry::{GridSettings, LazyBrush, SymmetryMode};
use crate::path::{Fill, Path, PathStyle};

mod brush;
mod eraser;
mod fill;
mod shape;

pub use brush::BrushTool;
pub use eraser::EraserTool;
pub use fill::{EyedropperTool, FillTool};
pub use shape::{constrain_line, constrain_square, ShapeKind, ShapeTool};

/// Everything a tool may look at while handling pointer input
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub document: &'a Document,
    pub style: &'a PathStyle,
    /// What the fill tool pours
    pub fill: &'a Fill,
    pub symmetry: SymmetryMode,
    pub grid: GridSettings,
    pub lazy_brush: LazyBrush,
    /// Shift held: square shapes, 45 degree lines
    pub constrain: bool,
}

impl ToolContext<'_> {
    /// Check that the active layer accepts edits
    pub fn ensure_editable(&self) -> Result<(), String> {
        let layer = self.document.active_layer();
        if layer.locked {
            Err(format!("\"{}\" is locked", layer.name))
        } else if !layer.visible {
            Err(format!("\"{}\" is hidden", layer.name))
        } else {
            Ok(())
        }
    }

    /// One command adding `path` and all its symmetric copies to the active layer
    pub fn add_with_symmetry(&self, path: Path, label: &str) -> ToolAction {
        let layer = self.document.active_layer_id();
        let commands = path
            .mirrored(self.symmetry, self.document.center())
            .into_iter()
            .map(|path| Command::AddPath { layer, path })
            .collect();
        match Command::batch(label, commands) {
            Ok(command) => ToolAction::Command(command),
            Err(_) => ToolAction::None,
        }
    }
}

/// What a tool wants done in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    None,
    Command(Command),
    PickColor(Color32),
    /// The action was refused; the message is shown to the user
    Blocked(String),
}

/// Tool trait defines the interface for all drawing tools
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Called when the tool is deselected; drops any stroke in progress
    fn deactivate(&mut self) {}

    /// Handle pointer press on the canvas (canvas coordinates)
    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction;

    /// Handle pointer drag while the pointer is held down
    fn on_pointer_move(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> ToolAction {
        ToolAction::None
    }

    /// Handle pointer release; usually finalizes the action
    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &ToolContext<'_>) -> ToolAction {
        ToolAction::None
    }

    /// Paths to draw as a live preview (including symmetric copies)
    fn preview(&self, _ctx: &ToolContext<'_>) -> Vec<Path> {
        Vec::new()
    }

    /// Whether an action is in progress
    fn is_active(&self) -> bool {
        false
    }
}

/// Tool selection as stored in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Line,
    Rectangle,
    Ellipse,
    Star,
    Fill,
    Eyedropper,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Star,
        ToolKind::Fill,
        ToolKind::Eyedropper,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            ToolKind::Brush => "🖌",
            ToolKind::Eraser => "⌫",
            ToolKind::Line => "╱",
            ToolKind::Rectangle => "▭",
            ToolKind::Ellipse => "◯",
            ToolKind::Star => "☆",
            ToolKind::Fill => "🪣",
            ToolKind::Eyedropper => "💧",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::Line => "Line",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Ellipse => "Ellipse",
            ToolKind::Star => "Star",
            ToolKind::Fill => "Fill",
            ToolKind::Eyedropper => "Eyedropper",
        }
    }

    pub fn new_instance(&self) -> ToolType {
        match self {
            ToolKind::Brush => ToolType::Brush(BrushTool::new()),
            ToolKind::Eraser => ToolType::Eraser(EraserTool::new()),
            ToolKind::Line => ToolType::Shape(ShapeTool::new(ShapeKind::Line)),
            ToolKind::Rectangle => ToolType::Shape(ShapeTool::new(ShapeKind::Rectangle)),
            ToolKind::Ellipse => ToolType::Shape(ShapeTool::new(ShapeKind::Ellipse)),
            ToolKind::Star => ToolType::Shape(ShapeTool::new(ShapeKind::Star)),
            ToolKind::Fill => ToolType::Fill(FillTool),
            ToolKind::Eyedropper => ToolType::Eyedropper(EyedropperTool),
        }
    }
}

/// Enum representing all available tool types
#[derive(Debug, Clone)]
pub enum ToolType {
    Brush(BrushTool),
    Eraser(EraserTool),
    Shape(ShapeTool),
    Fill(FillTool),
    Eyedropper(EyedropperTool),
}

impl ToolType {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Brush(_) => ToolKind::Brush,
            Self::Eraser(_) => ToolKind::Eraser,
            Self::Shape(tool) => match tool.kind() {
                ShapeKind::Line => ToolKind::Line,
                ShapeKind::Rectangle => ToolKind::Rectangle,
                ShapeKind::Ellipse => ToolKind::Ellipse,
                ShapeKind::Star => ToolKind::Star,
            },
            Self::Fill(_) => ToolKind::Fill,
            Self::Eyedropper(_) => ToolKind::Eyedropper,
        }
    }

    fn inner(&self) -> &dyn Tool {
        match self {
            Self::Brush(tool) => tool,
            Self::Eraser(tool) => tool,
            Self::Shape(tool) => tool,
            Self::Fill(tool) => tool,
            Self::Eyedropper(tool) => tool,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Brush(tool) => tool,
            Self::Eraser(tool) => tool,
            Self::Shape(tool) => tool,
            Self::Fill(tool) => tool,
            Self::Eyedropper(tool) => tool,
        }
    }
}

impl Default for ToolType {
    fn default() -> Self {
        ToolKind::default().new_instance()
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn deactivate(&mut self) {
        self.inner_mut().deactivate();
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        self.inner_mut().on_pointer_down(pos, ctx)
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        self.inner_mut().on_pointer_move(pos, ctx)
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolAction {
        self.inner_mut().on_pointer_up(pos, ctx)
    }

    fn preview(&self, ctx: &ToolContext<'_>) -> Vec<Path> {
        self.inner().preview(ctx)
    }

    fn is_active(&self) -> bool {
        self.inner().is_active()
    }
}
