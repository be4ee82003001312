use egui::{Color32, Pos2, Vec2};
use mindful_canvas::command::{Command, CommandHistory};
use mindful_canvas::document::Document;
use mindful_canvas::geometry::{GridSettings, LazyBrush, SymmetryMode};
use mindful_canvas::path::{Fill, Path, PathShape, PathStyle};
use mindful_canvas::tools::{
    BrushTool, EraserTool, EyedropperTool, FillTool, ShapeKind, ShapeTool, Tool, ToolAction, ToolContext,
    ToolKind,
};

fn create_test_document() -> Document {
    Document::new(Vec2::new(400.0, 300.0))
}

fn context<'a>(doc: &'a Document, style: &'a PathStyle, fill: &'a Fill) -> ToolContext<'a> {
    ToolContext {
        document: doc,
        style,
        fill,
        symmetry: SymmetryMode::None,
        grid: GridSettings::default(),
        lazy_brush: LazyBrush::default(),
        constrain: false,
    }
}

fn stroke(tool: &mut impl Tool, ctx: &ToolContext<'_>, points: &[Pos2]) -> ToolAction {
    let (first, rest) = points.split_first().unwrap();
    assert_eq!(tool.on_pointer_down(*first, ctx), ToolAction::None);
    let (last, middle) = rest.split_last().unwrap();
    for p in middle {
        tool.on_pointer_move(*p, ctx);
    }
    tool.on_pointer_up(*last, ctx)
}

fn added_path(action: ToolAction) -> Path {
    match action {
        ToolAction::Command(Command::AddPath { path, .. }) => path,
        other => panic!("expected a single AddPath, got {other:?}"),
    }
}

fn add_shape(doc: &mut Document, shape: PathShape, style: PathStyle) -> usize {
    let path = Path::new(shape, style);
    let id = path.id;
    doc.add_path(doc.active_layer_id(), path).unwrap();
    id
}

#[test]
fn test_brush_stroke_records_points() {
    let doc = create_test_document();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let ctx = context(&doc, &style, &fill);

    let mut brush = BrushTool::new();
    let points = [Pos2::new(10.0, 10.0), Pos2::new(20.0, 20.0), Pos2::new(30.0, 30.0)];
    let path = added_path(stroke(&mut brush, &ctx, &points));

    assert_eq!(path.shape, PathShape::Freehand(points.to_vec()));
    assert_eq!(path.style.fill, None);
    assert!(!brush.is_active());
}

#[test]
fn test_brush_preview_while_drawing() {
    let doc = create_test_document();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let mut ctx = context(&doc, &style, &fill);
    ctx.symmetry = SymmetryMode::Horizontal;

    let mut brush = BrushTool::new();
    brush.on_pointer_down(Pos2::new(10.0, 10.0), &ctx);
    brush.on_pointer_move(Pos2::new(20.0, 10.0), &ctx);
    assert!(brush.is_active());

    let preview = brush.preview(&ctx);
    assert_eq!(preview.len(), 2);
    // Mirrored across x = 200
    assert_eq!(
        preview[1].shape,
        PathShape::Freehand(vec![Pos2::new(390.0, 10.0), Pos2::new(380.0, 10.0)])
    );

    brush.deactivate();
    assert!(brush.preview(&ctx).is_empty());
}

#[test]
fn test_symmetric_stroke_is_one_undo_step() {
    let mut doc = create_test_document();
    let mut history = CommandHistory::new();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);

    let action = {
        let mut ctx = context(&doc, &style, &fill);
        ctx.symmetry = SymmetryMode::Quad;
        let mut brush = BrushTool::new();
        stroke(&mut brush, &ctx, &[Pos2::new(10.0, 10.0), Pos2::new(50.0, 40.0)])
    };
    let ToolAction::Command(command) = action else {
        panic!("expected a command");
    };
    assert!(matches!(command, Command::Batch { .. }));

    history.execute(command, &mut doc).unwrap();
    assert_eq!(doc.path_count(), 4);
    let mirrored = &doc.active_layer().paths[3];
    assert_eq!(mirrored.outline()[0], Pos2::new(390.0, 290.0));

    history.undo(&mut doc).unwrap();
    assert!(doc.is_empty());
}

#[test]
fn test_radial_symmetry_copies() {
    let doc = create_test_document();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let mut ctx = context(&doc, &style, &fill);
    ctx.symmetry = SymmetryMode::radial(6);

    let mut brush = BrushTool::new();
    let action = stroke(&mut brush, &ctx, &[Pos2::new(200.0, 50.0), Pos2::new(200.0, 100.0)]);
    let ToolAction::Command(Command::Batch { commands, .. }) = action else {
        panic!("expected a batch");
    };
    assert_eq!(commands.len(), 6);
}

#[test]
fn test_lazy_brush_trails_pointer() {
    let doc = create_test_document();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let mut ctx = context(&doc, &style, &fill);
    ctx.lazy_brush = LazyBrush::new(10.0, 0.0);

    let mut brush = BrushTool::new();
    brush.on_pointer_down(Pos2::ZERO, &ctx);
    // Inside the string length: the brush stays put
    brush.on_pointer_move(Pos2::new(5.0, 0.0), &ctx);
    brush.on_pointer_move(Pos2::new(25.0, 0.0), &ctx);
    assert_eq!(
        brush.lazy_state(),
        Some((Pos2::new(25.0, 0.0), Pos2::new(15.0, 0.0), 10.0))
    );

    let path = added_path(brush.on_pointer_up(Pos2::new(25.0, 0.0), &ctx));
    assert_eq!(path.shape, PathShape::Freehand(vec![Pos2::ZERO, Pos2::new(15.0, 0.0)]));
    assert_eq!(brush.lazy_state(), None);
}

#[test]
fn test_grid_snapping_applies_to_strokes() {
    let doc = create_test_document();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let mut ctx = context(&doc, &style, &fill);
    ctx.grid = GridSettings {
        size: 20.0,
        visible: true,
        snap: true,
    };

    let mut line = ShapeTool::new(ShapeKind::Line);
    let path = added_path(stroke(&mut line, &ctx, &[Pos2::new(12.0, 9.0), Pos2::new(49.0, 31.0)]));
    assert_eq!(
        path.shape,
        PathShape::Line {
            start: Pos2::new(20.0, 0.0),
            end: Pos2::new(40.0, 40.0),
        }
    );
}

#[test]
fn test_locked_layer_blocks_drawing() {
    let mut doc = create_test_document();
    let layer = doc.active_layer_id();
    doc.set_locked(layer, true).unwrap();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let ctx = context(&doc, &style, &fill);

    let mut brush = BrushTool::new();
    match brush.on_pointer_down(Pos2::new(10.0, 10.0), &ctx) {
        ToolAction::Blocked(reason) => assert!(reason.contains("locked")),
        other => panic!("expected the stroke to be blocked, got {other:?}"),
    }
    assert!(!brush.is_active());
    assert!(matches!(
        FillTool.on_pointer_down(Pos2::new(10.0, 10.0), &ctx),
        ToolAction::Blocked(_)
    ));
}

#[test]
fn test_rectangle_constrained_to_square() {
    let doc = create_test_document();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let mut ctx = context(&doc, &style, &fill);
    ctx.constrain = true;

    let mut rect = ShapeTool::new(ShapeKind::Rectangle);
    let path = added_path(stroke(&mut rect, &ctx, &[Pos2::new(10.0, 10.0), Pos2::new(50.0, 30.0)]));
    assert_eq!(
        path.shape,
        PathShape::Rectangle {
            min: Pos2::new(10.0, 10.0),
            max: Pos2::new(50.0, 50.0),
        }
    );
}

#[test]
fn test_line_constrained_to_45_degrees() {
    let doc = create_test_document();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let mut ctx = context(&doc, &style, &fill);
    ctx.constrain = true;

    let mut line = ShapeTool::new(ShapeKind::Line);
    let path = added_path(stroke(&mut line, &ctx, &[Pos2::ZERO, Pos2::new(10.0, 1.0)]));
    let PathShape::Line { end, .. } = path.shape else {
        panic!("expected a line");
    };
    assert!(end.y.abs() < 1e-4);
    assert!((end.x - 101.0f32.sqrt()).abs() < 1e-4);
}

#[test]
fn test_tiny_shapes_are_discarded() {
    let doc = create_test_document();
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let ctx = context(&doc, &style, &fill);

    for kind in [ShapeKind::Line, ShapeKind::Rectangle, ShapeKind::Ellipse, ShapeKind::Star] {
        let mut tool = ShapeTool::new(kind);
        let action = stroke(&mut tool, &ctx, &[Pos2::new(10.0, 10.0), Pos2::new(10.5, 10.5)]);
        assert_eq!(action, ToolAction::None, "{kind:?}");
    }
}

#[test]
fn test_ellipse_and_star_are_closed() {
    let doc = create_test_document();
    let mut style = PathStyle::default();
    style.fill = Some(Fill::Solid(Color32::BLUE));
    let fill = Fill::Solid(Color32::RED);
    let ctx = context(&doc, &style, &fill);

    let mut ellipse = ShapeTool::new(ShapeKind::Ellipse);
    let path = added_path(stroke(&mut ellipse, &ctx, &[Pos2::new(0.0, 0.0), Pos2::new(40.0, 20.0)]));
    assert_eq!(
        path.shape,
        PathShape::Ellipse {
            center: Pos2::new(20.0, 10.0),
            radii: Vec2::new(20.0, 10.0),
        }
    );
    assert_eq!(path.style.fill, Some(Fill::Solid(Color32::BLUE)));

    let mut star = ShapeTool::new(ShapeKind::Star);
    let path = added_path(stroke(&mut star, &ctx, &[Pos2::new(100.0, 100.0), Pos2::new(100.0, 60.0)]));
    assert!(path.is_closed());
    assert_eq!(path.outline().len(), 10);

    // Lines never carry a fill
    let mut line = ShapeTool::new(ShapeKind::Line);
    let path = added_path(stroke(&mut line, &ctx, &[Pos2::ZERO, Pos2::new(30.0, 0.0)]));
    assert_eq!(path.style.fill, None);
}

#[test]
fn test_eraser_removes_hit_path() {
    let mut doc = create_test_document();
    let target = add_shape(
        &mut doc,
        PathShape::Line {
            start: Pos2::new(10.0, 0.0),
            end: Pos2::new(10.0, 100.0),
        },
        PathStyle::default(),
    );
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let ctx = context(&doc, &style, &fill);

    let mut eraser = EraserTool::new();
    assert_eq!(eraser.on_pointer_down(Pos2::new(100.0, 50.0), &ctx), ToolAction::None);
    match eraser.on_pointer_move(Pos2::new(11.0, 50.0), &ctx) {
        ToolAction::Command(Command::RemovePath { path, index, .. }) => {
            assert_eq!(path.id, target);
            assert_eq!(index, 0);
        }
        other => panic!("expected RemovePath, got {other:?}"),
    }

    eraser.on_pointer_up(Pos2::new(11.0, 50.0), &ctx);
    assert_eq!(eraser.on_pointer_move(Pos2::new(11.0, 50.0), &ctx), ToolAction::None);
}

#[test]
fn test_fill_tool_fills_closed_shape() {
    let mut doc = create_test_document();
    let mut history = CommandHistory::new();
    add_shape(
        &mut doc,
        PathShape::rectangle(Pos2::new(50.0, 50.0), Pos2::new(150.0, 150.0)),
        PathStyle::default(),
    );
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);

    let action = FillTool.on_pointer_down(Pos2::new(100.0, 100.0), &context(&doc, &style, &fill));
    let ToolAction::Command(command) = action else {
        panic!("expected a fill command");
    };
    history.execute(command, &mut doc).unwrap();
    assert_eq!(doc.active_layer().paths[0].style.fill, Some(fill.clone()));

    // Same fill again is a no-op
    let again = FillTool.on_pointer_down(Pos2::new(100.0, 100.0), &context(&doc, &style, &fill));
    assert_eq!(again, ToolAction::None);
    // Outside every shape
    let outside = FillTool.on_pointer_down(Pos2::new(300.0, 250.0), &context(&doc, &style, &fill));
    assert_eq!(outside, ToolAction::None);

    history.undo(&mut doc).unwrap();
    assert_eq!(doc.active_layer().paths[0].style.fill, None);
}

#[test]
fn test_fill_ignores_open_strokes() {
    let mut doc = create_test_document();
    add_shape(
        &mut doc,
        PathShape::Freehand(vec![Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), Pos2::new(100.0, 100.0)]),
        PathStyle::default(),
    );
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let ctx = context(&doc, &style, &fill);
    assert_eq!(FillTool.on_pointer_down(Pos2::new(100.0, 50.0), &ctx), ToolAction::None);
}

#[test]
fn test_eyedropper_picks_colors() {
    let mut doc = create_test_document();
    let mut outline = PathStyle::default();
    outline.color = Color32::BLUE;
    outline.fill = Some(Fill::Solid(Color32::YELLOW));
    add_shape(
        &mut doc,
        PathShape::rectangle(Pos2::new(50.0, 50.0), Pos2::new(150.0, 150.0)),
        outline,
    );
    let style = PathStyle::default();
    let fill = Fill::Solid(Color32::RED);
    let ctx = context(&doc, &style, &fill);

    let mut picker = EyedropperTool;
    assert_eq!(
        picker.on_pointer_down(Pos2::new(100.0, 100.0), &ctx),
        ToolAction::PickColor(Color32::YELLOW)
    );
    assert_eq!(
        picker.on_pointer_down(Pos2::new(50.0, 100.0), &ctx),
        ToolAction::PickColor(Color32::BLUE)
    );
    assert_eq!(
        picker.on_pointer_down(Pos2::new(300.0, 250.0), &ctx),
        ToolAction::PickColor(doc.background)
    );
}

#[test]
fn test_tool_kinds_round_trip() {
    for kind in ToolKind::ALL {
        let tool = kind.new_instance();
        assert_eq!(tool.kind(), kind);
        assert_eq!(tool.name(), kind.label());
        assert!(!tool.is_active());
    }
}
