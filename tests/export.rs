use egui::{Color32, Pos2, Vec2};
use mindful_canvas::document::Document;
use mindful_canvas::error::ExportError;
use mindful_canvas::export::{export_file_name, export_svg, flatten, rasterize, ExportFormat};
use mindful_canvas::gradient::{ColorStop, Gradient};
use mindful_canvas::path::{Fill, Path, PathShape, PathStyle};

fn filled_square(fill: Fill) -> Path {
    let style = PathStyle {
        color: Color32::BLACK,
        width: 2.0,
        fill: Some(fill),
        ..Default::default()
    };
    Path::new(PathShape::rectangle(Pos2::new(10.0, 10.0), Pos2::new(30.0, 30.0)), style)
}

fn create_test_document() -> Document {
    let mut doc = Document::new(Vec2::new(50.0, 40.0));
    doc.background = Color32::WHITE;
    doc
}

#[test]
fn test_svg_contains_visible_layers_only() {
    let mut doc = create_test_document();
    let bottom = doc.active_layer_id();
    doc.add_path(bottom, filled_square(Fill::Solid(Color32::RED))).unwrap();
    let hidden = doc.add_layer("Hidden");
    doc.add_path(hidden, filled_square(Fill::Solid(Color32::BLUE))).unwrap();
    doc.set_visibility(hidden, false).unwrap();

    let svg = export_svg(&doc);
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="50" height="40""#));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches("<path ").count(), 1);
    assert_eq!(svg.matches("<g ").count(), 1);
    assert!(svg.contains(r##"fill="#ff0000""##));
    assert!(!svg.contains("#0000ff"));
    assert!(svg.contains("M 10 10 L 30 10 L 30 30 L 10 30 Z"));
}

#[test]
fn test_svg_gradient_fill_is_defined() {
    let mut doc = create_test_document();
    let gradient = Gradient::linear(
        "Dawn",
        0.0,
        vec![ColorStop::new(Color32::RED, 0.0), ColorStop::new(Color32::BLUE, 100.0)],
    );
    let path = filled_square(Fill::Gradient(gradient));
    let id = path.id;
    doc.add_path(doc.active_layer_id(), path).unwrap();

    let svg = export_svg(&doc);
    assert!(svg.contains("<defs><linearGradient"));
    assert!(svg.contains(&format!(r#"fill="url(#gradient-{id})""#)));
    assert_eq!(svg.matches("<stop ").count(), 2);
}

#[test]
fn test_rasterize_fills_shapes() {
    let mut doc = create_test_document();
    doc.add_path(doc.active_layer_id(), filled_square(Fill::Solid(Color32::RED)))
        .unwrap();

    let image = rasterize(&doc, 1.0).unwrap();
    assert_eq!(image.dimensions(), (50, 40));
    assert_eq!(image.get_pixel(20, 20).0, [255, 0, 0, 255]);
    // Outline drawn over the fill edge
    assert_eq!(image.get_pixel(10, 20).0, [0, 0, 0, 255]);
    assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255, 255]);
}

#[test]
fn test_rasterize_scales_and_skips_hidden_layers() {
    let mut doc = create_test_document();
    let layer = doc.active_layer_id();
    doc.add_path(layer, filled_square(Fill::Solid(Color32::RED))).unwrap();
    doc.set_visibility(layer, false).unwrap();

    let image = rasterize(&doc, 2.0).unwrap();
    assert_eq!(image.dimensions(), (100, 80));
    assert_eq!(image.get_pixel(40, 40).0, [255, 255, 255, 255]);
}

#[test]
fn test_layer_opacity_blends_with_background() {
    let mut doc = create_test_document();
    let layer = doc.active_layer_id();
    doc.add_path(layer, filled_square(Fill::Solid(Color32::BLACK))).unwrap();
    doc.set_opacity(layer, 0.5).unwrap();

    let pixel = rasterize(&doc, 1.0).unwrap().get_pixel(20, 20).0;
    assert_eq!(pixel[3], 255);
    assert!((126..=129).contains(&pixel[0]), "{pixel:?}");
}

#[test]
fn test_rasterize_rejects_bad_sizes() {
    let doc = create_test_document();
    assert!(matches!(rasterize(&doc, 0.0), Err(ExportError::InvalidSize(..))));
    assert!(matches!(rasterize(&doc, 1000.0), Err(ExportError::InvalidSize(..))));
}

#[test]
fn test_flatten_drops_alpha_onto_white() {
    let mut doc = create_test_document();
    doc.background = Color32::TRANSPARENT;
    let image = flatten(&rasterize(&doc, 1.0).unwrap());
    assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
}

#[test]
fn test_export_file_names() {
    assert_eq!(export_file_name(ExportFormat::Png, 42), "mindful-canvas-42.png");
    assert_eq!(export_file_name(ExportFormat::Svg, 7), "mindful-canvas-7.svg");
    assert!(ExportFormat::ALL.iter().all(|f| !f.extension().is_empty()));
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn test_export_empty_document_is_refused() {
    let doc = create_test_document();
    let dir = std::env::temp_dir().join("mindful-canvas-export-test");
    let result = mindful_canvas::export::export_to_file(&doc, ExportFormat::Png, &dir);
    assert!(matches!(result, Err(ExportError::NothingVisible)));
}
