//! SVG and raster export of a [`Document`].

use egui::{Color32, Pos2, Rect};
use image::{Rgba, RgbaImage};
use std::fmt::Write as _;
use std::path::{Path as FsPath, PathBuf};

use crate::color::to_hex;
use crate::document::Document;
use crate::error::ExportError;
use crate::gradient::{Gradient, GradientKind};
use crate::path::{num, BrushKind, Fill, Path};

/// Largest raster side we agree to allocate
pub const MAX_EXPORT_SIDE: u32 = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
    Svg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Jpg, ExportFormat::Svg];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpg => "JPG",
            ExportFormat::Svg => "SVG",
        }
    }
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn has_visible_content(document: &Document) -> bool {
    document
        .layers()
        .iter()
        .any(|layer| layer.visible && !layer.paths.is_empty())
}

fn svg_color(color: Color32) -> (String, f32) {
    let [.., a] = color.to_srgba_unmultiplied();
    (to_hex(color), a as f32 / 255.0)
}

fn write_gradient_def(out: &mut String, id: &str, gradient: &Gradient, bounds: Rect) {
    let stops = gradient
        .stops()
        .iter()
        .map(|stop| {
            let (hex, alpha) = svg_color(stop.color);
            format!(
                r#"<stop offset="{}%" stop-color="{hex}" stop-opacity="{}"/>"#,
                num(stop.position),
                num(alpha)
            )
        })
        .collect::<String>();
    let _ = match gradient.kind {
        GradientKind::Linear { angle_deg } => {
            let (start, end) = Gradient::linear_endpoints(angle_deg, bounds);
            write!(
                out,
                r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{stops}</linearGradient>"#,
                num(start.x),
                num(start.y),
                num(end.x),
                num(end.y)
            )
        }
        GradientKind::Radial { center } => {
            let c = Gradient::radial_center(center, bounds);
            let r = Gradient::radial_radius(c, bounds);
            write!(
                out,
                r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">{stops}</radialGradient>"#,
                num(c.x),
                num(c.y),
                num(r)
            )
        }
    };
}

/// A standalone SVG document: one `<g>` per visible layer, gradients in `<defs>`
pub fn export_svg(document: &Document) -> String {
    let size = document.canvas_size;
    let mut defs = String::new();
    let mut body = String::new();

    for layer in document.layers().iter().filter(|l| l.visible) {
        let _ = write!(
            body,
            r#"<g id="layer-{}" opacity="{}">"#,
            layer.id.simple(),
            num(layer.opacity())
        );
        for path in &layer.paths {
            let style = &path.style;
            let fill = match (&style.fill, path.is_closed()) {
                (Some(Fill::Solid(color)), true) => {
                    let (hex, alpha) = svg_color(*color);
                    format!(r#"fill="{hex}" fill-opacity="{}""#, num(alpha))
                }
                (Some(Fill::Gradient(gradient)), true) => {
                    let id = format!("gradient-{}", path.id);
                    write_gradient_def(&mut defs, &id, gradient, path.bounds());
                    format!(r#"fill="url(#{id})""#)
                }
                _ => r#"fill="none""#.to_owned(),
            };
            let (stroke, stroke_alpha) = svg_color(style.color);
            let _ = write!(
                body,
                r#"<path d="{}" {fill} stroke="{stroke}" stroke-opacity="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round" opacity="{}"/>"#,
                path.to_svg_d(),
                num(stroke_alpha),
                num(style.effective_width()),
                num(style.effective_opacity()),
            );
        }
        body.push_str("</g>");
    }

    let (background, background_alpha) = svg_color(document.background);
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(size.x),
        h = num(size.y)
    );
    if !defs.is_empty() {
        let _ = write!(svg, "<defs>{defs}</defs>");
    }
    let _ = write!(
        svg,
        r#"<rect width="100%" height="100%" fill="{background}" fill-opacity="{}"/>"#,
        num(background_alpha)
    );
    svg.push_str(&body);
    svg.push_str("</svg>");
    svg
}

/// Source-over blend of a non-premultiplied color with extra coverage alpha
fn blend(dst: &mut Rgba<u8>, src: [u8; 4], alpha: f32) {
    let sa = src[3] as f32 / 255.0 * alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let sc = src[i] as f32;
        let dc = dst.0[i] as f32;
        dst.0[i] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}

/// Pixel-space coverage of one path, limited to its bounding box
struct Mask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    fn new(bounds: Rect, image_width: u32, image_height: u32) -> Option<Self> {
        let x0 = bounds.min.x.floor().max(0.0) as u32;
        let y0 = bounds.min.y.floor().max(0.0) as u32;
        let x1 = (bounds.max.x.ceil().max(0.0) as u32).min(image_width);
        let y1 = (bounds.max.y.ceil().max(0.0) as u32).min(image_height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        let (width, height) = (x1 - x0, y1 - y0);
        Some(Self {
            x0,
            y0,
            width,
            height,
            bits: vec![false; (width * height) as usize],
        })
    }

    fn set(&mut self, x: u32, y: u32) {
        if x >= self.x0 && y >= self.y0 && x < self.x0 + self.width && y < self.y0 + self.height {
            self.bits[((y - self.y0) * self.width + (x - self.x0)) as usize] = true;
        }
    }

    fn stamp_disc(&mut self, center: Pos2, radius: f32) {
        let r = radius.max(0.5);
        let min_x = ((center.x - r).floor().max(0.0) as u32).max(self.x0);
        let min_y = ((center.y - r).floor().max(0.0) as u32).max(self.y0);
        let max_x = ((center.x + r).ceil().max(0.0) as u32).min(self.x0 + self.width - 1);
        let max_y = ((center.y + r).ceil().max(0.0) as u32).min(self.y0 + self.height - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let pixel = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                if pixel.distance_sq(center) <= r * r {
                    self.set(x, y);
                }
            }
        }
    }

    /// Discs along a segment, close enough that they merge into a band
    fn stamp_segment(&mut self, a: Pos2, b: Pos2, radius: f32) {
        let spacing = (radius * 0.5).max(0.5);
        let steps = (a.distance(b) / spacing).ceil().max(1.0) as usize;
        for i in 0..=steps {
            self.stamp_disc(a.lerp(b, i as f32 / steps as f32), radius);
        }
    }

    /// Even-odd scanline fill, sampling at pixel centers
    fn fill_polygon(&mut self, polygon: &[Pos2]) {
        if polygon.len() < 3 {
            return;
        }
        let mut crossings = Vec::new();
        for row in 0..self.height {
            let y = (self.y0 + row) as f32 + 0.5;
            crossings.clear();
            for i in 0..polygon.len() {
                let a = polygon[i];
                let b = polygon[(i + 1) % polygon.len()];
                if (a.y <= y) != (b.y <= y) {
                    crossings.push(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(self.x0 as f32) as u32;
                let end = (span[1] - 0.5).floor();
                if end < start as f32 {
                    continue;
                }
                for x in start..=(end as u32).min(self.x0 + self.width - 1) {
                    self.set(x, self.y0 + row);
                }
            }
        }
    }

    fn covered(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.bits.iter().enumerate().filter(|(_, on)| **on).map(|(i, _)| {
            let i = i as u32;
            (self.x0 + i % self.width, self.y0 + i / self.width)
        })
    }
}

fn rasterize_path(image: &mut RgbaImage, path: &Path, scale: f32, layer_opacity: f32) {
    let (width, height) = image.dimensions();
    let points: Vec<Pos2> = path
        .outline()
        .into_iter()
        .map(|p| Pos2::new(p.x * scale, p.y * scale))
        .collect();
    if points.is_empty() {
        return;
    }
    let style = &path.style;
    let opacity = layer_opacity * style.effective_opacity();
    let radius = style.effective_width() * scale / 2.0;
    let bounds = Rect::from_points(&points).expand(radius + 1.0);

    if let (Some(fill), true) = (&style.fill, path.is_closed()) {
        if let Some(mut mask) = Mask::new(bounds, width, height) {
            mask.fill_polygon(&points);
            let canvas_bounds = path.bounds();
            for (x, y) in mask.covered() {
                let color = match fill {
                    Fill::Solid(color) => *color,
                    Fill::Gradient(gradient) => {
                        let at = Pos2::new((x as f32 + 0.5) / scale, (y as f32 + 0.5) / scale);
                        gradient.color_at(at, canvas_bounds)
                    }
                };
                blend(image.get_pixel_mut(x, y), color.to_srgba_unmultiplied(), opacity);
            }
        }
    }

    let color = style.color.to_srgba_unmultiplied();
    let mut segments: Vec<(Pos2, Pos2)> = points.windows(2).map(|w| (w[0], w[1])).collect();
    if path.is_closed() && points.len() > 2 {
        segments.push((points[points.len() - 1], points[0]));
    }

    let passes: &[f32] = if style.brush == BrushKind::Calligraphy { &[1.0] } else { style.brush.passes() };
    for pass in passes {
        let Some(mut mask) = Mask::new(bounds, width, height) else {
            return;
        };
        if segments.is_empty() {
            mask.stamp_disc(points[0], radius * pass);
        }
        for &(a, b) in &segments {
            let r = if style.brush == BrushKind::Calligraphy {
                BrushKind::nib_width(radius * 2.0, b - a) / 2.0
            } else {
                radius * pass
            };
            mask.stamp_segment(a, b, r);
        }
        for (x, y) in mask.covered() {
            blend(image.get_pixel_mut(x, y), color, opacity);
        }
    }
}

/// Software rendering of the visible layers at `scale` pixels per canvas unit
pub fn rasterize(document: &Document, scale: f32) -> Result<RgbaImage, ExportError> {
    let width = (document.canvas_size.x * scale).round();
    let height = (document.canvas_size.y * scale).round();
    let valid = |side: f32| side.is_finite() && side >= 1.0 && side <= MAX_EXPORT_SIDE as f32;
    if !valid(width) || !valid(height) {
        return Err(ExportError::InvalidSize(width.max(0.0) as u32, height.max(0.0) as u32));
    }

    let mut image = RgbaImage::from_pixel(
        width as u32,
        height as u32,
        Rgba(document.background.to_srgba_unmultiplied()),
    );
    for layer in document.layers().iter().filter(|l| l.visible) {
        for path in &layer.paths {
            rasterize_path(&mut image, path, scale, layer.opacity());
        }
    }
    Ok(image)
}

/// Composite onto white and drop alpha, for formats without transparency
pub fn flatten(image: &RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let mut pixel = Rgba([255, 255, 255, 255]);
        let src = image.get_pixel(x, y).0;
        blend(&mut pixel, src, 1.0);
        image::Rgb([pixel.0[0], pixel.0[1], pixel.0[2]])
    })
}

pub fn export_file_name(format: ExportFormat, timestamp: u64) -> String {
    format!("mindful-canvas-{timestamp}.{}", format.extension())
}

/// Write the document into `dir` and return the file written
#[cfg(not(target_arch = "wasm32"))]
pub fn export_to_file(document: &Document, format: ExportFormat, dir: &FsPath) -> Result<PathBuf, ExportError> {
    if !has_visible_content(document) {
        return Err(ExportError::NothingVisible);
    }
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(format, crate::util::time::timestamp_secs()));

    match format {
        ExportFormat::Svg => std::fs::write(&path, export_svg(document))?,
        ExportFormat::Png => rasterize(document, 1.0)?.save_with_format(&path, image::ImageFormat::Png)?,
        ExportFormat::Jpg => flatten(&rasterize(document, 1.0)?).save_with_format(&path, image::ImageFormat::Jpeg)?,
    }
    log::info!("Exported {} to {}", format.label(), path.display());
    Ok(path)
}

#[cfg(target_arch = "wasm32")]
pub fn export_to_file(_document: &Document, _format: ExportFormat, _dir: &FsPath) -> Result<PathBuf, ExportError> {
    Err(ExportError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_over_transparent_takes_source() {
        let mut pixel = Rgba([0, 0, 0, 0]);
        blend(&mut pixel, [200, 100, 50, 255], 0.5);
        assert_eq!(pixel.0, [200, 100, 50, 128]);
    }

    #[test]
    fn scanline_fills_square_interior() {
        let bounds = Rect::from_min_max(Pos2::ZERO, Pos2::new(10.0, 10.0));
        let mut mask = Mask::new(bounds, 10, 10).unwrap();
        mask.fill_polygon(&[
            Pos2::new(2.0, 2.0),
            Pos2::new(6.0, 2.0),
            Pos2::new(6.0, 6.0),
            Pos2::new(2.0, 6.0),
        ]);
        assert_eq!(mask.covered().count(), 16);
    }

    #[test]
    fn disc_stamp_is_clipped_to_image() {
        let bounds = Rect::from_min_max(Pos2::ZERO, Pos2::new(4.0, 4.0));
        let mut mask = Mask::new(bounds, 4, 4).unwrap();
        mask.stamp_disc(Pos2::new(0.0, 0.0), 3.0);
        assert!(mask.covered().all(|(x, y)| x < 4 && y < 4));
        assert!(mask.covered().count() > 0);
    }
}
