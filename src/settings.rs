use egui::{Color32, Vec2};
use std::path::PathBuf;

use crate::audio::Soundscape;
use crate::document::DEFAULT_CANVAS_SIZE;
use crate::export::ExportFormat;
use crate::geometry::{GridSettings, LazyBrush, SymmetryMode};
use crate::path::PathStyle;
use crate::tools::ToolKind;
use crate::wellness::{BreathingPattern, DEFAULT_BREAK_INTERVAL_SECS};

/// User preferences, persisted with the app state
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(default)] // new fields fall back to their defaults when loading old state
pub struct Settings {
    pub canvas_size: Vec2,
    pub background: Color32,
    pub grid: GridSettings,
    pub symmetry: SymmetryMode,
    pub show_symmetry_guides: bool,
    pub lazy_brush: LazyBrush,
    pub tool: ToolKind,
    pub style: PathStyle,
    /// Zero turns the break reminder off
    pub break_interval_secs: f64,
    pub breathing_pattern: BreathingPattern,
    pub soundscape: Soundscape,
    pub audio_volume: f32,
    pub export_format: ExportFormat,
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            background: Color32::from_rgb(0xfd, 0xfb, 0xf7),
            grid: GridSettings::default(),
            symmetry: SymmetryMode::None,
            show_symmetry_guides: true,
            lazy_brush: LazyBrush::default(),
            tool: ToolKind::Brush,
            style: PathStyle::default(),
            break_interval_secs: DEFAULT_BREAK_INTERVAL_SECS,
            breathing_pattern: BreathingPattern::Box,
            soundscape: Soundscape::Rain,
            audio_volume: 0.5,
            export_format: ExportFormat::Png,
            export_dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("Pictures").join("Mindful Canvas"))
        .unwrap_or_else(|| PathBuf::from("exports"))
}

impl Settings {
    /// Clamp values that may have been edited by hand or saved by an older build
    pub fn sanitize(&mut self) {
        self.canvas_size = Vec2::new(
            sanitize_side(self.canvas_size.x, DEFAULT_CANVAS_SIZE.x),
            sanitize_side(self.canvas_size.y, DEFAULT_CANVAS_SIZE.y),
        );
        if self.grid.size.is_nan() || self.grid.size <= 0.0 {
            self.grid.size = GridSettings::default().size;
        }
        if let SymmetryMode::Radial(n) = self.symmetry {
            self.symmetry = SymmetryMode::radial(n);
        }
        self.audio_volume = if self.audio_volume.is_nan() { 0.5 } else { self.audio_volume.clamp(0.0, 1.0) };
        if self.break_interval_secs.is_nan() || self.break_interval_secs < 0.0 {
            self.break_interval_secs = 0.0;
        }
    }
}

pub const MIN_CANVAS_SIDE: f32 = 100.0;
pub const MAX_CANVAS_SIDE: f32 = 4096.0;

fn sanitize_side(side: f32, fallback: f32) -> f32 {
    if side.is_finite() { side.clamp(MIN_CANVAS_SIDE, MAX_CANVAS_SIDE) } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"audio_volume": 0.25}"#).unwrap();
        assert_eq!(settings.audio_volume, 0.25);
        assert_eq!(settings.canvas_size, DEFAULT_CANVAS_SIZE);
        assert_eq!(settings.tool, ToolKind::Brush);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut settings = Settings {
            canvas_size: Vec2::new(f32::NAN, 10.0),
            symmetry: SymmetryMode::Radial(40),
            audio_volume: 3.0,
            ..Default::default()
        };
        settings.sanitize();
        assert_eq!(settings.canvas_size, Vec2::new(DEFAULT_CANVAS_SIZE.x, MIN_CANVAS_SIDE));
        assert_eq!(settings.symmetry, SymmetryMode::Radial(12));
        assert_eq!(settings.audio_volume, 1.0);
    }
}
