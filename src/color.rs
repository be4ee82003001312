//! Color utilities: hex parsing, HSL conversion, harmonies and palettes.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// A color in HSL space. Hue in degrees `[0, 360)`, saturation and
/// lightness in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: normalize_hue(h),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
        }
    }

    pub fn rotate(self, degrees: f32) -> Self {
        Self::new(self.h + degrees, self.s, self.l)
    }
}

fn normalize_hue(h: f32) -> f32 {
    let h = h.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Parse `#rgb`, `#rrggbb` (the `#` is optional, case-insensitive).
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some(Color32::from_rgb(
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ))
}

/// Lowercase `#rrggbb`. Alpha is ignored.
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub fn rgb_to_hsl(color: Color32) -> Hsl {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l: l * 100.0 };
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        h: normalize_hue(h * 60.0),
        s: s * 100.0,
        l: l * 100.0,
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Color32 {
    let s = hsl.s.clamp(0.0, 100.0) / 100.0;
    let l = hsl.l.clamp(0.0, 100.0) / 100.0;
    let h = normalize_hue(hsl.h) / 60.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

pub fn hex_to_hsl(hex: &str) -> Option<Hsl> {
    parse_hex(hex).map(rgb_to_hsl)
}

pub fn hsl_to_hex(hsl: Hsl) -> String {
    to_hex(hsl_to_rgb(hsl))
}

/// Lighten (positive `amount`) or darken (negative) by lightness percent.
pub fn adjust_lightness(color: Color32, amount: f32) -> Color32 {
    let hsl = rgb_to_hsl(color);
    let adjusted = hsl_to_rgb(Hsl::new(hsl.h, hsl.s, hsl.l + amount));
    let [.., alpha] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(adjusted.r(), adjusted.g(), adjusted.b(), alpha)
}

/// Black or white, whichever reads better on top of `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_srgba_unmultiplied();
    let luminance = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luminance > 150.0 { Color32::BLACK } else { Color32::WHITE }
}

/// Linear interpolation in sRGB space, including alpha.
pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let (a, b) = (a.to_srgba_unmultiplied(), b.to_srgba_unmultiplied());
    let mix = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(mix(0), mix(1), mix(2), mix(3))
}

/// Same color with its alpha multiplied by `opacity`.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let alpha = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Harmony {
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    SplitComplementary,
    Monochromatic,
}

impl Harmony {
    pub const ALL: [Harmony; 6] = [
        Harmony::Complementary,
        Harmony::Analogous,
        Harmony::Triadic,
        Harmony::Tetradic,
        Harmony::SplitComplementary,
        Harmony::Monochromatic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Harmony::Complementary => "Complementary",
            Harmony::Analogous => "Analogous",
            Harmony::Triadic => "Triadic",
            Harmony::Tetradic => "Tetradic",
            Harmony::SplitComplementary => "Split complementary",
            Harmony::Monochromatic => "Monochromatic",
        }
    }

    /// The harmony built on `base`. The base color always comes first.
    pub fn colors(&self, base: Color32) -> Vec<Color32> {
        let hsl = rgb_to_hsl(base);
        let rotated = |offsets: &[f32]| -> Vec<Color32> {
            std::iter::once(base)
                .chain(offsets.iter().map(|&o| hsl_to_rgb(hsl.rotate(o))))
                .collect()
        };

        match self {
            Harmony::Complementary => rotated(&[180.0]),
            Harmony::Analogous => rotated(&[-30.0, 30.0]),
            Harmony::Triadic => rotated(&[120.0, 240.0]),
            Harmony::Tetradic => rotated(&[90.0, 180.0, 270.0]),
            Harmony::SplitComplementary => rotated(&[150.0, 210.0]),
            Harmony::Monochromatic => std::iter::once(base)
                .chain([-30.0, -15.0, 15.0, 30.0].iter().map(|&step| {
                    hsl_to_rgb(Hsl::new(hsl.h, hsl.s, hsl.l + step))
                }))
                .collect(),
        }
    }
}

/// A named set of swatches.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    pub colors: &'static [&'static str],
}

impl Palette {
    pub fn swatches(&self) -> Vec<Color32> {
        self.colors.iter().filter_map(|hex| parse_hex(hex)).collect()
    }
}

pub const CALMING_PALETTES: &[Palette] = &[
    Palette {
        name: "Ocean breeze",
        colors: &["#e0f7fa", "#80deea", "#26c6da", "#00838f", "#004d55"],
    },
    Palette {
        name: "Lavender fields",
        colors: &["#f3e5f5", "#ce93d8", "#ab47bc", "#7b1fa2", "#4a148c"],
    },
    Palette {
        name: "Forest walk",
        colors: &["#e8f5e9", "#a5d6a7", "#66bb6a", "#2e7d32", "#1b5e20"],
    },
    Palette {
        name: "Sunset glow",
        colors: &["#fff3e0", "#ffcc80", "#ffa726", "#ef6c00", "#bf360c"],
    },
    Palette {
        name: "Soft earth",
        colors: &["#efebe9", "#bcaaa4", "#8d6e63", "#5d4037", "#3e2723"],
    },
    Palette {
        name: "Pastel dream",
        colors: &["#ffd1dc", "#ffe5b4", "#fffacd", "#c1e1c1", "#aec6cf"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_normalization_wraps() {
        assert_eq!(Hsl::new(370.0, 50.0, 50.0).h, 10.0);
        assert_eq!(Hsl::new(-90.0, 50.0, 50.0).h, 270.0);
        assert_eq!(Hsl::new(0.0, 150.0, -5.0), Hsl { h: 0.0, s: 100.0, l: 0.0 });
    }

    #[test]
    fn lightness_adjustment_keeps_alpha() {
        let color = Color32::from_rgba_unmultiplied(200, 50, 50, 128);
        let lighter = adjust_lightness(color, 20.0);
        assert_eq!(lighter.a(), 128);
        assert!(rgb_to_hsl(lighter).l > rgb_to_hsl(color).l);
    }

    #[test]
    fn contrast_text_picks_readable_color() {
        assert_eq!(contrast_text(Color32::WHITE), Color32::BLACK);
        assert_eq!(contrast_text(Color32::from_rgb(20, 20, 60)), Color32::WHITE);
    }

    #[test]
    fn parse_hex_accepts_short_and_long_forms() {
        assert_eq!(parse_hex("#ff8000"), Some(Color32::from_rgb(255, 128, 0)));
        assert_eq!(parse_hex("  FF8000 "), Some(Color32::from_rgb(255, 128, 0)));
        assert_eq!(parse_hex("#f80"), Some(Color32::from_rgb(255, 136, 0)));
    }

    #[test]
    fn parse_hex_rejects_malformed_input() {
        for input in ["#+12345", "#-12", "#12345", "#gg0000", "", "#", "#ff 000"] {
            assert_eq!(parse_hex(input), None, "{input:?}");
        }
    }

    #[test]
    fn hex_hsl_round_trip_is_exact() {
        let colors = [
            "#000000", "#ffffff", "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#00ffff",
            "#ff00ff", "#808080", "#26c6da", "#7b1fa2", "#ffd1dc", "#3e2723", "#010203",
        ];
        for hex in colors {
            let hsl = hex_to_hsl(hex).unwrap();
            assert_eq!(hsl_to_hex(hsl), hex, "{hsl:?}");
        }
    }

    #[test]
    fn round_trip_holds_across_the_cube() {
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(17) {
                    let color = Color32::from_rgb(r, g, b);
                    assert_eq!(hsl_to_rgb(rgb_to_hsl(color)), color);
                }
            }
        }
    }

    #[test]
    fn primary_hues() {
        assert_eq!(hex_to_hsl("#ff0000"), Some(Hsl { h: 0.0, s: 100.0, l: 50.0 }));
        assert_eq!(hex_to_hsl("#00ff00").map(|c| c.h), Some(120.0));
        assert_eq!(hex_to_hsl("#0000ff").map(|c| c.h), Some(240.0));
        assert_eq!(hsl_to_hex(Hsl::new(180.0, 100.0, 50.0)), "#00ffff");
    }

    #[test]
    fn harmony_sizes_start_with_base() {
        let base = Color32::from_rgb(38, 198, 218);
        let sizes: Vec<usize> = Harmony::ALL.iter().map(|h| h.colors(base).len()).collect();
        assert_eq!(sizes, vec![2, 3, 3, 4, 3, 5]);
        for harmony in Harmony::ALL {
            assert_eq!(harmony.colors(base)[0], base, "{}", harmony.label());
        }
    }

    #[test]
    fn complementary_is_opposite_hue() {
        let colors = Harmony::Complementary.colors(Color32::RED);
        assert_eq!(colors[1], Color32::from_rgb(0, 255, 255));
        let triad = Harmony::Triadic.colors(Color32::RED);
        assert_eq!(&triad[1..], &[Color32::from_rgb(0, 255, 0), Color32::from_rgb(0, 0, 255)]);
    }

    #[test]
    fn palettes_parse_completely() {
        for palette in CALMING_PALETTES {
            assert_eq!(palette.swatches().len(), palette.colors.len(), "{}", palette.name);
        }
    }
}
