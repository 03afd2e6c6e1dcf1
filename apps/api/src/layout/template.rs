//! Fixed assets and ratio tables of the regional sign template.
//!
//! Every ratio is a fraction of the panel width, so geometry scales linearly with the
//! requested width. Asset path data (emblem, wordmark) is expressed in local units and
//! placed with a transform.
//!
//! The wordmark is drawn from a 5×7 pixel font, one filled run per glyph row. It keeps
//! the template free of any font dependency: only the user's text needs a real font.

use serde::{Deserialize, Serialize};

pub const REGION_BLUE: &str = "#1d4f91";
pub const PANEL_WHITE: &str = "#ffffff";
pub const BORDER_NAVY: &str = "#0f2d57";
pub const ACCENT_RED: &str = "#e4032e";

/// Text drawn by the wordmark path.
pub const WORDMARK_TEXT: &str = "AUVERGNE-RHONE-ALPES";

/// Side of the emblem's local coordinate box.
pub const EMBLEM_UNITS: f64 = 100.0;

// ────────────────────────────────────────────────────────────────────────────
// Variants
// ────────────────────────────────────────────────────────────────────────────

/// The two visual presets of the sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelVariant {
    /// Full-size sign: generator page, downloads, social previews.
    #[default]
    Full,
    /// Compact sign for inline placements; heavier frame and a larger emblem share.
    Compact,
}

impl From<bool> for PanelVariant {
    /// `true` selects the compact preset.
    fn from(compact: bool) -> Self {
        if compact {
            PanelVariant::Compact
        } else {
            PanelVariant::Full
        }
    }
}

impl std::str::FromStr for PanelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(PanelVariant::Full),
            "compact" => Ok(PanelVariant::Compact),
            other => Err(format!("unknown panel variant '{other}'")),
        }
    }
}

/// Layout ratios of one variant, all relative to the panel width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateRatios {
    /// Panel height / width.
    pub aspect_ratio: f64,
    /// Border inset from every panel edge.
    pub border_inset: f64,
    pub border_stroke: f64,
    pub corner_radius: f64,
    /// Y of the boundary between the blue header and the white text area.
    pub white_top: f64,
    /// Padding between the white rect and the text area, on every side.
    pub text_padding: f64,
    pub emblem_size: f64,
    pub emblem_top: f64,
    pub wordmark_width: f64,
    pub wordmark_top: f64,
}

const FULL_RATIOS: TemplateRatios = TemplateRatios {
    aspect_ratio: 1.2,
    border_inset: 0.025,
    border_stroke: 0.012,
    corner_radius: 0.04,
    white_top: 0.78,
    text_padding: 0.03,
    emblem_size: 0.34,
    emblem_top: 0.1,
    wordmark_width: 0.7,
    wordmark_top: 0.56,
};

const COMPACT_RATIOS: TemplateRatios = TemplateRatios {
    aspect_ratio: 1.2,
    border_inset: 0.03,
    border_stroke: 0.02,
    corner_radius: 0.05,
    white_top: 0.74,
    text_padding: 0.025,
    emblem_size: 0.38,
    emblem_top: 0.08,
    wordmark_width: 0.8,
    wordmark_top: 0.56,
};

impl PanelVariant {
    pub fn ratios(self) -> &'static TemplateRatios {
        match self {
            PanelVariant::Full => &FULL_RATIOS,
            PanelVariant::Compact => &COMPACT_RATIOS,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Emblem
// ────────────────────────────────────────────────────────────────────────────

/// Emblem layers in paint order, as `(path data, fill)` in a 100×100 box.
pub const EMBLEM_PATHS: [(&str, &str); 4] = [
    (
        "M50 0A50 50 0 1 1 50 100A50 50 0 1 1 50 0Z",
        PANEL_WHITE,
    ),
    ("M14 70L38 34L52 54L62 42L86 70Z", REGION_BLUE),
    ("M38 34L45 44.5L38 41L31 44.5Z", PANEL_WHITE),
    ("M14 76H86V83H14Z", ACCENT_RED),
];

// ────────────────────────────────────────────────────────────────────────────
// Wordmark pixel font
// ────────────────────────────────────────────────────────────────────────────

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
/// Horizontal advance per glyph, including one column of spacing.
pub const GLYPH_ADVANCE: usize = GLYPH_WIDTH + 1;

/// Row bitmaps, most significant of the low 5 bits is the leftmost pixel.
#[rustfmt::skip]
fn glyph(c: char) -> [u8; GLYPH_HEIGHT] {
    match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        _ => [0; GLYPH_HEIGHT],
    }
}

/// Width of `text` in wordmark units (no trailing spacing column).
pub fn wordmark_units_width(text: &str) -> usize {
    match text.chars().count() {
        0 => 0,
        n => n * GLYPH_ADVANCE - 1,
    }
}

/// Builds path data for `text` in the pixel font, one subpath per horizontal run.
pub fn wordmark_path(text: &str) -> String {
    let mut d = String::new();
    for (index, c) in text.chars().enumerate() {
        let origin = index * GLYPH_ADVANCE;
        for (y, row) in glyph(c).iter().enumerate() {
            let mut x = 0;
            while x < GLYPH_WIDTH {
                if !pixel_on(*row, x) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < GLYPH_WIDTH && pixel_on(*row, x) {
                    x += 1;
                }
                let run = x - start;
                d.push_str(&format!("M{} {}h{run}v1h-{run}Z", origin + start, y));
            }
        }
    }
    d
}

fn pixel_on(row: u8, x: usize) -> bool {
    row & (1 << (GLYPH_WIDTH - 1 - x)) != 0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_from_flag() {
        assert_eq!(PanelVariant::from(false), PanelVariant::Full);
        assert_eq!(PanelVariant::from(true), PanelVariant::Compact);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("full".parse::<PanelVariant>(), Ok(PanelVariant::Full));
        assert_eq!("Compact".parse::<PanelVariant>(), Ok(PanelVariant::Compact));
        assert!("huge".parse::<PanelVariant>().is_err());
    }

    #[test]
    fn test_ratios_keep_text_area_inside_panel() {
        for variant in [PanelVariant::Full, PanelVariant::Compact] {
            let r = variant.ratios();
            let bottom = r.aspect_ratio - r.border_inset;
            assert!(r.white_top < bottom - 2.0 * r.text_padding);
            assert!(r.emblem_top + r.emblem_size < r.wordmark_top);
            assert!(r.wordmark_width < 1.0 - 2.0 * r.border_inset);
        }
    }

    #[test]
    fn test_text_area_fits_reference_line() {
        let config = crate::layout::default_layout_config();
        // Average advance of mixed bold text, spaces included.
        let em_per_char = 0.52;
        let line_width = config.reference_line_length * config.max_font_size * em_per_char;
        for variant in [PanelVariant::Full, PanelVariant::Compact] {
            let r = variant.ratios();
            let area_width = 1.0 - 2.0 * r.border_inset - 2.0 * r.text_padding;
            assert!(
                line_width <= area_width,
                "{variant:?}: {line_width} exceeds text area {area_width}"
            );
        }
    }

    #[test]
    fn test_wordmark_glyphs_cover_wordmark_text() {
        for c in WORDMARK_TEXT.chars() {
            assert!(glyph(c).iter().any(|row| *row != 0), "missing glyph for {c:?}");
        }
    }

    #[test]
    fn test_wordmark_units_width() {
        assert_eq!(wordmark_units_width(""), 0);
        assert_eq!(wordmark_units_width("A"), 5);
        assert_eq!(wordmark_units_width(WORDMARK_TEXT), 20 * 6 - 1);
    }

    #[test]
    fn test_wordmark_path_merges_runs() {
        // '-' is a single 5-pixel run on row 3.
        assert_eq!(wordmark_path("-"), "M0 3h5v1h-5Z");
        // The second glyph starts one advance to the right.
        assert_eq!(wordmark_path(" -"), "M6 3h5v1h-5Z");
    }

    #[test]
    fn test_wordmark_path_is_deterministic() {
        assert_eq!(wordmark_path(WORDMARK_TEXT), wordmark_path(WORDMARK_TEXT));
        assert!(wordmark_path(WORDMARK_TEXT).starts_with("M1 0h3v1h-3Z"));
    }
}
