//! Geometry Compositor: resolves the full sign scene for one text and width.
//!
//! `PanelLayout` is a plain immutable value: every coordinate is resolved, every path
//! string is final, and the same `(text, width, variant)` always yields the same value.
//! Serializers (`crate::render`) only read it.

use serde::{Deserialize, Serialize};

use crate::layout::config::{default_layout_config, LayoutConfig};
use crate::layout::template::{
    wordmark_path, wordmark_units_width, PanelVariant, TemplateRatios, BORDER_NAVY,
    EMBLEM_PATHS, EMBLEM_UNITS, PANEL_WHITE, REGION_BLUE, WORDMARK_TEXT,
};
use crate::layout::wrap::{wrap_text_with, WrappedText};

// ────────────────────────────────────────────────────────────────────────────
// Scene types
// ────────────────────────────────────────────────────────────────────────────

/// A filled path in panel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub d: String,
    pub fill: String,
}

/// A filled path in local coordinates, placed by `transform`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedPath {
    pub d: String,
    pub fill: String,
    pub transform: String,
}

/// The emblem: layered paths sharing one placement transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub paths: Vec<PathNode>,
    pub transform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rounded frame drawn over the whole panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
    pub ry: f64,
    pub stroke: String,
    pub stroke_width: f64,
}

/// One wrapped line, centered on `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// The optimizer's output placed inside the text area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelText {
    pub fill: String,
    pub font_size: f64,
    pub line_height: f64,
    pub lines: Vec<TextLine>,
}

impl PanelText {
    /// The wrapped text this block was positioned from.
    pub fn wrapped(&self) -> WrappedText {
        WrappedText {
            font_size: self.font_size,
            lines: self.lines.iter().map(|l| l.text.clone()).collect(),
        }
    }
}

/// The fully resolved scene of one sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelLayout {
    pub width: f64,
    pub height: f64,
    pub view_box: String,
    pub style_tag: String,
    pub variant: PanelVariant,
    pub blue_rect: PathNode,
    pub logo: Logo,
    pub region_text: TransformedPath,
    pub white_rect: PathNode,
    /// Box the text block is centered in; editable overlays sit exactly on it.
    pub text_area: Rect,
    pub border: Border,
    pub custom_text: PanelText,
}

// ────────────────────────────────────────────────────────────────────────────
// Compositor
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `text` on a sign `target_width` wide with the default layout constants.
pub fn calculate_panel_layout(text: &str, target_width: f64, variant: PanelVariant) -> PanelLayout {
    calculate_panel_layout_with(text, target_width, variant, &default_layout_config())
}

/// Lays out `text` on a sign `target_width` wide.
///
/// Every absolute length is a template ratio times `target_width`, so doubling the
/// width doubles every coordinate. Pure and deterministic.
pub fn calculate_panel_layout_with(
    text: &str,
    target_width: f64,
    variant: PanelVariant,
    config: &LayoutConfig,
) -> PanelLayout {
    let r: &TemplateRatios = variant.ratios();
    let w = target_width;
    let h = w * r.aspect_ratio;

    let inset = r.border_inset * w;
    let (x0, y0, x1, y1) = (inset, inset, w - inset, h - inset);
    let radius = r.corner_radius * w;
    let split = r.white_top * w;

    let padding = r.text_padding * w;
    let text_area = Rect {
        x: x0 + padding,
        y: split + padding,
        width: (x1 - x0) - 2.0 * padding,
        height: (y1 - split) - 2.0 * padding,
    };

    let wrapped = wrap_text_with(text, config.max_font_size * w, config);
    let custom_text = place_text(wrapped, &text_area, config.line_height);

    PanelLayout {
        width: w,
        height: h,
        view_box: format!("0 0 {} {}", format_number(w), format_number(h)),
        style_tag: config.style_tag(),
        variant,
        blue_rect: PathNode {
            d: top_rounded_rect(x0, y0, x1, split, radius),
            fill: REGION_BLUE.to_string(),
        },
        logo: emblem(w, r),
        region_text: wordmark(w, r),
        white_rect: PathNode {
            d: bottom_rounded_rect(x0, split, x1, y1, radius),
            fill: PANEL_WHITE.to_string(),
        },
        text_area,
        border: Border {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
            rx: radius,
            ry: radius,
            stroke: BORDER_NAVY.to_string(),
            stroke_width: r.border_stroke * w,
        },
        custom_text,
    }
}

/// Centers each line horizontally and the whole block vertically in `area`.
fn place_text(wrapped: WrappedText, area: &Rect, line_height_multiple: f64) -> PanelText {
    let line_height = wrapped.font_size * line_height_multiple;
    let center_x = area.x + area.width / 2.0;
    let center_y = area.y + area.height / 2.0;
    let middle = (wrapped.lines.len() as f64 - 1.0) / 2.0;

    let lines = wrapped
        .lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextLine {
            text,
            x: center_x,
            y: center_y + (i as f64 - middle) * line_height,
        })
        .collect();

    PanelText {
        fill: REGION_BLUE.to_string(),
        font_size: wrapped.font_size,
        line_height,
        lines,
    }
}

fn emblem(w: f64, r: &TemplateRatios) -> Logo {
    let size = r.emblem_size * w;
    let x = (w - size) / 2.0;
    let y = r.emblem_top * w;
    Logo {
        paths: EMBLEM_PATHS
            .iter()
            .map(|(d, fill)| PathNode {
                d: d.to_string(),
                fill: fill.to_string(),
            })
            .collect(),
        transform: place(x, y, size / EMBLEM_UNITS),
    }
}

fn wordmark(w: f64, r: &TemplateRatios) -> TransformedPath {
    let width = r.wordmark_width * w;
    let scale = width / wordmark_units_width(WORDMARK_TEXT) as f64;
    TransformedPath {
        d: wordmark_path(WORDMARK_TEXT),
        fill: PANEL_WHITE.to_string(),
        transform: place((w - width) / 2.0, r.wordmark_top * w, scale),
    }
}

fn place(x: f64, y: f64, scale: f64) -> String {
    format!(
        "translate({} {}) scale({})",
        format_number(x),
        format_number(y),
        format_number(scale)
    )
}

/// Rectangle with its two top corners rounded.
fn top_rounded_rect(x0: f64, y0: f64, x1: f64, y1: f64, radius: f64) -> String {
    let [x0n, y0n, x1n, y1n, rn] = [x0, y0, x1, y1, radius].map(format_number);
    format!(
        "M{x0n} {}A{rn} {rn} 0 0 1 {} {y0n}H{}A{rn} {rn} 0 0 1 {x1n} {}V{y1n}H{x0n}Z",
        format_number(y0 + radius),
        format_number(x0 + radius),
        format_number(x1 - radius),
        format_number(y0 + radius),
    )
}

/// Rectangle with its two bottom corners rounded.
fn bottom_rounded_rect(x0: f64, y0: f64, x1: f64, y1: f64, radius: f64) -> String {
    let [x0n, y0n, x1n, y1n, rn] = [x0, y0, x1, y1, radius].map(format_number);
    format!(
        "M{x0n} {y0n}H{x1n}V{}A{rn} {rn} 0 0 1 {} {y1n}H{}A{rn} {rn} 0 0 1 {x0n} {}Z",
        format_number(y1 - radius),
        format_number(x1 - radius),
        format_number(x0 + radius),
        format_number(y1 - radius),
    )
}

/// Formats a coordinate for markup: at most three decimals, no trailing zeros, no `-0`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
