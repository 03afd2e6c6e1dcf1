//! Editable-view description: the static panel without its text, plus an overlay
//! descriptor that an interactive editor places exactly over the text area.
//!
//! The overlay shows the wrapped lines joined by newlines, so the editor starts from
//! the same wrap the static view shows. Whatever the user types goes back through
//! `normalize_edited_text` before the next layout.

use serde::{Deserialize, Serialize};

use crate::layout::panel::PanelLayout;
use crate::layout::LayoutConfig;
use crate::render::svg::render_panel_without_text;

/// Position and typography of the in-place text editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableOverlay {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_family: String,
    pub font_weight: u16,
    pub font_size: f64,
    pub line_height: f64,
    pub color: String,
    pub text_align: String,
    /// Current content: the wrapped lines joined by `\n`.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableView {
    /// The panel markup with the text block left out.
    pub background_svg: String,
    pub overlay: EditableOverlay,
}

/// Binds a layout into an editable view description.
pub fn render_panel_editable(layout: &PanelLayout, config: &LayoutConfig) -> EditableView {
    let text = &layout.custom_text;
    let area = layout.text_area;

    EditableView {
        background_svg: render_panel_without_text(layout),
        overlay: EditableOverlay {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height,
            font_family: config.font_family.clone(),
            font_weight: config.font_weight,
            font_size: text.font_size,
            line_height: text.line_height,
            color: text.fill.clone(),
            text_align: "center".to_string(),
            value: text
                .lines
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        },
    }
}

/// Turns editor content back into layout input: line breaks become single spaces.
pub fn normalize_edited_text(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::panel::calculate_panel_layout;
    use crate::layout::{default_layout_config, PanelVariant};

    #[test]
    fn test_overlay_sits_on_text_area() {
        let layout = calculate_panel_layout("La Région soutient la raclette", 470.0, PanelVariant::Full);
        let view = render_panel_editable(&layout, &default_layout_config());
        assert_eq!(view.overlay.x, layout.text_area.x);
        assert_eq!(view.overlay.y, layout.text_area.y);
        assert_eq!(view.overlay.width, layout.text_area.width);
        assert_eq!(view.overlay.height, layout.text_area.height);
        assert_eq!(view.overlay.font_size, layout.custom_text.font_size);
        assert_eq!(view.overlay.color, layout.custom_text.fill);
    }

    #[test]
    fn test_overlay_value_round_trips_through_normalize() {
        let text = "Une phrase assez longue pour passer sur plusieurs lignes";
        let layout = calculate_panel_layout(text, 470.0, PanelVariant::Full);
        let view = render_panel_editable(&layout, &default_layout_config());
        assert!(view.overlay.value.contains('\n'));
        assert_eq!(normalize_edited_text(&view.overlay.value), text);
    }

    #[test]
    fn test_background_has_no_text() {
        let layout = calculate_panel_layout("Texte caché", 470.0, PanelVariant::Compact);
        let view = render_panel_editable(&layout, &default_layout_config());
        assert!(!view.background_svg.contains("<text"));
        assert!(view.background_svg.contains(&layout.white_rect.d));
    }

    #[test]
    fn test_normalize_edited_text() {
        assert_eq!(normalize_edited_text("a\nb\r\nc\rd"), "a b c d");
        assert_eq!(normalize_edited_text("sans retour"), "sans retour");
    }
}
