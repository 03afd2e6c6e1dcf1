//! Process-wide layout constants for the panel engine.
//!
//! All values are fixed at startup and never mutated. `AppState` carries one
//! `LayoutConfig` and hands it by reference to the compositor.

use serde::{Deserialize, Serialize};

/// Default maximum font size, as a fraction of the panel width.
pub const DEFAULT_MAX_FONT_SIZE: f64 = 0.09;

// ────────────────────────────────────────────────────────────────────────────
// Layout configuration
// ────────────────────────────────────────────────────────────────────────────

/// Constants shared by the line-break optimizer and the geometry compositor.
///
/// `reference_line_length` and `line_count_divisor` are calibrated together against
/// the sign template's text area: at `max_font_size`, a line of about 19 characters of
/// mixed bold text (roughly 0.52 em per character, spaces included) spans the text
/// area, and 2.6 lines fill its height. Wider faces or all-caps lines run past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// CSS font-family declaration emitted in the panel's style block.
    pub font_family: String,
    pub font_weight: u16,
    /// Character count that approximately fills the text area width at `max_font_size`.
    pub reference_line_length: f64,
    /// How many lines of `max_font_size` text fit in the text area height.
    pub line_count_divisor: f64,
    /// Upper bound on wrapped lines (candidate line counts run 1..=max_lines).
    pub max_lines: usize,
    /// Maximum font size as a fraction of panel width.
    pub max_font_size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        default_layout_config()
    }
}

/// Returns the layout constants the sign template was calibrated with.
pub fn default_layout_config() -> LayoutConfig {
    LayoutConfig {
        font_family: "'Graphik', 'Inter', 'Segoe UI', Arial, sans-serif".to_string(),
        font_weight: 700,
        reference_line_length: 19.0,
        line_count_divisor: 2.6,
        max_lines: 5,
        max_font_size: DEFAULT_MAX_FONT_SIZE,
        line_height: 1.2,
    }
}

impl LayoutConfig {
    /// The CSS rule placed in the panel's `<style>` block.
    pub fn style_tag(&self) -> String {
        format!(
            ".panel-text {{ font-family: {}; font-weight: {}; }}",
            self.font_family, self.font_weight
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_config_sanity() {
        let config = default_layout_config();
        assert_eq!(config.reference_line_length, 19.0);
        assert_eq!(config.line_count_divisor, 2.6);
        assert_eq!(config.max_lines, 5);
        assert_eq!(config.max_font_size, DEFAULT_MAX_FONT_SIZE);
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn test_style_tag_declares_font_family() {
        let style = default_layout_config().style_tag();
        assert!(style.starts_with(".panel-text {"));
        assert!(style.contains("'Inter'"));
        assert!(style.contains("font-weight: 700"));
    }
}
