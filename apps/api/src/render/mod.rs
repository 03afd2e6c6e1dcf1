// Panel renderers: static markup, editable view, and bitmaps.
// Markup serializers are pure; rasterization is CPU-bound (spawn_blocking at call sites).

pub mod editable;
pub mod raster;
pub mod svg;

pub use editable::{normalize_edited_text, render_panel_editable, EditableView};
pub use raster::{PanelRasterizer, RasterResult, RenderError};
pub use svg::render_panel_to_string;
