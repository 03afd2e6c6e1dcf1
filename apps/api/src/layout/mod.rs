// Panel layout engine: composition search, line-break optimizer, geometry compositor.
// Pure and synchronous; callers on the async runtime may invoke it inline.

pub mod compositions;
pub mod config;
pub mod panel;
pub mod template;
pub mod wrap;

// Re-export the public API consumed by the renderers and handlers.
pub use config::{default_layout_config, LayoutConfig};
pub use panel::{calculate_panel_layout_with, PanelLayout};
pub use template::PanelVariant;
