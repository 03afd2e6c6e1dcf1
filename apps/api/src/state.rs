use std::sync::Arc;

use crate::layout::LayoutConfig;
use crate::panneaux::{PanneauRepository, PhotoStore};
use crate::render::PanelRasterizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Panel records. Default: PgPanneauRepository; tests swap in the in-memory one.
    pub repo: Arc<dyn PanneauRepository>,
    pub photos: Arc<PhotoStore>,
    /// Built once at startup; holds the read-only font database.
    pub rasterizer: Arc<PanelRasterizer>,
    /// Layout constants handed by reference to the compositor.
    pub layout_config: Arc<LayoutConfig>,
}
