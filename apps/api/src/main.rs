mod config;
mod db;
mod errors;
mod generator;
mod layout;
mod models;
mod panneaux;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::layout::default_layout_config;
use crate::panneaux::{PgPanneauRepository, PhotoStore};
use crate::render::PanelRasterizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AURA catcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Photo directories
    let photos = PhotoStore::new(config.original_photos_dir(), config.small_photos_dir());
    photos
        .ensure_dirs()
        .with_context(|| format!("cannot create photo directories under {}", config.data_dir.display()))?;
    info!(data_dir = %config.data_dir.display(), "Photo store ready");

    // Rasterizer: a missing font is logged and only disables bitmap routes
    let rasterizer = PanelRasterizer::load(&config.font_path);

    let layout_config = default_layout_config();
    info!(
        "Layout config: max font {} of width, {} lines max",
        layout_config.max_font_size, layout_config.max_lines
    );

    // Build app state
    let state = AppState {
        repo: Arc::new(PgPanneauRepository::new(db)),
        photos: Arc::new(photos),
        rasterizer: Arc::new(rasterizer),
        layout_config: Arc::new(layout_config),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
