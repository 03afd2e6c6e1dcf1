pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::services::ServeDir;

use crate::generator::handlers as generator;
use crate::panneaux::handlers as panneaux;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let original_photos = ServeDir::new(state.photos.original_dir());
    let small_photos = ServeDir::new(state.photos.small_dir());

    Router::new()
        .route("/health", get(health::health_handler))
        // Panel engine
        .route("/og-image", get(generator::handle_og_image))
        .route("/api/generator/layout", get(generator::handle_panel_layout))
        .route(
            "/api/generator/editable",
            get(generator::handle_panel_editable),
        )
        .route("/api/generator/panel.svg", get(generator::handle_panel_svg))
        .route("/api/generator/panel.png", get(generator::handle_panel_png))
        // Billboard records
        .route(
            "/api/panneaux",
            get(panneaux::handle_list_panneaux)
                .post(panneaux::handle_create_panneau)
                .layer(DefaultBodyLimit::max(panneaux::MAX_UPLOAD_BYTES)),
        )
        .route("/api/stats/global", get(panneaux::handle_global_stats))
        .route("/api/stats/leaderboard", get(panneaux::handle_leaderboard))
        // Stored photos
        .nest_service("/photos/original", original_photos)
        .nest_service("/photos/small", small_photos)
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
