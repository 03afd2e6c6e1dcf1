//! Panel generator endpoints.
//!
//! Layout and markup are computed inline. Rasterization goes through
//! `spawn_blocking`; its failures answer with a bare 500 and no structured body.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::errors::AppError;
use crate::layout::{calculate_panel_layout_with, PanelLayout, PanelVariant};
use crate::render::{
    normalize_edited_text, render_panel_editable, render_panel_to_string, EditableView,
    RasterResult,
};
use crate::state::AppState;

pub const DEFAULT_PANEL_TEXT: &str = "La Région soutient la raclette";
pub const DEFAULT_PANEL_WIDTH: f64 = 470.0;
pub const MAX_PANEL_WIDTH: f64 = 4096.0;
/// Longest text accepted over HTTP, on every generator route. The optimizer's search
/// grows with the word count; the layout functions themselves take any length.
pub const MAX_TEXT_CHARS: usize = 120;

const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";
const SVG_DISPOSITION: &str = "attachment; filename=\"panneau-aura.svg\"";
const PNG_DISPOSITION: &str = "attachment; filename=\"panneau-aura.png\"";

#[derive(Debug, Default, Deserialize)]
pub struct TextQuery {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PanelQuery {
    pub text: Option<String>,
    pub width: Option<f64>,
    pub variant: Option<String>,
}

/// A validated generator request.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRequest {
    pub text: String,
    pub width: f64,
    pub variant: PanelVariant,
}

impl PanelQuery {
    pub fn validate(self) -> Result<PanelRequest, AppError> {
        let text = resolve_text(self.text.as_deref())?;

        let width = self.width.unwrap_or(DEFAULT_PANEL_WIDTH);
        if !width.is_finite() || width <= 0.0 || width > MAX_PANEL_WIDTH {
            return Err(AppError::Validation(format!(
                "width must be greater than 0 and at most {MAX_PANEL_WIDTH}"
            )));
        }

        let variant = match self.variant.as_deref().map(str::trim) {
            None | Some("") => PanelVariant::default(),
            Some(raw) => raw.parse().map_err(AppError::Validation)?,
        };

        Ok(PanelRequest {
            text,
            width,
            variant,
        })
    }
}

/// Absent or empty text falls back to the default sentence. Line breaks typed into an
/// editor are accepted and become spaces.
pub fn resolve_text(raw: Option<&str>) -> Result<String, AppError> {
    let text = match raw.map(normalize_edited_text) {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Ok(DEFAULT_PANEL_TEXT.to_string()),
    };
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "text must be at most {MAX_TEXT_CHARS} characters"
        )));
    }
    Ok(text)
}

fn layout_for(state: &AppState, request: &PanelRequest) -> PanelLayout {
    calculate_panel_layout_with(
        &request.text,
        request.width,
        request.variant,
        &state.layout_config,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /og-image?text=
pub async fn handle_og_image(
    State(state): State<AppState>,
    Query(query): Query<TextQuery>,
) -> Response {
    let text = match resolve_text(query.text.as_deref()) {
        Ok(text) => text,
        Err(_) => return (StatusCode::BAD_REQUEST, "Text too long").into_response(),
    };
    debug!(text = %text, "Generating OG image");

    let rasterizer = Arc::clone(&state.rasterizer);
    let config = Arc::clone(&state.layout_config);
    let result =
        tokio::task::spawn_blocking(move || rasterizer.og_image(&text, &config)).await;

    match result {
        Ok(Ok(image)) => raster_response(image, None),
        Ok(Err(e)) => AppError::Render(e).into_response(),
        Err(e) => {
            error!("spawn_blocking failed in og image: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating image").into_response()
        }
    }
}

/// GET /api/generator/layout?text=&width=&variant=
pub async fn handle_panel_layout(
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<Json<PanelLayout>, AppError> {
    let request = query.validate()?;
    Ok(Json(layout_for(&state, &request)))
}

/// GET /api/generator/editable?text=&width=&variant=
pub async fn handle_panel_editable(
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<Json<EditableView>, AppError> {
    let request = query.validate()?;
    let layout = layout_for(&state, &request);
    Ok(Json(render_panel_editable(&layout, &state.layout_config)))
}

/// GET /api/generator/panel.svg?text=&width=&variant=
pub async fn handle_panel_svg(
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<Response, AppError> {
    let request = query.validate()?;
    let svg = render_panel_to_string(&layout_for(&state, &request));
    Ok((
        [
            (header::CONTENT_TYPE, SVG_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, SVG_DISPOSITION),
        ],
        svg,
    )
        .into_response())
}

/// GET /api/generator/panel.png?text=&width=&variant=
pub async fn handle_panel_png(
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<Response, AppError> {
    let request = query.validate()?;
    let layout = layout_for(&state, &request);

    let rasterizer = Arc::clone(&state.rasterizer);
    let image: RasterResult = tokio::task::spawn_blocking(move || rasterizer.png_export(&layout))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in png export: {e}")))??;

    Ok(raster_response(image, Some(PNG_DISPOSITION)))
}

fn raster_response(image: RasterResult, disposition: Option<&'static str>) -> Response {
    match disposition {
        Some(disposition) => (
            [
                (header::CONTENT_TYPE, image.content_type),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            image.bytes,
        )
            .into_response(),
        None => ([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: Option<&str>, width: Option<f64>, variant: Option<&str>) -> PanelQuery {
        PanelQuery {
            text: text.map(str::to_string),
            width,
            variant: variant.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_defaults() {
        let request = query(None, None, None).validate().unwrap();
        assert_eq!(request.text, DEFAULT_PANEL_TEXT);
        assert_eq!(request.width, DEFAULT_PANEL_WIDTH);
        assert_eq!(request.variant, PanelVariant::Full);
    }

    #[test]
    fn test_validate_empty_text_uses_default() {
        let request = query(Some("  "), None, Some("")).validate().unwrap();
        assert_eq!(request.text, DEFAULT_PANEL_TEXT);
        assert_eq!(request.variant, PanelVariant::Full);
    }

    #[test]
    fn test_validate_rejects_bad_width() {
        for width in [0.0, -10.0, 5000.0, f64::INFINITY, f64::NAN] {
            assert!(
                matches!(query(None, Some(width), None).validate(), Err(AppError::Validation(_))),
                "width {width} should be rejected"
            );
        }
        assert!(query(None, Some(4096.0), None).validate().is_ok());
    }

    #[test]
    fn test_validate_variant() {
        let request = query(None, None, Some("compact")).validate().unwrap();
        assert_eq!(request.variant, PanelVariant::Compact);
        assert!(query(None, None, Some("poster")).validate().is_err());
    }

    #[test]
    fn test_resolve_text_normalizes_and_caps() {
        assert_eq!(resolve_text(Some("Vive\nla raclette")).unwrap(), "Vive la raclette");
        let long = "a ".repeat(MAX_TEXT_CHARS);
        assert!(resolve_text(Some(&long)).is_err());
        assert!(resolve_text(Some(&"é".repeat(MAX_TEXT_CHARS))).is_ok());
    }
}
