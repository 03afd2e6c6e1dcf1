//! Rasterization Pipeline: panel markup to bitmaps.
//!
//! # Paths
//! - Server (`og_image`): render at native size → letterbox into a transparent
//!   1200×630 canvas → lossy WebP at `OG_WEBP_QUALITY`.
//! - Export (`png_export`): render at `EXPORT_SCALE` → PNG.
//!
//! Both are CPU-bound: callers on the async runtime must go through
//! `tokio::task::spawn_blocking`. The only shared resource is the font database,
//! loaded once and never written again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use resvg::usvg::fontdb::Database;
use resvg::{tiny_skia, usvg};
use thiserror::Error;
use tracing::{info, warn};

use crate::layout::{calculate_panel_layout_with, LayoutConfig, PanelLayout, PanelVariant};
use crate::render::svg::render_panel_to_string;

/// Panel width used for social preview images.
pub const OG_TARGET_WIDTH: f64 = 470.0;
pub const OG_CANVAS_WIDTH: u32 = 1200;
pub const OG_CANVAS_HEIGHT: u32 = 630;
/// Pixel scale of downloadable PNG exports.
pub const EXPORT_SCALE: f32 = 2.0;
/// Lossy quality (0-100) of social preview images.
pub const OG_WEBP_QUALITY: f32 = 40.0;

pub const WEBP_CONTENT_TYPE: &str = "image/webp";
pub const PNG_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font asset unavailable: {0}")]
    FontUnavailable(String),

    #[error("invalid panel markup: {0}")]
    Markup(#[from] usvg::Error),

    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("webp encoding failed: {0}")]
    Webp(String),
}

/// A compressed bitmap and its content type.
#[derive(Debug, Clone)]
pub struct RasterResult {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Rasterizer
// ────────────────────────────────────────────────────────────────────────────

/// Renders panel markup with a single bundled font and no system-font fallback.
pub struct PanelRasterizer {
    font_path: PathBuf,
    /// `None` when the font could not be loaded; rasterization then fails while pure
    /// layout keeps working.
    fonts: Option<Arc<Database>>,
}

impl PanelRasterizer {
    /// Loads the bundled font. A missing or unreadable file is logged, not fatal.
    pub fn load(font_path: &Path) -> Self {
        let fonts = match std::fs::read(font_path) {
            Ok(data) => {
                let mut db = Database::new();
                db.load_font_data(data);
                let family = db
                    .faces()
                    .next()
                    .and_then(|face| face.families.first().map(|(name, _)| name.clone()));
                match family {
                    Some(name) => {
                        info!(path = %font_path.display(), family = %name, "Panel font loaded");
                        db.set_sans_serif_family(name);
                        Some(Arc::new(db))
                    }
                    None => {
                        warn!(path = %font_path.display(), "Panel font file holds no usable face");
                        None
                    }
                }
            }
            Err(e) => {
                warn!(path = %font_path.display(), error = %e, "Panel font not readable; rasterization disabled");
                None
            }
        };

        PanelRasterizer {
            font_path: font_path.to_path_buf(),
            fonts,
        }
    }

    /// A rasterizer with an empty font database: shapes render, text is skipped.
    #[cfg(test)]
    pub(crate) fn without_fonts() -> Self {
        PanelRasterizer {
            font_path: PathBuf::from("<none>"),
            fonts: Some(Arc::new(Database::new())),
        }
    }

    pub fn has_font(&self) -> bool {
        self.fonts.is_some()
    }

    /// Renders `svg` into an RGBA image at `scale` times its declared size.
    pub fn rasterize(&self, svg: &str, scale: f32) -> Result<RgbaImage, RenderError> {
        let fonts = self
            .fonts
            .as_ref()
            .ok_or_else(|| RenderError::FontUnavailable(self.font_path.display().to_string()))?;

        let options = usvg::Options {
            fontdb: Arc::clone(fonts),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)?;

        let size = tree.size();
        let width = ((size.width() * scale).round() as u32).max(1);
        let height = ((size.height() * scale).round() as u32).max(1);
        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap_to_image(&pixmap))
    }

    /// Server path: the social preview image for `text`.
    pub fn og_image(&self, text: &str, config: &LayoutConfig) -> Result<RasterResult, RenderError> {
        let layout = calculate_panel_layout_with(text, OG_TARGET_WIDTH, PanelVariant::Full, config);
        let rendered = self.rasterize(&render_panel_to_string(&layout), 1.0)?;
        let canvas = letterbox(&rendered, OG_CANVAS_WIDTH, OG_CANVAS_HEIGHT);
        Ok(RasterResult {
            bytes: encode_webp(&canvas, OG_WEBP_QUALITY)?,
            content_type: WEBP_CONTENT_TYPE,
        })
    }

    /// Export path: the layout as a PNG at `EXPORT_SCALE`.
    pub fn png_export(&self, layout: &PanelLayout) -> Result<RasterResult, RenderError> {
        let rendered = self.rasterize(&render_panel_to_string(layout), EXPORT_SCALE)?;
        Ok(RasterResult {
            bytes: encode_png(&rendered)?,
            content_type: PNG_CONTENT_TYPE,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bitmap helpers
// ────────────────────────────────────────────────────────────────────────────

/// tiny-skia stores premultiplied alpha; image buffers are straight alpha.
fn pixmap_to_image(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

/// Scales `image` to fit inside the canvas, preserving aspect ratio, and centers it on
/// a fully transparent background.
pub fn letterbox(image: &RgbaImage, canvas_width: u32, canvas_height: u32) -> RgbaImage {
    let (iw, ih) = image.dimensions();
    let scale = (canvas_width as f64 / iw as f64).min(canvas_height as f64 / ih as f64);
    let width = ((iw as f64 * scale).round() as u32).clamp(1, canvas_width);
    let height = ((ih as f64 * scale).round() as u32).clamp(1, canvas_height);

    let resized = imageops::resize(image, width, height, FilterType::Lanczos3);
    let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 0]));
    imageops::replace(
        &mut canvas,
        &resized,
        ((canvas_width - width) / 2) as i64,
        ((canvas_height - height) / 2) as i64,
    );
    canvas
}

/// Lossy WebP; the alpha plane is kept so letterbox padding stays transparent.
pub fn encode_webp(image: &RgbaImage, quality: f32) -> Result<Vec<u8>, RenderError> {
    let encoded = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height())
        .encode_simple(false, quality)
        .map_err(|e| RenderError::Webp(format!("{e:?}")))?;
    Ok(encoded.to_vec())
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
