use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::panneau::{small_photo_url, GlobalStats, LeaderboardEntry, NewPanneau, Panneau};
use crate::state::AppState;

/// Upper bound of a whole upload request.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const LEADERBOARD_SIZE: i64 = 10;

const MAX_COMMENT_CHARS: usize = 500;
const MAX_AUTHOR_CHARS: usize = 50;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPanneau {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub image_url: String,
    pub comment: Option<String>,
    pub author: Option<String>,
}

/// Fields collected from a multipart upload, before validation.
#[derive(Default)]
struct UploadForm {
    image: Option<(String, Bytes)>,
    lat: Option<String>,
    lng: Option<String>,
    comment: Option<String>,
    author: Option<String>,
}

/// GET /api/panneaux
pub async fn handle_list_panneaux(
    State(state): State<AppState>,
) -> Result<Json<Vec<Panneau>>, AppError> {
    Ok(Json(state.repo.list_panneaux().await?))
}

/// POST /api/panneaux (multipart: image, lat, lng, comment?, author?)
pub async fn handle_create_panneau(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedPanneau>), AppError> {
    let form = read_form(multipart).await?;

    let (file_name, data) = form
        .image
        .ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;
    let lat = parse_coordinate(form.lat.as_deref(), "lat", 90.0)?;
    let lng = parse_coordinate(form.lng.as_deref(), "lng", 180.0)?;
    let comment = optional_text(form.comment, MAX_COMMENT_CHARS, "comment")?;
    let author = optional_text(form.author, MAX_AUTHOR_CHARS, "author")?;

    // Decoding and resizing is CPU-bound.
    let photos = Arc::clone(&state.photos);
    let stored = tokio::task::spawn_blocking(move || photos.store(&file_name, &data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in photo store: {e}")))??;

    let image_url = small_photo_url(&stored.file_name_small);
    let created = state
        .repo
        .create_panneau(NewPanneau {
            lat,
            lng,
            comment: comment.clone(),
            author: author.clone(),
            file_name_original: stored.file_name_original.clone(),
            file_name_small: stored.file_name_small.clone(),
        })
        .await;

    let id = match created {
        Ok(id) => id,
        Err(e) => {
            // No row references the photos: drop them.
            let photos = Arc::clone(&state.photos);
            if let Err(join) = tokio::task::spawn_blocking(move || photos.remove(&stored)).await {
                warn!("spawn_blocking failed in photo cleanup: {join}");
            }
            return Err(e);
        }
    };

    info!(id, lat, lng, author = author.as_deref().unwrap_or("-"), "Panneau recorded");

    Ok((
        StatusCode::CREATED,
        Json(CreatedPanneau {
            id,
            lat,
            lng,
            image_url,
            comment,
            author,
        }),
    ))
}

/// GET /api/stats/global
pub async fn handle_global_stats(
    State(state): State<AppState>,
) -> Result<Json<GlobalStats>, AppError> {
    Ok(Json(state.repo.global_stats().await?))
}

/// GET /api/stats/leaderboard
pub async fn handle_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    Ok(Json(state.repo.leaderboard(LEADERBOARD_SIZE).await?))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or("photo").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
            form.image = Some((file_name, data));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        match name.as_str() {
            "lat" => form.lat = Some(value),
            "lng" => form.lng = Some(value),
            "comment" => form.comment = Some(value),
            "author" => form.author = Some(value),
            _ => {}
        }
    }
    Ok(form)
}

fn parse_coordinate(raw: Option<&str>, field: &str, bound: f64) -> Result<f64, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| AppError::Validation(format!("{field} must be a number")))?;
    if !value.is_finite() || value.abs() > bound {
        return Err(AppError::Validation(format!(
            "{field} must be between -{bound} and {bound}"
        )));
    }
    Ok(value)
}

/// Trims; empty becomes `None`.
fn optional_text(raw: Option<String>, max_chars: usize, field: &str) -> Result<Option<String>, AppError> {
    let Some(value) = raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_chars} characters"
        )));
    }
    Ok(Some(value))
}
