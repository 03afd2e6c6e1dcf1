use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// URL prefix under which small photos are served.
pub const SMALL_PHOTOS_URL: &str = "/photos/small";

/// A panel joined with its main image and its author, as read from the database.
#[derive(Debug, Clone, FromRow)]
pub struct PanneauRow {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub file_name_small: Option<String>,
    pub username: Option<String>,
}

/// A billboard sighting as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panneau {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    /// URL of the small photo, empty when the panel has none.
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PanneauRow> for Panneau {
    fn from(row: PanneauRow) -> Self {
        Panneau {
            id: row.id,
            lat: row.lat,
            lng: row.lng,
            image_url: row
                .file_name_small
                .map(|name| small_photo_url(&name))
                .unwrap_or_default(),
            comment: row.comment.filter(|c| !c.is_empty()),
            author: row.username,
            created_at: row.created_at,
        }
    }
}

pub fn small_photo_url(file_name: &str) -> String {
    format!("{SMALL_PHOTOS_URL}/{file_name}")
}

/// Everything needed to insert a panel and its main image.
#[derive(Debug, Clone)]
pub struct NewPanneau {
    pub lat: f64,
    pub lng: f64,
    pub comment: Option<String>,
    /// Trimmed, non-empty username; `None` for anonymous sightings.
    pub author: Option<String>,
    pub file_name_original: String,
    pub file_name_small: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_panels: i64,
    pub total_contributors: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub username: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(file: Option<&str>, comment: Option<&str>) -> PanneauRow {
        PanneauRow {
            id: 7,
            lat: 45.76,
            lng: 4.83,
            comment: comment.map(str::to_string),
            created_at: Utc::now(),
            file_name_small: file.map(str::to_string),
            username: None,
        }
    }

    #[test]
    fn test_row_with_photo_gets_small_url() {
        let panneau = Panneau::from(row(Some("1-small-a.jpg"), None));
        assert_eq!(panneau.image_url, "/photos/small/1-small-a.jpg");
    }

    #[test]
    fn test_row_without_photo_has_empty_url() {
        let panneau = Panneau::from(row(None, Some("")));
        assert_eq!(panneau.image_url, "");
        assert_eq!(panneau.comment, None);
    }

    #[test]
    fn test_panneau_serializes_camel_case() {
        let json = serde_json::to_value(Panneau::from(row(Some("x.jpg"), Some("vu")))).unwrap();
        assert_eq!(json["imageUrl"], "/photos/small/x.jpg");
        assert_eq!(json["comment"], "vu");
        assert!(json.get("author").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
