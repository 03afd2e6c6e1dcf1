//! Panel persistence behind a trait, so handlers never see the storage backend.
//!
//! Carried in `AppState` as `Arc<dyn PanneauRepository>`. `PgPanneauRepository` is the
//! production backend; tests use the in-memory one.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::panneau::{GlobalStats, LeaderboardEntry, NewPanneau, Panneau, PanneauRow};

#[async_trait]
pub trait PanneauRepository: Send + Sync {
    /// Every panel, newest first.
    async fn list_panneaux(&self) -> Result<Vec<Panneau>, AppError>;

    /// Inserts a panel, its main image and (when named) its author. Returns the panel id.
    async fn create_panneau(&self, new: NewPanneau) -> Result<i64, AppError>;

    async fn global_stats(&self) -> Result<GlobalStats, AppError>;

    /// Top contributors by panel count, ties broken by username.
    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgPanneauRepository {
    pool: PgPool,
}

impl PgPanneauRepository {
    pub fn new(pool: PgPool) -> Self {
        PgPanneauRepository { pool }
    }
}

#[async_trait]
impl PanneauRepository for PgPanneauRepository {
    async fn list_panneaux(&self) -> Result<Vec<Panneau>, AppError> {
        let rows: Vec<PanneauRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.lat, p.lng, p.comment, p.created_at,
                   i.file_name_small, u.username
            FROM panneaux p
            LEFT JOIN images i ON i.panneau_id = p.id AND i.main_image
            LEFT JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Panneau::from).collect())
    }

    async fn create_panneau(&self, new: NewPanneau) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let author_id: Option<i64> = match new.author.as_deref() {
            Some(username) => Some(
                sqlx::query_scalar(
                    r#"
                    INSERT INTO users (username) VALUES ($1)
                    ON CONFLICT (username) DO UPDATE SET username = EXCLUDED.username
                    RETURNING id
                    "#,
                )
                .bind(username)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO panneaux (lat, lng, comment, author_id) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(new.lat)
        .bind(new.lng)
        .bind(&new.comment)
        .bind(author_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO images (panneau_id, author_id, file_name_original, file_name_small, main_image)
            VALUES ($1, $2, $3, $4, TRUE)
            "#,
        )
        .bind(id)
        .bind(author_id)
        .bind(&new.file_name_original)
        .bind(&new.file_name_small)
        .execute(&mut *tx)
        .await?;

        // Dropping an uncommitted transaction rolls it back.
        tx.commit().await?;
        Ok(id)
    }

    async fn global_stats(&self) -> Result<GlobalStats, AppError> {
        let total_panels: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM panneaux")
            .fetch_one(&self.pool)
            .await?;
        let total_contributors: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT author_id) FROM panneaux WHERE author_id IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(GlobalStats {
            total_panels,
            total_contributors,
        })
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError> {
        let entries = sqlx::query_as(
            r#"
            SELECT u.username, COUNT(p.id) AS count
            FROM panneaux p
            JOIN users u ON u.id = p.author_id
            GROUP BY u.id, u.username
            ORDER BY count DESC, u.username ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod memory {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::models::panneau::small_photo_url;

    #[derive(Default)]
    struct Store {
        next_id: i64,
        panneaux: Vec<Panneau>,
    }

    #[derive(Default)]
    pub struct MemoryPanneauRepository {
        store: Mutex<Store>,
    }

    impl MemoryPanneauRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl PanneauRepository for MemoryPanneauRepository {
        async fn list_panneaux(&self) -> Result<Vec<Panneau>, AppError> {
            let store = self.store.lock().map_err(|e| anyhow::anyhow!("{e}"))?;
            Ok(store.panneaux.iter().rev().cloned().collect())
        }

        async fn create_panneau(&self, new: NewPanneau) -> Result<i64, AppError> {
            let mut store = self.store.lock().map_err(|e| anyhow::anyhow!("{e}"))?;
            store.next_id += 1;
            let id = store.next_id;
            store.panneaux.push(Panneau {
                id,
                lat: new.lat,
                lng: new.lng,
                image_url: small_photo_url(&new.file_name_small),
                comment: new.comment,
                author: new.author,
                created_at: Utc::now(),
            });
            Ok(id)
        }

        async fn global_stats(&self) -> Result<GlobalStats, AppError> {
            let store = self.store.lock().map_err(|e| anyhow::anyhow!("{e}"))?;
            let mut authors: Vec<&str> = store
                .panneaux
                .iter()
                .filter_map(|p| p.author.as_deref())
                .collect();
            authors.sort_unstable();
            authors.dedup();
            Ok(GlobalStats {
                total_panels: store.panneaux.len() as i64,
                total_contributors: authors.len() as i64,
            })
        }

        async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError> {
            let store = self.store.lock().map_err(|e| anyhow::anyhow!("{e}"))?;
            let mut counts: BTreeMap<String, i64> = BTreeMap::new();
            for author in store.panneaux.iter().filter_map(|p| p.author.as_ref()) {
                *counts.entry(author.clone()).or_default() += 1;
            }
            let mut entries: Vec<LeaderboardEntry> = counts
                .into_iter()
                .map(|(username, count)| LeaderboardEntry { username, count })
                .collect();
            // Stable sort keeps the BTreeMap's username order among ties.
            entries.sort_by(|a, b| b.count.cmp(&a.count));
            entries.truncate(limit.max(0) as usize);
            Ok(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryPanneauRepository;
    use super::*;

    fn new_panneau(author: Option<&str>) -> NewPanneau {
        NewPanneau {
            lat: 45.0,
            lng: 5.0,
            comment: None,
            author: author.map(str::to_string),
            file_name_original: "o.jpg".to_string(),
            file_name_small: "s.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_repository_lists_newest_first() {
        let repo = MemoryPanneauRepository::new();
        let first = repo.create_panneau(new_panneau(None)).await.unwrap();
        let second = repo.create_panneau(new_panneau(Some("lea"))).await.unwrap();
        let ids: Vec<i64> = repo
            .list_panneaux()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_memory_repository_stats_and_leaderboard() {
        let repo = MemoryPanneauRepository::new();
        for author in [Some("zoe"), Some("lea"), Some("zoe"), None, Some("max"), Some("lea")] {
            repo.create_panneau(new_panneau(author)).await.unwrap();
        }

        let stats = repo.global_stats().await.unwrap();
        assert_eq!(stats.total_panels, 6);
        assert_eq!(stats.total_contributors, 3);

        let board = repo.leaderboard(2).await.unwrap();
        assert_eq!(
            board,
            vec![
                LeaderboardEntry { username: "lea".into(), count: 2 },
                LeaderboardEntry { username: "zoe".into(), count: 2 },
            ]
        );
    }
}
