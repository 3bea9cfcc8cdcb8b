//! Favorite Service Implementation
//!
//! Favorites are unique (user, place) pairs. Adding one twice is a silent
//! no-op; only attempts that actually insert a row are audited.

use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use crate::models::audit::{AuditAction, EntityKind};
use crate::models::place::Place;
use crate::models::visit::FavoriteEntry;
use crate::service::audit::AuditService;
use crate::utils::error::AppError;

/// Custom error types for the favorite service
#[derive(Error, Debug)]
pub enum FavoriteServiceError {
    #[error("Favorite not found")]
    FavoriteNotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<FavoriteServiceError> for AppError {
    fn from(err: FavoriteServiceError) -> Self {
        match err {
            FavoriteServiceError::FavoriteNotFound => {
                AppError::NotFound("Favorite not found".to_string())
            }
            FavoriteServiceError::DatabaseError(e) => AppError::Database(e),
        }
    }
}

pub type FavoriteServiceResult<T> = Result<T, FavoriteServiceError>;

/// Favorite pair storage with idempotent inserts
#[derive(Clone)]
pub struct FavoriteService {
    db_pool: PgPool,
    audit: AuditService,
}

impl FavoriteService {
    pub fn new(db_pool: PgPool, audit: AuditService) -> Self {
        Self { db_pool, audit }
    }

    /// Add a favorite. Returns whether a row was actually inserted; a
    /// duplicate attempt succeeds without inserting.
    pub async fn add_favorite(&self, user_id: i64, place_id: i64) -> FavoriteServiceResult<bool> {
        let result = sqlx::query(
            "INSERT INTO favorites (user_id, place_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(place_id)
        .execute(&self.db_pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            self.audit
                .record(
                    EntityKind::Favorite,
                    &format!("{}:{}", user_id, place_id),
                    Some(user_id),
                    AuditAction::Create,
                )
                .await;
        }

        Ok(inserted)
    }

    /// The places one user has favorited
    pub async fn list_for_user(&self, user_id: i64) -> FavoriteServiceResult<Vec<Place>> {
        let places = sqlx::query_as::<_, Place>(
            "SELECT l.id, l.external_id, l.name, l.address, l.category, l.city \
             FROM favorites f \
             JOIN places l ON f.place_id = l.id \
             WHERE f.user_id = $1 \
             ORDER BY l.name",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(places)
    }

    /// Admin listing across users with optional user/place filters
    pub async fn list_filtered(
        &self,
        user_id: Option<i64>,
        place_id: Option<i64>,
    ) -> FavoriteServiceResult<Vec<FavoriteEntry>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT f.user_id, f.place_id, u.name AS user_name, l.name AS place_name \
             FROM favorites f \
             JOIN users u ON f.user_id = u.id \
             JOIN places l ON f.place_id = l.id \
             WHERE 1=1",
        );
        if let Some(uid) = user_id {
            qb.push(" AND f.user_id = ");
            qb.push_bind(uid);
        }
        if let Some(pid) = place_id {
            qb.push(" AND f.place_id = ");
            qb.push_bind(pid);
        }
        qb.push(" ORDER BY u.name, l.name");

        let entries = qb
            .build_query_as::<FavoriteEntry>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(entries)
    }

    /// Remove one of the caller's favorites
    pub async fn remove_favorite(&self, user_id: i64, place_id: i64) -> FavoriteServiceResult<()> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND place_id = $2")
            .bind(user_id)
            .bind(place_id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(FavoriteServiceError::FavoriteNotFound);
        }

        self.audit
            .record(
                EntityKind::Favorite,
                &format!("{}:{}", user_id, place_id),
                Some(user_id),
                AuditAction::Delete,
            )
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_favorite_maps_to_not_found() {
        let err: AppError = FavoriteServiceError::FavoriteNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
