//! Visited Place Service Implementation
//!
//! Same pair semantics as favorites: marking a place visited twice is a
//! silent no-op. The visit timestamp of the first marking is kept.

use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use crate::models::audit::{AuditAction, EntityKind};
use crate::models::visit::{VisitedEntry, VisitedPlace};
use crate::service::audit::AuditService;
use crate::utils::error::AppError;

/// Custom error types for the visited place service
#[derive(Error, Debug)]
pub enum VisitedServiceError {
    #[error("Visited place not found")]
    VisitNotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<VisitedServiceError> for AppError {
    fn from(err: VisitedServiceError) -> Self {
        match err {
            VisitedServiceError::VisitNotFound => {
                AppError::NotFound("Visited place not found".to_string())
            }
            VisitedServiceError::DatabaseError(e) => AppError::Database(e),
        }
    }
}

pub type VisitedServiceResult<T> = Result<T, VisitedServiceError>;

/// Visited pair storage with idempotent inserts
#[derive(Clone)]
pub struct VisitedService {
    db_pool: PgPool,
    audit: AuditService,
}

impl VisitedService {
    pub fn new(db_pool: PgPool, audit: AuditService) -> Self {
        Self { db_pool, audit }
    }

    /// Mark a place as visited. Returns whether a row was actually inserted.
    pub async fn mark_visited(&self, user_id: i64, place_id: i64) -> VisitedServiceResult<bool> {
        let result = sqlx::query(
            "INSERT INTO visited (user_id, place_id) VALUES ($1, $2) \
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
                    EntityKind::Visited,
                    &format!("{}:{}", user_id, place_id),
                    Some(user_id),
                    AuditAction::Create,
                )
                .await;
        }

        Ok(inserted)
    }

    /// The places one user has visited, most recent first
    pub async fn list_for_user(&self, user_id: i64) -> VisitedServiceResult<Vec<VisitedPlace>> {
        let places = sqlx::query_as::<_, VisitedPlace>(
            "SELECT v.user_id, v.place_id, v.visited_at, l.name AS place_name, \
             l.external_id, l.address, l.category, l.city \
             FROM visited v \
             JOIN places l ON v.place_id = l.id \
             WHERE v.user_id = $1 \
             ORDER BY v.visited_at DESC",
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
    ) -> VisitedServiceResult<Vec<VisitedEntry>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT v.user_id, v.place_id, v.visited_at, \
             u.name AS user_name, l.name AS place_name \
             FROM visited v \
             JOIN users u ON v.user_id = u.id \
             JOIN places l ON v.place_id = l.id \
             WHERE 1=1",
        );
        if let Some(uid) = user_id {
            qb.push(" AND v.user_id = ");
            qb.push_bind(uid);
        }
        if let Some(pid) = place_id {
            qb.push(" AND v.place_id = ");
            qb.push_bind(pid);
        }
        qb.push(" ORDER BY v.visited_at DESC");

        let entries = qb
            .build_query_as::<VisitedEntry>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(entries)
    }

    /// Remove a visit marker
    pub async fn remove_visited(&self, user_id: i64, place_id: i64) -> VisitedServiceResult<()> {
        let result = sqlx::query("DELETE FROM visited WHERE user_id = $1 AND place_id = $2")
            .bind(user_id)
            .bind(place_id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(VisitedServiceError::VisitNotFound);
        }

        self.audit
            .record(
                EntityKind::Visited,
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
    fn test_missing_visit_maps_to_not_found() {
        let err: AppError = VisitedServiceError::VisitNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
