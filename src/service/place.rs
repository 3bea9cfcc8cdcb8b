//! Place Service Implementation
//!
//! Stores places sourced from the external provider. Rows are created
//! lazily through an idempotent upsert keyed on the provider id; concurrent
//! duplicate attempts are absorbed silently.

use sqlx::PgPool;
use thiserror::Error;

use crate::models::audit::{AuditAction, EntityKind};
use crate::models::place::{NewPlace, Place};
use crate::models::requests::UpdatePlaceRequest;
use crate::service::audit::AuditService;
use crate::utils::{error::AppError, update::FieldUpdates};

/// Custom error types for the place service
#[derive(Error, Debug)]
pub enum PlaceServiceError {
    #[error("Place not found")]
    PlaceNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<PlaceServiceError> for AppError {
    fn from(err: PlaceServiceError) -> Self {
        match err {
            PlaceServiceError::PlaceNotFound => {
                AppError::NotFound("Place not found".to_string())
            }
            PlaceServiceError::ValidationError(msg) => AppError::Validation(msg),
            PlaceServiceError::DatabaseError(e) => AppError::Database(e),
        }
    }
}

pub type PlaceServiceResult<T> = Result<T, PlaceServiceError>;

/// Place storage with lazy-upsert semantics
#[derive(Clone)]
pub struct PlaceService {
    db_pool: PgPool,
    audit: AuditService,
}

impl PlaceService {
    pub fn new(db_pool: PgPool, audit: AuditService) -> Self {
        Self { db_pool, audit }
    }

    /// Insert the place if its provider id is unseen, otherwise reuse the
    /// existing row. Returns the internal id either way. Only an actual
    /// insert is audited.
    pub async fn ensure_place(
        &self,
        place: &NewPlace,
        actor_id: Option<i64>,
    ) -> PlaceServiceResult<i64> {
        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO places (external_id, name, address, category, city) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (external_id) DO NOTHING \
             RETURNING id",
        )
        .bind(&place.external_id)
        .bind(&place.name)
        .bind(&place.address)
        .bind(&place.category)
        .bind(&place.city)
        .fetch_optional(&self.db_pool)
        .await?;

        if let Some(id) = inserted {
            self.audit
                .record_id(EntityKind::Place, id, actor_id, AuditAction::Create)
                .await;
            return Ok(id);
        }

        // Lost the race or the place already existed: reuse the stored row.
        sqlx::query_scalar::<_, i64>("SELECT id FROM places WHERE external_id = $1")
            .bind(&place.external_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(PlaceServiceError::PlaceNotFound)
    }

    /// Resolve a provider id to the stored place
    pub async fn get_by_external_id(&self, external_id: &str) -> PlaceServiceResult<Place> {
        sqlx::query_as::<_, Place>(
            "SELECT id, external_id, name, address, category, city \
             FROM places WHERE external_id = $1",
        )
        .bind(external_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(PlaceServiceError::PlaceNotFound)
    }

    /// Look up a place by internal id
    pub async fn get_by_id(&self, place_id: i64) -> PlaceServiceResult<Place> {
        sqlx::query_as::<_, Place>(
            "SELECT id, external_id, name, address, category, city FROM places WHERE id = $1",
        )
        .bind(place_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(PlaceServiceError::PlaceNotFound)
    }

    /// Every stored place
    pub async fn list_places(&self) -> PlaceServiceResult<Vec<Place>> {
        let places = sqlx::query_as::<_, Place>(
            "SELECT id, external_id, name, address, category, city FROM places ORDER BY id",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(places)
    }

    /// Admin partial update of a stored place
    pub async fn update_place(
        &self,
        external_id: &str,
        request: UpdatePlaceRequest,
        actor_id: i64,
    ) -> PlaceServiceResult<()> {
        let place = self.get_by_external_id(external_id).await?;

        let updates = FieldUpdates::new()
            .set_text("name", request.name)
            .set_text("address", request.address)
            .set_text("category", request.category)
            .set_text("city", request.city);

        let mut query = updates
            .build_update("places", "id", place.id)
            .map_err(|_| PlaceServiceError::ValidationError("No fields to update".to_string()))?;

        query.build().execute(&self.db_pool).await?;

        self.audit
            .record_id(EntityKind::Place, place.id, Some(actor_id), AuditAction::Update)
            .await;
        Ok(())
    }

    /// Admin deletion of a stored place
    pub async fn delete_place(&self, external_id: &str, actor_id: i64) -> PlaceServiceResult<()> {
        let place = self.get_by_external_id(external_id).await?;

        sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(place.id)
            .execute(&self.db_pool)
            .await?;

        self.audit
            .record_id(EntityKind::Place, place.id, Some(actor_id), AuditAction::Delete)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_place_maps_to_not_found() {
        let err: AppError = PlaceServiceError::PlaceNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_empty_update_maps_to_validation() {
        let err: AppError = PlaceServiceError::ValidationError("No fields".to_string()).into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
