//! Review Service Implementation
//!
//! Reviews are owned by their creating user; the owner-or-admin gate is
//! enforced by handlers through the authorization policy before calling the
//! mutating methods here.

use sqlx::PgPool;
use thiserror::Error;

use crate::models::audit::{AuditAction, EntityKind};
use crate::models::requests::UpdateReviewRequest;
use crate::models::review::{Review, ReviewSort, ReviewWithNames};
use crate::service::audit::AuditService;
use crate::utils::{error::AppError, update::FieldUpdates};

/// Custom error types for the review service
#[derive(Error, Debug)]
pub enum ReviewServiceError {
    #[error("Review not found")]
    ReviewNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<ReviewServiceError> for AppError {
    fn from(err: ReviewServiceError) -> Self {
        match err {
            ReviewServiceError::ReviewNotFound => {
                AppError::NotFound("Review not found".to_string())
            }
            ReviewServiceError::ValidationError(msg) => AppError::Validation(msg),
            ReviewServiceError::DatabaseError(e) => AppError::Database(e),
        }
    }
}

pub type ReviewServiceResult<T> = Result<T, ReviewServiceError>;

const REVIEW_LIST_COLUMNS: &str = "r.id, r.user_id, r.place_id, r.rating, r.comment, \
     r.created_at, u.name AS user_name, u.email AS user_email, l.name AS place_name";

/// Review CRUD and listings
#[derive(Clone)]
pub struct ReviewService {
    db_pool: PgPool,
    audit: AuditService,
}

impl ReviewService {
    pub fn new(db_pool: PgPool, audit: AuditService) -> Self {
        Self { db_pool, audit }
    }

    /// Insert a review for an already-resolved place
    pub async fn create_review(
        &self,
        user_id: i64,
        place_id: i64,
        rating: i16,
        comment: &str,
    ) -> ReviewServiceResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (user_id, place_id, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, place_id, rating, comment, created_at",
        )
        .bind(user_id)
        .bind(place_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.db_pool)
        .await?;

        self.audit
            .record_id(EntityKind::Review, review.id, Some(user_id), AuditAction::Create)
            .await;
        Ok(review)
    }

    /// Fetch a review; handlers use the returned owner id for the policy gate
    pub async fn get_review(&self, review_id: i64) -> ReviewServiceResult<Review> {
        sqlx::query_as::<_, Review>(
            "SELECT id, user_id, place_id, rating, comment, created_at \
             FROM reviews WHERE id = $1",
        )
        .bind(review_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(ReviewServiceError::ReviewNotFound)
    }

    /// Partial update of a review's rating and/or comment
    pub async fn update_review(
        &self,
        review_id: i64,
        request: UpdateReviewRequest,
        actor_id: i64,
    ) -> ReviewServiceResult<()> {
        let updates = FieldUpdates::new()
            .set_smallint("rating", request.rating)
            .set_text("comment", request.comment);

        let mut query = updates
            .build_update("reviews", "id", review_id)
            .map_err(|_| ReviewServiceError::ValidationError("No fields to update".to_string()))?;

        let result = query.build().execute(&self.db_pool).await?;
        if result.rows_affected() == 0 {
            return Err(ReviewServiceError::ReviewNotFound);
        }

        self.audit
            .record_id(EntityKind::Review, review_id, Some(actor_id), AuditAction::Update)
            .await;
        Ok(())
    }

    /// Delete a review
    pub async fn delete_review(&self, review_id: i64, actor_id: i64) -> ReviewServiceResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ReviewServiceError::ReviewNotFound);
        }

        self.audit
            .record_id(EntityKind::Review, review_id, Some(actor_id), AuditAction::Delete)
            .await;
        Ok(())
    }

    /// Reviews for a place (by provider id), joined with reviewer and place
    /// names. The ORDER BY fragment comes from [`ReviewSort`], never from
    /// caller input.
    pub async fn list_for_place(
        &self,
        external_id: &str,
        sort: ReviewSort,
    ) -> ReviewServiceResult<Vec<ReviewWithNames>> {
        let sql = format!(
            "SELECT {} FROM reviews r \
             JOIN users u ON r.user_id = u.id \
             JOIN places l ON r.place_id = l.id \
             WHERE l.external_id = $1 \
             ORDER BY {}",
            REVIEW_LIST_COLUMNS,
            sort.order_by()
        );

        let reviews = sqlx::query_as::<_, ReviewWithNames>(&sql)
            .bind(external_id)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(reviews)
    }

    /// All reviews written by one user, newest first
    pub async fn list_for_user(&self, user_id: i64) -> ReviewServiceResult<Vec<ReviewWithNames>> {
        let sql = format!(
            "SELECT {} FROM reviews r \
             JOIN users u ON r.user_id = u.id \
             JOIN places l ON r.place_id = l.id \
             WHERE r.user_id = $1 \
             ORDER BY r.created_at DESC",
            REVIEW_LIST_COLUMNS
        );

        let reviews = sqlx::query_as::<_, ReviewWithNames>(&sql)
            .bind(user_id)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_review_maps_to_not_found() {
        let err: AppError = ReviewServiceError::ReviewNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
