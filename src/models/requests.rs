//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::review::ReviewSort;
use crate::utils::validation::{email_validator, name_validator};

/// Request payload for registering a new user account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User's display name (1-255 characters)
    #[validate(custom = "name_validator")]
    pub name: String,

    /// User's email address (must be unique and valid format)
    #[validate(custom = "email_validator")]
    pub email: String,

    /// User's password
    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    pub password: String,
}

/// Request payload for logging in
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "email_validator")]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Request payload for updating a user's display name
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNameRequest {
    #[validate(custom = "name_validator")]
    pub name: String,
}

/// Request payload for updating a user's email
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmailRequest {
    #[validate(custom = "email_validator")]
    pub email: String,
}

/// Request payload for updating a user's password
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    pub password: String,
}

/// Admin-only partial update of any user field; omitted fields are left
/// unchanged, and supplying none of them is a validation error.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(custom = "name_validator")]
    pub name: Option<String>,

    #[validate(custom = "email_validator")]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    pub password: Option<String>,

    pub is_admin: Option<bool>,
}

/// Request payload for registering a place directly
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlaceRequest {
    #[validate(length(min = 1, message = "External place id is required"))]
    pub external_id: String,

    #[validate(custom = "name_validator")]
    pub name: String,

    pub address: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
}

/// Partial update of a stored place (admin only)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlaceRequest {
    #[validate(custom = "name_validator")]
    pub name: Option<String>,

    pub address: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
}

/// Request payload for creating a review
///
/// `place_id` is the external provider id. If the place is unknown it is
/// lazily created, which requires at least `name` to be present.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "External place id is required"))]
    pub place_id: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    pub comment: Option<String>,

    pub name: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
}

/// Partial update of a review
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,

    pub comment: Option<String>,
}

/// Query parameters for listing reviews of a place
#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    /// External provider id of the place
    pub place_id: String,

    /// Sort order, defaults to newest-first
    pub sort: Option<ReviewSort>,
}

/// Request payload for adding a favorite
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddFavoriteRequest {
    #[validate(length(min = 1, message = "External place id is required"))]
    pub place_id: String,

    #[validate(custom = "name_validator")]
    pub name: String,

    pub address: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
}

/// Request payload for marking a place as visited
///
/// Either `internal_id` (an already-stored place) or `place_id` with
/// metadata must be supplied.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MarkVisitedRequest {
    pub internal_id: Option<i64>,

    pub place_id: Option<String>,

    #[validate(custom = "name_validator")]
    pub name: Option<String>,

    pub address: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
}

/// Query parameters for favorite/visited listings
///
/// A `user_id` other than the caller's own requires the admin role; the
/// filter itself never grants authorization.
#[derive(Debug, Deserialize)]
pub struct PairListQuery {
    pub user_id: Option<i64>,
    pub place_id: Option<i64>,
}

/// Generic message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Response carrying the id of a created or resolved record
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

/// Response for health check
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let base = |rating| CreateReviewRequest {
            place_id: "prov-1".to_string(),
            rating,
            comment: None,
            name: None,
            address: None,
            category: None,
            city: None,
        };

        assert!(base(0).validate().is_err());
        assert!(base(6).validate().is_err());
        assert!(base(1).validate().is_ok());
        assert!(base(5).validate().is_ok());
    }

    #[test]
    fn test_register_requires_valid_email() {
        let request = RegisterRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_review_allows_partial_payload() {
        let request = UpdateReviewRequest {
            rating: None,
            comment: Some("updated".to_string()),
        };
        assert!(request.validate().is_ok());

        let request = UpdateReviewRequest {
            rating: Some(9),
            comment: None,
        };
        assert!(request.validate().is_err());
    }
}
