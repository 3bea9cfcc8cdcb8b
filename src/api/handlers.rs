//! HTTP Request Handlers
//!
//! Axum handlers for processing HTTP requests and responses. Handlers stay
//! thin: validate input, consult the authorization policy, delegate to the
//! service layer, shape the response.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    api::extractors::Json,
    api::middleware::AuthUser,
    models::{
        audit::EntityKind,
        place::NewPlace,
        requests::*,
        user::ROOT_USER_ID,
    },
    service::{
        decide, Action, AuditService, FavoriteService, PlaceSearchService, PlaceService,
        PlaceServiceError, ReviewService, TokenService, UserService, VisitedService,
    },
    utils::error::{AppError, AppResult},
    VERSION,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub place_service: Arc<PlaceService>,
    pub review_service: Arc<ReviewService>,
    pub favorite_service: Arc<FavoriteService>,
    pub visited_service: Arc<VisitedService>,
    pub audit_service: Arc<AuditService>,
    pub token_service: Arc<TokenService>,
    /// Absent when no provider API key is configured; the search endpoints
    /// then answer with an internal error.
    pub place_search: Option<Arc<PlaceSearchService>>,
}

impl AppState {
    fn place_search(&self) -> AppResult<&PlaceSearchService> {
        self.place_search
            .as_deref()
            .ok_or_else(|| AppError::Internal("Place search is not configured".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Liveness probe including a database round-trip
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthCheckResponse>> {
    state.user_service.health_check().await?;

    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Register a new account. The first account ever created becomes an admin.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<crate::models::user::User>)> {
    let user = state.user_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for a signed session token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid credentials payload: {}", e)))?;

    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;
    let token = state.token_service.issue(&user)?;

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        is_admin: user.is_admin,
    }))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// The caller's own profile
pub async fn get_me(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
) -> AppResult<Json<crate::models::user::User>> {
    let user = state.user_service.get_user_by_id(caller.id).await?;
    Ok(Json(user))
}

/// List every user profile (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
) -> AppResult<Json<Vec<crate::models::user::User>>> {
    decide(&caller, EntityKind::User, None, Action::ReadAny)?;

    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}

/// Fetch one user profile (admin only; the root identity is never shown)
pub async fn get_user(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<crate::models::user::User>> {
    if user_id == ROOT_USER_ID {
        return Err(AppError::Forbidden(
            "The root user cannot be accessed".to_string(),
        ));
    }
    decide(&caller, EntityKind::User, Some(user_id), Action::ReadAny)?;

    let user = state.user_service.get_user_by_id(user_id).await?;
    Ok(Json(user))
}

/// Update a user's display name (owner or admin)
pub async fn update_user_name(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateNameRequest>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid name: {}", e)))?;
    decide(&caller, EntityKind::User, Some(user_id), Action::MutateOwn)?;

    state
        .user_service
        .update_name(user_id, &request.name, caller.id)
        .await?;
    Ok(Json(MessageResponse::new("Name updated")))
}

/// Update a user's email address (owner or admin)
pub async fn update_user_email(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid email: {}", e)))?;
    decide(&caller, EntityKind::User, Some(user_id), Action::MutateOwn)?;

    state
        .user_service
        .update_email(user_id, &request.email, caller.id)
        .await?;
    Ok(Json(MessageResponse::new("Email updated")))
}

/// Update a user's password (owner or admin)
pub async fn update_user_password(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdatePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid password: {}", e)))?;
    decide(&caller, EntityKind::User, Some(user_id), Action::MutateOwn)?;

    state
        .user_service
        .update_password(user_id, &request.password, caller.id)
        .await?;
    Ok(Json(MessageResponse::new("Password updated")))
}

/// Admin partial update of any user field
pub async fn admin_update_user(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(request): Json<AdminUpdateUserRequest>,
) -> AppResult<Json<MessageResponse>> {
    decide(&caller, EntityKind::User, Some(user_id), Action::MutateAny)?;

    state
        .user_service
        .admin_update(user_id, request, caller.id)
        .await?;
    Ok(Json(MessageResponse::new("User updated")))
}

/// Delete a user account (owner or admin)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    decide(&caller, EntityKind::User, Some(user_id), Action::MutateOwn)?;

    state.user_service.delete_user(user_id, caller.id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

/// Every stored place
pub async fn list_places(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<crate::models::place::Place>>> {
    let places = state.place_service.list_places().await?;
    Ok(Json(places))
}

/// Look up a stored place by its provider id
pub async fn get_place(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> AppResult<Json<crate::models::place::Place>> {
    let place = state.place_service.get_by_external_id(&external_id).await?;
    Ok(Json(place))
}

/// Look up a stored place by its internal id
pub async fn get_place_by_id(
    State(state): State<AppState>,
    Path(place_id): Path<i64>,
) -> AppResult<Json<crate::models::place::Place>> {
    let place = state.place_service.get_by_id(place_id).await?;
    Ok(Json(place))
}

/// Register a place, reusing the stored row when the provider id is known
pub async fn create_place(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Json(request): Json<CreatePlaceRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid place data: {}", e)))?;

    let place = NewPlace {
        external_id: request.external_id,
        name: request.name,
        address: request.address.unwrap_or_default(),
        category: request.category.unwrap_or_default(),
        city: request.city.unwrap_or_default(),
    };
    let id = state
        .place_service
        .ensure_place(&place, Some(caller.id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Place registered".to_string(),
            id,
        }),
    ))
}

/// Admin partial update of a stored place
pub async fn update_place(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(external_id): Path<String>,
    Json(request): Json<UpdatePlaceRequest>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid place data: {}", e)))?;
    decide(&caller, EntityKind::Place, None, Action::MutateAny)?;

    state
        .place_service
        .update_place(&external_id, request, caller.id)
        .await?;
    Ok(Json(MessageResponse::new("Place updated")))
}

/// Admin deletion of a stored place
pub async fn delete_place(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(external_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    decide(&caller, EntityKind::Place, None, Action::MutateAny)?;

    state
        .place_service
        .delete_place(&external_id, caller.id)
        .await?;
    Ok(Json(MessageResponse::new("Place deleted")))
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Create a review. An unknown place is lazily registered when the request
/// carries place metadata, otherwise the review is rejected with 404.
pub async fn create_review(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Json(request): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<crate::models::review::Review>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid review data: {}", e)))?;

    let place_id = match state.place_service.get_by_external_id(&request.place_id).await {
        Ok(place) => place.id,
        Err(PlaceServiceError::PlaceNotFound) => match &request.name {
            Some(name) => {
                let place = NewPlace {
                    external_id: request.place_id.clone(),
                    name: name.clone(),
                    address: request.address.clone().unwrap_or_default(),
                    category: request.category.clone().unwrap_or_default(),
                    city: request.city.clone().unwrap_or_default(),
                };
                state
                    .place_service
                    .ensure_place(&place, Some(caller.id))
                    .await?
            }
            None => return Err(AppError::NotFound("Place not found".to_string())),
        },
        Err(e) => return Err(e.into()),
    };

    let review = state
        .review_service
        .create_review(
            caller.id,
            place_id,
            request.rating,
            request.comment.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// Reviews of a place, joined with reviewer and place names
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> AppResult<Json<Vec<crate::models::review::ReviewWithNames>>> {
    let reviews = state
        .review_service
        .list_for_place(&query.place_id, query.sort.unwrap_or_default())
        .await?;
    Ok(Json(reviews))
}

/// The caller's own reviews, newest first
pub async fn my_reviews(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
) -> AppResult<Json<Vec<crate::models::review::ReviewWithNames>>> {
    let reviews = state.review_service.list_for_user(caller.id).await?;
    Ok(Json(reviews))
}

/// Reviews of one user (self or admin)
pub async fn user_reviews(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<crate::models::review::ReviewWithNames>>> {
    decide(&caller, EntityKind::Review, Some(user_id), Action::ReadSelf)?;

    let reviews = state.review_service.list_for_user(user_id).await?;
    Ok(Json(reviews))
}

/// Update a review (owner or admin)
pub async fn update_review(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(review_id): Path<i64>,
    Json(request): Json<UpdateReviewRequest>,
) -> AppResult<Json<MessageResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid review data: {}", e)))?;

    let review = state.review_service.get_review(review_id).await?;
    decide(&caller, EntityKind::Review, Some(review.user_id), Action::MutateOwn)?;

    state
        .review_service
        .update_review(review_id, request, caller.id)
        .await?;
    Ok(Json(MessageResponse::new("Review updated")))
}

/// Delete a review (owner or admin)
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(review_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    let review = state.review_service.get_review(review_id).await?;
    decide(&caller, EntityKind::Review, Some(review.user_id), Action::MutateOwn)?;

    state
        .review_service
        .delete_review(review_id, caller.id)
        .await?;
    Ok(Json(MessageResponse::new("Review deleted")))
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// Add a favorite, lazily registering the place. A repeated add is a no-op
/// answered with 200 instead of 201.
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Json(request): Json<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid favorite data: {}", e)))?;

    let place = NewPlace {
        external_id: request.place_id,
        name: request.name,
        address: request.address.unwrap_or_default(),
        category: request.category.unwrap_or_default(),
        city: request.city.unwrap_or_default(),
    };
    let place_id = state
        .place_service
        .ensure_place(&place, Some(caller.id))
        .await?;

    let inserted = state
        .favorite_service
        .add_favorite(caller.id, place_id)
        .await?;

    let (status, message) = if inserted {
        (StatusCode::CREATED, "Favorite added")
    } else {
        (StatusCode::OK, "Favorite already saved")
    };
    Ok((
        status,
        Json(CreatedResponse {
            message: message.to_string(),
            id: place_id,
        }),
    ))
}

/// List favorites. Without filters this is the caller's own list; filters are
/// scoped to the caller unless the caller is an admin.
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Query(query): Query<PairListQuery>,
) -> AppResult<Response> {
    if query.user_id.is_none() && query.place_id.is_none() {
        let places = state.favorite_service.list_for_user(caller.id).await?;
        return Ok(Json(places).into_response());
    }

    let target = query.user_id.unwrap_or(caller.id);
    decide(&caller, EntityKind::Favorite, Some(target), Action::ReadSelf)?;

    // Admins may drop the user filter entirely; everyone else stays scoped
    // to their own rows.
    let user_filter = match query.user_id {
        Some(id) => Some(id),
        None if caller.is_admin => None,
        None => Some(caller.id),
    };
    let entries = state
        .favorite_service
        .list_filtered(user_filter, query.place_id)
        .await?;
    Ok(Json(entries).into_response())
}

/// Remove one of the caller's favorites
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(place_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state
        .favorite_service
        .remove_favorite(caller.id, place_id)
        .await?;
    Ok(Json(MessageResponse::new("Favorite removed")))
}

// ---------------------------------------------------------------------------
// Visited places
// ---------------------------------------------------------------------------

/// Mark a place as visited, either by internal id or by provider id with
/// metadata. A repeated marking is a no-op answered with 200.
pub async fn mark_visited(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Json(request): Json<MarkVisitedRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid visit data: {}", e)))?;

    let place_id = match (request.internal_id, &request.place_id) {
        (Some(id), _) => state.place_service.get_by_id(id).await?.id,
        (None, Some(external_id)) => {
            let name = request.name.clone().ok_or_else(|| {
                AppError::Validation("Place name is required to register a new place".to_string())
            })?;
            let place = NewPlace {
                external_id: external_id.clone(),
                name,
                address: request.address.clone().unwrap_or_default(),
                category: request.category.clone().unwrap_or_default(),
                city: request.city.clone().unwrap_or_default(),
            };
            state
                .place_service
                .ensure_place(&place, Some(caller.id))
                .await?
        }
        (None, None) => {
            return Err(AppError::Validation(
                "Either internal_id or place_id is required".to_string(),
            ))
        }
    };

    let inserted = state
        .visited_service
        .mark_visited(caller.id, place_id)
        .await?;

    let (status, message) = if inserted {
        (StatusCode::CREATED, "Place marked as visited")
    } else {
        (StatusCode::OK, "Place was already marked as visited")
    };
    Ok((
        status,
        Json(CreatedResponse {
            message: message.to_string(),
            id: place_id,
        }),
    ))
}

/// List visited places, same scoping rules as favorites
pub async fn list_visited(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Query(query): Query<PairListQuery>,
) -> AppResult<Response> {
    if query.user_id.is_none() && query.place_id.is_none() {
        let places = state.visited_service.list_for_user(caller.id).await?;
        return Ok(Json(places).into_response());
    }

    let target = query.user_id.unwrap_or(caller.id);
    decide(&caller, EntityKind::Visited, Some(target), Action::ReadSelf)?;

    let user_filter = match query.user_id {
        Some(id) => Some(id),
        None if caller.is_admin => None,
        None => Some(caller.id),
    };
    let entries = state
        .visited_service
        .list_filtered(user_filter, query.place_id)
        .await?;
    Ok(Json(entries).into_response())
}

/// Remove a visit marker
pub async fn remove_visited(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(place_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state
        .visited_service
        .remove_visited(caller.id, place_id)
        .await?;
    Ok(Json(MessageResponse::new("Visited place removed")))
}

// ---------------------------------------------------------------------------
// Audit ledger
// ---------------------------------------------------------------------------

/// Full audit ledger with actor names, newest first (admin only)
pub async fn get_history(
    State(state): State<AppState>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
) -> AppResult<Json<Vec<crate::models::audit::HistoryEntry>>> {
    decide(&caller, EntityKind::User, None, Action::ReadAny)?;

    let entries = state.audit_service.list_history().await?;
    Ok(Json(entries))
}

// ---------------------------------------------------------------------------
// Place search (external provider)
// ---------------------------------------------------------------------------

/// Query parameters for the provider text search
#[derive(Debug, Deserialize)]
pub struct SearchTextQuery {
    pub query: String,
    pub radius: Option<u32>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
}

/// Query parameters for the provider nearby search
#[derive(Debug, Deserialize)]
pub struct SearchNearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<u32>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
}

/// Query parameters for the provider details lookup
#[derive(Debug, Deserialize)]
pub struct SearchDetailsQuery {
    pub place_id: String,
}

/// Query parameters for the maps embed URL
#[derive(Debug, Deserialize)]
pub struct MapsEmbedQuery {
    pub lat: f64,
    pub lng: f64,
    pub q: Option<String>,
}

/// Provider text search with geocode + nearby fallback
pub async fn search_places(
    State(state): State<AppState>,
    Query(query): Query<SearchTextQuery>,
) -> AppResult<Json<Value>> {
    if query.query.trim().is_empty() {
        return Err(AppError::Validation(
            "The query parameter is required".to_string(),
        ));
    }

    let results = state
        .place_search()?
        .search_text(
            &query.query,
            query.radius.unwrap_or(1000),
            query.place_type.as_deref(),
        )
        .await?;
    Ok(Json(results))
}

/// Provider nearby search around a coordinate
pub async fn search_nearby(
    State(state): State<AppState>,
    Query(query): Query<SearchNearbyQuery>,
) -> AppResult<Json<Value>> {
    let results = state
        .place_search()?
        .search_nearby(
            query.lat,
            query.lng,
            query.radius.unwrap_or(500),
            query.place_type.as_deref(),
        )
        .await?;
    Ok(Json(results))
}

/// Provider details lookup for one place id
pub async fn search_details(
    State(state): State<AppState>,
    Query(query): Query<SearchDetailsQuery>,
) -> AppResult<Json<Value>> {
    if query.place_id.trim().is_empty() {
        return Err(AppError::Validation(
            "The place_id parameter is required".to_string(),
        ));
    }

    let result = state.place_search()?.details(&query.place_id).await?;
    Ok(Json(result))
}

/// Build the embeddable map URL for a coordinate
pub async fn maps_embed(
    State(state): State<AppState>,
    Query(query): Query<MapsEmbedQuery>,
) -> AppResult<Json<Value>> {
    let url = state
        .place_search()?
        .embed_url(query.lat, query.lng, query.q.as_deref());
    Ok(Json(json!({ "url": url })))
}
