//! Favorite and Visited Models
//!
//! Both are unique (user, place) pairs with idempotent insert semantics;
//! visits additionally carry a timestamp.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A visit row joined with place display data for the owner-scoped list
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VisitedPlace {
    pub user_id: i64,
    pub place_id: i64,
    pub visited_at: DateTime<Utc>,
    pub place_name: String,
    pub external_id: String,
    pub address: String,
    pub category: String,
    pub city: String,
}

/// A visit row joined with user and place names for filtered admin listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VisitedEntry {
    pub user_id: i64,
    pub place_id: i64,
    pub visited_at: DateTime<Utc>,
    pub user_name: String,
    pub place_name: String,
}

/// A favorite row joined with user and place names for filtered listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FavoriteEntry {
    pub user_id: i64,
    pub place_id: i64,
    pub user_name: String,
    pub place_name: String,
}
