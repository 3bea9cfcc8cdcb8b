//! Place Model
//!
//! Places are sourced from the external place-search provider and stored
//! lazily: the first favorite, visit or review referencing an unseen
//! external id inserts the row; later references reuse it.

use serde::{Deserialize, Serialize};

/// A place stored in the local database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Place {
    /// Internal identifier
    pub id: i64,

    /// Unique identifier assigned by the external place-search provider
    pub external_id: String,

    /// Display name
    pub name: String,

    /// Formatted address
    pub address: String,

    /// Provider category (restaurant, museum, ...)
    pub category: String,

    /// City the place belongs to
    pub city: String,
}

/// Place metadata supplied by clients when lazily registering a place
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub external_id: String,
    pub name: String,
    pub address: String,
    pub category: String,
    pub city: String,
}
