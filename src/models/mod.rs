//! Data Models Module
//!
//! Data structures used throughout the service: entities, token claims and
//! request/response types.

pub mod audit;
pub mod auth;
pub mod place;
pub mod requests;
pub mod review;
pub mod user;
pub mod visit;

// Re-export commonly used types
pub use audit::{AuditAction, EntityKind, HistoryEntry};
pub use auth::{Caller, TokenClaims};
pub use place::{NewPlace, Place};
pub use requests::*;
pub use review::{Review, ReviewSort, ReviewWithNames};
pub use user::{User, ROOT_USER_ID};
pub use visit::{FavoriteEntry, VisitedEntry, VisitedPlace};
