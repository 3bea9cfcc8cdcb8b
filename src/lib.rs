//! Wanderlist Service Library
//!
//! REST backend for a places, reviews and favorites application. Users
//! register, log in and collect places sourced from an external place-search
//! provider; places are stored lazily the first time a favorite, visit or
//! review references them. Every mutation is recorded on an append-only
//! audit ledger, and a single authorization policy guards ownership, the
//! admin role and the immutable root identity.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wanderlist::{
//!     api::{create_router, AppState},
//!     database::DatabaseConfig,
//!     service::{
//!         AuditService, FavoriteService, PlaceService, ReviewService, TokenService,
//!         UserService, VisitedService,
//!     },
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = DatabaseConfig::from_env()?.create_pool().await?;
//!     let audit = AuditService::new(pool.clone());
//!
//!     let state = AppState {
//!         user_service: Arc::new(UserService::new(pool.clone(), audit.clone())),
//!         place_service: Arc::new(PlaceService::new(pool.clone(), audit.clone())),
//!         review_service: Arc::new(ReviewService::new(pool.clone(), audit.clone())),
//!         favorite_service: Arc::new(FavoriteService::new(pool.clone(), audit.clone())),
//!         visited_service: Arc::new(VisitedService::new(pool, audit.clone())),
//!         audit_service: Arc::new(audit),
//!         token_service: Arc::new(TokenService::new("change-me".repeat(4))),
//!         place_search: None,
//!     };
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod service;
pub mod utils;

// Re-export the most commonly used types
pub use api::{create_router, AppState};
pub use models::{
    auth::Caller,
    requests::{LoginRequest, RegisterRequest},
    user::{User, ROOT_USER_ID},
};
pub use service::{
    decide, Action, AuditService, Denial, FavoriteService, PlaceSearchService, PlaceService,
    ReviewService, TokenService, UserService, VisitedService,
};
pub use utils::error::{AppError, AppResult, ErrorResponse};

pub use config::{AppConfig, ConfigError, JwtConfig, PlacesConfig, ServerConfig};
pub use database::{run_migrations, DatabaseConfig, DatabasePool};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
