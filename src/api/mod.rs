//! API layer
//!
//! HTTP routing, request handlers and the authentication middleware.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
