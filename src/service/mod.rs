//! Service layer
//!
//! Business logic lives here; handlers stay thin and the authorization
//! policy is consulted before any mutating call.

pub mod audit;
pub mod authorization;
pub mod favorite;
pub mod place;
pub mod place_search;
pub mod review;
pub mod token;
pub mod user;
pub mod visited;

pub use audit::AuditService;
pub use authorization::{decide, Action, Denial};
pub use favorite::{FavoriteService, FavoriteServiceError};
pub use place::{PlaceService, PlaceServiceError};
pub use place_search::{PlaceSearchError, PlaceSearchService};
pub use review::{ReviewService, ReviewServiceError};
pub use token::{TokenError, TokenService};
pub use user::{UserService, UserServiceError};
pub use visited::{VisitedService, VisitedServiceError};
