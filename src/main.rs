//! Service entrypoint
//!
//! Loads configuration, connects to PostgreSQL, applies migrations and
//! serves the HTTP API.

use std::sync::Arc;

use dotenv::dotenv;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use wanderlist::{
    api::{create_router, AppState},
    config::AppConfig,
    database::run_migrations,
    service::{
        AuditService, FavoriteService, PlaceSearchService, PlaceService, ReviewService,
        TokenService, UserService, VisitedService,
    },
    VERSION,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    config.validate()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.server.log_level),
    )
    .init();

    log::info!("Starting wanderlist v{}", VERSION);

    let pool = config.database.create_pool().await?;
    run_migrations(&pool).await?;
    log::info!(
        "Database connected ({} max connections)",
        config.database.max_connections
    );

    let audit = AuditService::new(pool.clone());
    let token_service = TokenService::with_expiration(
        config.jwt.secret.clone(),
        chrono::Duration::hours(config.jwt.expires_hours),
    );

    let place_search = config
        .places
        .as_ref()
        .map(|places| Arc::new(PlaceSearchService::new(places.api_key.clone())));
    if place_search.is_none() {
        log::warn!("PLACES_API_KEY not set, place search endpoints are disabled");
    }

    let state = AppState {
        user_service: Arc::new(UserService::new(pool.clone(), audit.clone())),
        place_service: Arc::new(PlaceService::new(pool.clone(), audit.clone())),
        review_service: Arc::new(ReviewService::new(pool.clone(), audit.clone())),
        favorite_service: Arc::new(FavoriteService::new(pool.clone(), audit.clone())),
        visited_service: Arc::new(VisitedService::new(pool, audit.clone())),
        audit_service: Arc::new(audit),
        token_service: Arc::new(token_service),
        place_search,
    };

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
