// Library exports for Jolt Backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, CONFIG};
pub use db::{DieselPool, RedisConfig, RedisPool};
pub use middleware::auth_middleware;
pub use middleware::AuthenticatedUser;
pub use services::{
    AccountLinkService, DrinkService, EmailService, EntryService, FavoriteService, LimitService,
    MagicLinkService, SessionService,
};
pub use utils::{AuthError, ServiceError};

// Re-export route builders
pub use handlers::{
    docs_routes, drink_routes, entry_routes, favorite_routes, limit_routes, protected_auth_routes,
    public_auth_routes,
};

// Diesel database pool type alias
use bb8::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

pub type DbPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

// Library initialization function for external consumers
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    use std::sync::Arc;
    use tracing::info;

    // Load environment
    dotenv::dotenv().ok();

    // Initialize config
    let config = app_config::config();

    // Initialize database pool
    info!("Initializing database pool...");
    let db_config = db::DieselDatabaseConfig::default();
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    // Run migrations if enabled
    if migrations::should_run_migrations() {
        info!("Running embedded migrations...");
        let migration_config = migrations::MigrationConfig::default();
        migrations::run_all_migrations(&diesel_pool, migration_config)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    // Initialize Redis pool
    info!("Initializing Redis pool...");
    let redis_config = RedisConfig::from_env();
    let redis_pool = RedisPool::new(redis_config).await?;

    // Initialize services
    let session_service = Arc::new(SessionService::new(
        redis_pool.clone(),
        config.session.ttl,
        config.session.guest_ttl,
    ));

    let magic_link_service = Arc::new(MagicLinkService::new(
        diesel_pool.clone(),
        redis_pool.clone(),
        config.email.resend_limit,
        config.email.resend_window,
        config.email.min_resend_cooldown,
    ));

    let email_service = Arc::new(EmailService::new(config.email.clone())?);

    // Create app state
    Ok(AppState {
        diesel_pool,
        redis_pool,
        session_service,
        magic_link_service,
        email_service,
        max_connections,
    })
}

/// Build the full application router
pub fn build_router(state: AppState) -> axum::Router {
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    let config = app_config::config();

    let protected = axum::Router::new()
        .nest("/v1/auth", protected_auth_routes())
        .nest("/v1/entries", entry_routes())
        .nest("/v1/drinks", drink_routes())
        .nest("/v1/limits", limit_routes())
        .nest("/v1/favorites", favorite_routes())
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let mut router = axum::Router::new()
        .route("/health", get(health_check))
        .nest("/v1/auth", public_auth_routes())
        .merge(protected);

    if config.enable_swagger_ui {
        router = router.nest("/v1/docs", docs_routes());
    }

    router
        .layer(axum::middleware::from_fn(
            middleware::dynamic_cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let mut overall_healthy = true;
    let timestamp = chrono::Utc::now().to_rfc3339();

    // Check PostgreSQL
    let postgres_health = match db::check_diesel_health(&state.diesel_pool).await {
        Ok(_) => serde_json::json!({
            "status": "healthy",
            "max_connections": state.max_connections,
            "error": null
        }),
        Err(e) => {
            overall_healthy = false;
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            })
        },
    };

    // Check Redis
    let redis_health_result = state.redis_pool.health_check().await;
    if !redis_health_result.is_healthy {
        overall_healthy = false;
    }

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "jolt-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health,
            "redis": serde_json::json!({
                "status": if redis_health_result.is_healthy { "healthy" } else { "unhealthy" },
                "latency_ms": redis_health_result.latency_ms,
                "error": redis_health_result.error
            })
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
