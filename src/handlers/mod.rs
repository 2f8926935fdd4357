// HTTP handlers and route builders

pub mod auth;
pub mod docs;
pub mod drinks;
pub mod entries;
pub mod favorites;
pub mod limits;

use crate::app::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

// Public authentication routes (no session required)
pub fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/guest", post(auth::create_guest_session))
        .route("/magic-link", post(auth::request_magic_link))
        .route("/verify", post(auth::verify_magic_link))
}

// Session-protected authentication routes
pub fn protected_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/logout", post(auth::logout))
}

// Entry routes
pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(entries::create_entry))
        .route("/day", get(entries::get_daily_summary))
        .route("/history", get(entries::get_history))
        .route(
            "/{id}",
            put(entries::update_entry).delete(entries::delete_entry),
        )
}

// Drink template routes
pub fn drink_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(drinks::list_drinks).post(drinks::create_drink))
        .route(
            "/{id}",
            put(drinks::update_drink).delete(drinks::delete_drink),
        )
}

// Daily limit routes
pub fn limit_routes() -> Router<AppState> {
    Router::new().route("/", get(limits::get_limit_history).post(limits::set_limit))
}

// Favorite routes
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(favorites::list_favorites).post(favorites::create_favorite),
        )
        .route("/{id}", delete(favorites::delete_favorite))
}

// API documentation routes
pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(docs::serve_swagger_ui))
        .route("/openapi.json", get(docs::serve_openapi))
}
