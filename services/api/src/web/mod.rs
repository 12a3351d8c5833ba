pub mod auth;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use state::AppState;

pub use auth::{login_handler, logout_handler, register_handler};
pub use rest::{
    generate_recipes_handler, instructions_handler, list_favorites_handler, session_handler,
    toggle_favorite_handler, upgrade_handler,
};

/// Builds the API router over the shared state. CORS and docs are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/session", get(session_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/recipes/generate", post(generate_recipes_handler))
        .route("/recipes/instructions", post(instructions_handler))
        .route("/favorites", get(list_favorites_handler))
        .route("/favorites/toggle", post(toggle_favorite_handler))
        .route("/premium/upgrade", post(upgrade_handler))
        .with_state(app_state)
}
