//! services/api/src/web/auth.rs
//!
//! Account endpoints: login, register and logout.
//!
//! There is no credential check. A login simply names the user after the local
//! part of the email address and restores whatever plan was stored for this client.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;

use crate::web::{
    protocol::{ActionResponse, ErrorResponse, LoginRequest, RegisterRequest},
    rest::{reject, HandlerResult, Rejection},
    state::AppState,
};
use recipe_curator_core::CuratorError;

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Sign in, keeping the plan stored for this client
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ActionResponse),
        (status = 400, description = "Missing email", body = ErrorResponse)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> HandlerResult<ActionResponse> {
    let name = display_name(&req.email)
        .ok_or_else(|| reject(CuratorError::Validation("Please enter your email.".to_string())))?;

    let mut curator = state.curator.lock().await;
    let outcome = curator.session_mut().login(name);
    Ok(Json(ActionResponse::new(outcome, curator.session().snapshot())))
}

/// POST /auth/register - Create a fresh free-tier account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ActionResponse),
        (status = 400, description = "Missing name", body = ErrorResponse)
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ActionResponse>), Rejection> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(reject(CuratorError::Validation(
            "Please enter your name.".to_string(),
        )));
    }

    let mut curator = state.curator.lock().await;
    let outcome = curator.session_mut().register(name);
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new(outcome, curator.session().snapshot())),
    ))
}

/// POST /auth/logout - Sign out and clear favorites
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = ActionResponse)
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Json<ActionResponse> {
    let mut curator = state.curator.lock().await;
    let outcome = curator.session_mut().logout();
    info!("Session cleared; catalog kept with {} recipes", curator.session().catalog().len());
    Json(ActionResponse::new(outcome, curator.session().snapshot()))
}

//=========================================================================================
// Helpers
//=========================================================================================

/// The part of an email address before the `@`, used as the display name.
fn display_name(email: &str) -> Option<&str> {
    let email = email.trim();
    let name = email.split('@').next().unwrap_or(email).trim();
    (!name.is_empty()).then_some(name)
}
