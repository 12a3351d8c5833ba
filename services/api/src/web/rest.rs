//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the session, recipe, favorites and premium
//! endpoints, and the master definition for the OpenAPI specification.

use crate::web::{
    auth,
    protocol::{
        ActionResponse, ErrorResponse, GenerateRecipesRequest, GenerateRecipesResponse,
        InstructionsRequest, InstructionsResponse, LoginRequest, NoticeDto, RecipeDto,
        RegisterRequest, SessionResponse, ToggleFavoriteRequest, UpgradeRequest, UserDto,
    },
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use recipe_curator_core::{CuratorError, InstructionsOutcome, Route, SubscriptionType};
use std::sync::Arc;
use tracing::warn;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        session_handler,
        generate_recipes_handler,
        instructions_handler,
        toggle_favorite_handler,
        list_favorites_handler,
        upgrade_handler,
        auth::login_handler,
        auth::register_handler,
        auth::logout_handler,
    ),
    components(
        schemas(
            ActionResponse, ErrorResponse, GenerateRecipesRequest, GenerateRecipesResponse,
            InstructionsRequest, InstructionsResponse, LoginRequest, NoticeDto, RecipeDto,
            RegisterRequest, SessionResponse, ToggleFavoriteRequest, UpgradeRequest, UserDto,
        )
    ),
    tags(
        (name = "AI Recipe Curator API", description = "Recipe suggestions, premium instructions and favorites.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

pub type Rejection = (StatusCode, Json<ErrorResponse>);
pub type HandlerResult<T> = Result<Json<T>, Rejection>;

/// Maps a curator error to its HTTP status and user-facing body.
pub fn reject(err: CuratorError) -> Rejection {
    let status = match &err {
        CuratorError::Validation(_) => StatusCode::BAD_REQUEST,
        CuratorError::LoginRequired(_) => StatusCode::UNAUTHORIZED,
        CuratorError::RecipeNotFound(_) => StatusCode::NOT_FOUND,
        CuratorError::Payment => StatusCode::PAYMENT_REQUIRED,
        CuratorError::Suggestion | CuratorError::Instruction => StatusCode::BAD_GATEWAY,
    };
    (status, Json(ErrorResponse::from(&err)))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// GET /session - The current session, with entitlement evaluated now
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse)
    )
)]
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let curator = state.curator.lock().await;
    Json(curator.session().snapshot().into())
}

/// POST /recipes/generate - Suggest recipes for a list of ingredients
#[utoipa::path(
    post,
    path = "/recipes/generate",
    request_body = GenerateRecipesRequest,
    responses(
        (status = 200, description = "Suggested recipes, also added to the catalog", body = GenerateRecipesResponse),
        (status = 400, description = "Ingredient list too short", body = ErrorResponse),
        (status = 502, description = "The AI could not generate recipes", body = ErrorResponse)
    )
)]
pub async fn generate_recipes_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRecipesRequest>,
) -> HandlerResult<GenerateRecipesResponse> {
    let mut curator = state.curator.lock().await;
    let recipes = curator
        .generate_recipes(&req.ingredients)
        .await
        .map_err(reject)?;
    Ok(Json(GenerateRecipesResponse {
        recipes: recipes.into_iter().map(RecipeDto::from).collect(),
    }))
}

/// POST /recipes/instructions - Step-by-step instructions for a catalog recipe (premium)
#[utoipa::path(
    post,
    path = "/recipes/instructions",
    request_body = InstructionsRequest,
    responses(
        (status = 200, description = "Instructions, or an upgrade prompt for non-premium users", body = InstructionsResponse),
        (status = 404, description = "Recipe is not in the catalog", body = ErrorResponse),
        (status = 502, description = "The AI could not write instructions", body = ErrorResponse)
    )
)]
pub async fn instructions_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InstructionsRequest>,
) -> HandlerResult<InstructionsResponse> {
    let mut curator = state.curator.lock().await;
    let outcome = curator
        .request_instructions(&req.title)
        .await
        .map_err(reject)?;

    let response = match outcome {
        InstructionsOutcome::Ready(recipe) => InstructionsResponse {
            steps: recipe
                .instruction_steps()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            recipe: Some(recipe.into()),
            upgrade_required: false,
            notice: None,
            redirect: None,
        },
        InstructionsOutcome::UpgradeRequired(notice) => InstructionsResponse {
            recipe: None,
            steps: Vec::new(),
            upgrade_required: true,
            notice: Some(notice.into()),
            redirect: Some(Route::Premium.path().to_string()),
        },
    };
    Ok(Json(response))
}

/// POST /favorites/toggle - Add or remove a favorite (login required)
#[utoipa::path(
    post,
    path = "/favorites/toggle",
    request_body = ToggleFavoriteRequest,
    responses(
        (status = 200, description = "Favorite toggled", body = ActionResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn toggle_favorite_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleFavoriteRequest>,
) -> HandlerResult<ActionResponse> {
    let mut curator = state.curator.lock().await;
    let outcome = curator.toggle_favorite(&req.title).map_err(reject)?;
    Ok(Json(ActionResponse::new(outcome, curator.session().snapshot())))
}

/// GET /favorites - The favorite recipes, in catalog order (login required)
///
/// Signed-out users are pointed to the login view.
#[utoipa::path(
    get,
    path = "/favorites",
    responses(
        (status = 200, description = "Favorite recipes", body = Vec<RecipeDto>),
        (status = 401, description = "Not logged in, redirect to /login", body = ErrorResponse)
    )
)]
pub async fn list_favorites_handler(
    State(state): State<Arc<AppState>>,
) -> HandlerResult<Vec<RecipeDto>> {
    let curator = state.curator.lock().await;
    let session = curator.session();
    if !session.is_logged_in() {
        let (status, Json(body)) = reject(CuratorError::LoginRequired(
            "Please log in to see your favorites.".to_string(),
        ));
        return Err((status, Json(body.then_go(Route::Login))));
    }
    Ok(Json(
        session
            .favorite_recipes()
            .into_iter()
            .cloned()
            .map(RecipeDto::from)
            .collect(),
    ))
}

/// POST /premium/upgrade - Pay for a plan and upgrade the current user
#[utoipa::path(
    post,
    path = "/premium/upgrade",
    request_body = UpgradeRequest,
    responses(
        (status = 200, description = "Upgraded", body = ActionResponse),
        (status = 400, description = "Unknown plan, or already premium", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 402, description = "Payment failed", body = ErrorResponse)
    )
)]
pub async fn upgrade_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpgradeRequest>,
) -> HandlerResult<ActionResponse> {
    let plan = req.plan.parse::<SubscriptionType>().map_err(|e| {
        warn!("Rejected upgrade request: {}", e);
        reject(CuratorError::Validation(e.to_string()))
    })?;

    let mut curator = state.curator.lock().await;
    let outcome = curator.purchase(plan).await.map_err(reject)?;
    Ok(Json(ActionResponse::new(outcome, curator.session().snapshot())))
}
