//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser UI and the API server.
//! Field names are camelCase, matching what the UI already stores and renders.

use recipe_curator_core::{CuratorError, Notice, Outcome, Recipe, Route, SessionSnapshot, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Requests FROM the Client (Browser)
//=========================================================================================

/// Login form. The password is accepted but not checked.
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpgradeRequest {
    /// `daily` or `monthly`.
    pub plan: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ToggleFavoriteRequest {
    pub title: String,
}

#[derive(Deserialize, ToSchema)]
pub struct GenerateRecipesRequest {
    /// Comma separated list of ingredients.
    pub ingredients: String,
}

#[derive(Deserialize, ToSchema)]
pub struct InstructionsRequest {
    pub title: String,
}

//=========================================================================================
// Responses TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct NoticeDto {
    pub title: String,
    pub description: Option<String>,
}

impl From<Notice> for NoticeDto {
    fn from(notice: Notice) -> Self {
        Self {
            title: notice.title,
            description: notice.description,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub name: String,
    pub is_logged_in: bool,
    /// `none`, `daily` or `monthly`.
    pub subscription: String,
    /// Epoch milliseconds; only set for the daily plan.
    pub subscription_end_date: Option<i64>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            is_logged_in: user.is_logged_in,
            subscription: user.subscription.to_string(),
            subscription_end_date: user.subscription_end_date.map(|d| d.timestamp_millis()),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDto {
    pub title: String,
    pub ingredients: String,
    /// The ingredients one by one, for rendering as badges.
    pub ingredient_list: Vec<String>,
    pub instructions: Option<String>,
}

impl From<Recipe> for RecipeDto {
    fn from(recipe: Recipe) -> Self {
        Self {
            ingredient_list: recipe.ingredient_list().into_iter().map(String::from).collect(),
            title: recipe.title,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
        }
    }
}

/// The full session as the UI renders it.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: Option<UserDto>,
    pub is_premium: bool,
    /// `HH:MM:SS` left on an active daily plan.
    pub remaining_time: Option<String>,
    pub favorites: Vec<String>,
    pub catalog: Vec<RecipeDto>,
}

impl From<SessionSnapshot> for SessionResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            user: snapshot.user.map(UserDto::from),
            is_premium: snapshot.is_premium,
            remaining_time: snapshot.remaining_time,
            favorites: snapshot.favorites,
            catalog: snapshot.catalog.into_iter().map(RecipeDto::from).collect(),
        }
    }
}

/// Returned by every state-changing action: what to show, where to go, and the new session.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct ActionResponse {
    pub notice: Option<NoticeDto>,
    /// Path of the view to navigate to, e.g. `/`.
    pub redirect: Option<String>,
    pub session: SessionResponse,
}

impl ActionResponse {
    pub fn new(outcome: Outcome, snapshot: SessionSnapshot) -> Self {
        Self {
            notice: outcome.notice.map(NoticeDto::from),
            redirect: outcome.redirect.map(|route| route.path().to_string()),
            session: snapshot.into(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct GenerateRecipesResponse {
    pub recipes: Vec<RecipeDto>,
}

/// Either the recipe with its instructions, or an upgrade prompt.
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InstructionsResponse {
    pub recipe: Option<RecipeDto>,
    /// The instructions split into display lines.
    pub steps: Vec<String>,
    pub upgrade_required: bool,
    pub notice: Option<NoticeDto>,
    pub redirect: Option<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub notice: NoticeDto,
    /// Path of the view the UI should send the user to instead, e.g. `/login`.
    pub redirect: Option<String>,
}

impl ErrorResponse {
    pub fn then_go(mut self, route: Route) -> Self {
        self.redirect = Some(route.path().to_string());
        self
    }
}

impl From<&CuratorError> for ErrorResponse {
    fn from(err: &CuratorError) -> Self {
        Self {
            error: err.to_string(),
            notice: err.notice().into(),
            redirect: None,
        }
    }
}
