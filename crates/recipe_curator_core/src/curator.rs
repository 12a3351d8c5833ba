//! crates/recipe_curator_core/src/curator.rs
//!
//! The application's control flow: ingredient validation, recipe suggestion into
//! the catalog, premium-gated instructions, favorites and plan purchases. The
//! `Curator` owns the session and talks to the outside world only through ports.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{Notice, Outcome, Recipe, SubscriptionType};
use crate::ports::{PaymentProvider, RecipeInstructionService, RecipeSuggestionService};
use crate::session::SessionManager;

/// Shortest ingredient list accepted, in characters.
pub const MIN_INGREDIENTS_LEN: usize = 3;

//=========================================================================================
// Errors and Outcomes
//=========================================================================================

/// User-facing failures. The `Display` text is what the user gets to see; the
/// underlying port errors are only logged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CuratorError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    LoginRequired(String),
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),
    #[error("Failed to generate recipes. The AI might be resting. Please try again later.")]
    Suggestion,
    #[error("Failed to get instructions. The AI seems to be busy. Please try again later.")]
    Instruction,
    #[error("Payment could not be completed. Please try again.")]
    Payment,
}

impl CuratorError {
    /// The notice the presentation layer shows for this error.
    pub fn notice(&self) -> Notice {
        match self {
            CuratorError::LoginRequired(message) => Notice::new("Login Required", message.clone()),
            other => Notice::new("Error", other.to_string()),
        }
    }
}

/// Result of asking for a recipe's instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionsOutcome {
    /// The recipe, with `instructions` filled in.
    Ready(Recipe),
    /// The user is not premium; no request was made.
    UpgradeRequired(Notice),
}

fn upgrade_notice() -> Notice {
    Notice::new(
        "Premium Feature",
        "Upgrade to premium to unlock AI-powered instructions.",
    )
}

//=========================================================================================
// Curator
//=========================================================================================

pub struct Curator {
    session: SessionManager,
    suggestions: Arc<dyn RecipeSuggestionService>,
    instructions: Arc<dyn RecipeInstructionService>,
    payments: Arc<dyn PaymentProvider>,
}

impl Curator {
    pub fn new(
        session: SessionManager,
        suggestions: Arc<dyn RecipeSuggestionService>,
        instructions: Arc<dyn RecipeInstructionService>,
        payments: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            session,
            suggestions,
            instructions,
            payments,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    /// Asks for recipe ideas and records them in the catalog.
    ///
    /// Returns the suggestions as generated, including any the catalog already held.
    pub async fn generate_recipes(
        &mut self,
        ingredients: &str,
    ) -> Result<Vec<Recipe>, CuratorError> {
        let ingredients = ingredients.trim();
        if ingredients.chars().count() < MIN_INGREDIENTS_LEN {
            return Err(CuratorError::Validation(
                "Please enter at least one ingredient.".to_string(),
            ));
        }

        let recipes = self
            .suggestions
            .suggest_recipes(ingredients)
            .await
            .map_err(|e| {
                error!("Recipe suggestion failed: {:?}", e);
                CuratorError::Suggestion
            })?;

        let added = self.session.add_recipes(recipes.iter().cloned());
        info!(suggested = recipes.len(), added, "Recipes generated");
        Ok(recipes)
    }

    /// Returns the catalog recipe with instructions, fetching them on first request.
    ///
    /// Users without premium get an upgrade prompt and no request is sent.
    pub async fn request_instructions(
        &mut self,
        title: &str,
    ) -> Result<InstructionsOutcome, CuratorError> {
        let recipe = self
            .session
            .recipe(title)
            .cloned()
            .ok_or_else(|| CuratorError::RecipeNotFound(title.to_string()))?;

        if !self.session.is_premium() {
            return Ok(InstructionsOutcome::UpgradeRequired(upgrade_notice()));
        }
        if recipe.instructions.is_some() {
            return Ok(InstructionsOutcome::Ready(recipe));
        }
        if recipe.title.trim().is_empty() || recipe.ingredients.trim().is_empty() {
            return Err(CuratorError::Validation(
                "Invalid recipe data provided.".to_string(),
            ));
        }

        let text = self
            .instructions
            .provide_instructions(&recipe.title, &recipe.ingredients)
            .await
            .map_err(|e| {
                error!("Instruction generation failed for '{}': {:?}", recipe.title, e);
                CuratorError::Instruction
            })?;

        self.session.set_instructions(&recipe.title, &text);
        Ok(InstructionsOutcome::Ready(Recipe {
            instructions: Some(text),
            ..recipe
        }))
    }

    /// Toggles a favorite. Only signed-in users have favorites.
    pub fn toggle_favorite(&mut self, title: &str) -> Result<Outcome, CuratorError> {
        if !self.session.is_logged_in() {
            return Err(CuratorError::LoginRequired(
                "Please log in to save favorites.".to_string(),
            ));
        }
        Ok(self.session.toggle_favorite(title))
    }

    /// Charges for `plan` and, once paid, upgrades the current user and sends them home.
    ///
    /// A user whose plan is still active cannot buy another one.
    pub async fn purchase(&mut self, plan: SubscriptionType) -> Result<Outcome, CuratorError> {
        if !self.session.is_logged_in() {
            return Err(CuratorError::LoginRequired(
                "Please log in to upgrade.".to_string(),
            ));
        }
        if plan == SubscriptionType::None {
            return Err(CuratorError::Validation(
                "Choose a daily or monthly plan.".to_string(),
            ));
        }
        if self.session.is_premium() {
            return Err(CuratorError::Validation(
                "You are already a Premium Member!".to_string(),
            ));
        }

        let receipt = self.payments.charge(plan).await.map_err(|e| {
            error!("Payment for the {} plan failed: {:?}", plan, e);
            CuratorError::Payment
        })?;
        info!(
            plan = %receipt.plan,
            amount_cents = receipt.amount_cents,
            reference = %receipt.reference,
            "Payment completed"
        );

        Ok(self.session.upgrade_premium(plan, true))
    }
}
