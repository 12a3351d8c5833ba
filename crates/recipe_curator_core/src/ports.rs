//! crates/recipe_curator_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the storage backend, the AI provider and the payment gateway.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::{PaymentReceipt, Recipe, SubscriptionType};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage and Time Ports
//=========================================================================================

/// Durable string key-value storage, the equivalent of a browser's local storage.
///
/// Calls are synchronous: the session manager updates memory and storage together.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> PortResult<()>;

    fn remove(&self, key: &str) -> PortResult<()>;
}

/// Source of the current time, used for subscription expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait RecipeSuggestionService: Send + Sync {
    /// Suggests recipes (title and core ingredients) for a comma separated ingredient list.
    ///
    /// All-or-nothing: implementations never return a partial list.
    async fn suggest_recipes(&self, ingredients: &str) -> PortResult<Vec<Recipe>>;
}

#[async_trait]
pub trait RecipeInstructionService: Send + Sync {
    /// Writes free-text, step-by-step cooking instructions for a recipe.
    async fn provide_instructions(&self, title: &str, ingredients: &str) -> PortResult<String>;
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Charges the price of `plan`. Fails for plans that cannot be bought.
    async fn charge(&self, plan: SubscriptionType) -> PortResult<PaymentReceipt>;
}
