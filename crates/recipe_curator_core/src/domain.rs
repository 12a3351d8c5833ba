//! crates/recipe_curator_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! The serde shapes of `User` and `Recipe` are also the documents written to
//! the key-value store, so their field names are part of the storage format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Subscription Plans
//=========================================================================================

/// The premium tier a user is subscribed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    #[default]
    None,
    /// Expires 24 hours after purchase.
    Daily,
    /// Never expires client-side.
    Monthly,
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::None => "none",
            SubscriptionType::Daily => "daily",
            SubscriptionType::Monthly => "monthly",
        }
    }

    /// Price of the plan in cents, or `None` for the free tier.
    pub fn price_cents(&self) -> Option<u32> {
        match self {
            SubscriptionType::None => None,
            SubscriptionType::Daily => Some(99),
            SubscriptionType::Monthly => Some(999),
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown subscription plan: {0}")]
pub struct UnknownPlan(pub String);

impl FromStr for SubscriptionType {
    type Err = UnknownPlan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(SubscriptionType::None),
            "daily" => Ok(SubscriptionType::Daily),
            "monthly" => Ok(SubscriptionType::Monthly),
            other => Err(UnknownPlan(other.to_string())),
        }
    }
}

//=========================================================================================
// User
//=========================================================================================

/// The signed-in user of this client.
///
/// `subscription_end_date` is only meaningful for the daily plan. It is kept as
/// epoch milliseconds in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub is_logged_in: bool,
    #[serde(default)]
    pub subscription: SubscriptionType,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub subscription_end_date: Option<DateTime<Utc>>,
}

impl User {
    /// A freshly created account on the free tier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_logged_in: true,
            subscription: SubscriptionType::None,
            subscription_end_date: None,
        }
    }

    /// Repairs a record whose end date does not match its plan.
    ///
    /// Only the daily plan carries an end date. A daily plan without one
    /// falls back to the free tier.
    pub fn normalized(mut self) -> Self {
        match (self.subscription, self.subscription_end_date) {
            (SubscriptionType::Daily, None) => self.subscription = SubscriptionType::None,
            (SubscriptionType::Daily, Some(_)) => {}
            (_, _) => self.subscription_end_date = None,
        }
        self
    }
}

//=========================================================================================
// Recipe
//=========================================================================================

/// A generated recipe. `title` is the unique key within the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    /// Comma separated list of ingredients.
    pub ingredients: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Recipe {
    pub fn new(title: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ingredients: ingredients.into(),
            instructions: None,
        }
    }

    /// The individual ingredients, trimmed, blanks dropped.
    pub fn ingredient_list(&self) -> Vec<&str> {
        self.ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// The instruction text split into displayable steps.
    pub fn instruction_steps(&self) -> Vec<&str> {
        self.instructions
            .as_deref()
            .map(instruction_steps)
            .unwrap_or_default()
    }
}

/// Splits free-text instructions on line breaks, dropping blank lines.
pub fn instruction_steps(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

//=========================================================================================
// Presentation Effects
//=========================================================================================

/// A short message for the presentation layer to show the user (a "toast").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn title_only(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }
}

/// A view the presentation layer should navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    Login,
    Premium,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Premium => "/premium",
        }
    }
}

/// The user-visible side effects of a session operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub notice: Option<Notice>,
    pub redirect: Option<Route>,
}

impl Outcome {
    pub fn notify(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            redirect: None,
        }
    }

    pub fn then_go(mut self, route: Route) -> Self {
        self.redirect = Some(route);
        self
    }
}

//=========================================================================================
// Payments
//=========================================================================================

/// Proof of a completed (possibly simulated) plan purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub plan: SubscriptionType,
    pub amount_cents: u32,
    pub reference: String,
    pub paid_at: DateTime<Utc>,
}
