//! crates/recipe_curator_core/src/session.rs
//!
//! The session/entitlement manager: owns the current user, their favorites and
//! the catalog of every recipe generated on this client, and mirrors each of the
//! three slices to the key-value store on every change.
//!
//! Loading is forgiving: a slice that is missing, unreadable or malformed loads as
//! empty. Writing is best-effort: a failed write is logged and the in-memory state
//! still changes.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Notice, Outcome, Recipe, Route, SubscriptionType, User};
use crate::entitlement;
use crate::ports::{Clock, KeyValueStore};

/// Storage key of the user record.
pub const USER_KEY: &str = "recipeUser";
/// Storage key of the favorite titles.
pub const FAVORITES_KEY: &str = "recipeFavorites";
/// Storage key of the recipe catalog.
pub const ALL_RECIPES_KEY: &str = "recipeAllRecipes";

//=========================================================================================
// Snapshot
//=========================================================================================

/// Everything the presentation layer needs to render, with entitlement resolved
/// against the clock at the moment of the call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_premium: bool,
    /// `HH:MM:SS` left on an active daily plan.
    pub remaining_time: Option<String>,
    pub favorites: Vec<String>,
    pub catalog: Vec<Recipe>,
}

//=========================================================================================
// SessionManager
//=========================================================================================

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    user: Option<User>,
    favorites: Vec<String>,
    catalog: Vec<Recipe>,
}

impl SessionManager {
    /// Restores the session from `store`.
    ///
    /// A stored user record that is signed out is kept in storage (so `login` can
    /// restore its plan) but does not become the current user.
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let user = read_user(store.as_ref()).filter(|u| u.is_logged_in);

        let mut seen = HashSet::new();
        let favorites = read_slice::<Vec<String>>(store.as_ref(), FAVORITES_KEY)
            .unwrap_or_default()
            .into_iter()
            .filter(|title| seen.insert(title.clone()))
            .collect();

        let catalog =
            read_slice::<Vec<Recipe>>(store.as_ref(), ALL_RECIPES_KEY).unwrap_or_default();

        Self {
            store,
            clock,
            user,
            favorites,
            catalog,
        }
    }

    //-------------------------------------------------------------------------------------
    // Reads
    //-------------------------------------------------------------------------------------

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.as_ref().map_or(false, |u| u.is_logged_in)
    }

    /// Recomputed from the stored plan and the clock on every call.
    pub fn is_premium(&self) -> bool {
        let now = self.clock.now();
        self.user
            .as_ref()
            .map_or(false, |u| entitlement::is_premium(u, now))
    }

    pub fn remaining_premium_time(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.user
            .as_ref()
            .and_then(|u| entitlement::remaining_premium_time(u, now))
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn is_favorite(&self, title: &str) -> bool {
        self.favorites.iter().any(|f| f == title)
    }

    pub fn catalog(&self) -> &[Recipe] {
        &self.catalog
    }

    pub fn recipe(&self, title: &str) -> Option<&Recipe> {
        self.catalog.iter().find(|r| r.title == title)
    }

    /// Catalog entries that are favorites, in catalog order.
    pub fn favorite_recipes(&self) -> Vec<&Recipe> {
        self.catalog
            .iter()
            .filter(|r| self.is_favorite(&r.title))
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            is_premium: self.is_premium(),
            remaining_time: self.remaining_premium_time().map(entitlement::format_remaining),
            favorites: self.favorites.clone(),
            catalog: self.catalog.clone(),
        }
    }

    //-------------------------------------------------------------------------------------
    // Account lifecycle
    //-------------------------------------------------------------------------------------

    /// Signs in as `name`, keeping the plan of the previously stored user record.
    pub fn login(&mut self, name: &str) -> Outcome {
        let user = match read_user(self.store.as_ref()) {
            Some(previous) => User {
                name: name.to_string(),
                is_logged_in: true,
                ..previous
            },
            None => User::new(name),
        };
        info!(user = %user.name, plan = %user.subscription, "User logged in");
        self.persist_user(user);
        Outcome::notify(Notice::new("Welcome back!", "You are now logged in.")).then_go(Route::Home)
    }

    /// Signs out and clears favorites. The catalog is kept.
    pub fn logout(&mut self) -> Outcome {
        if let Some(mut user) = self.user.take() {
            info!(user = %user.name, "User logged out");
            user.is_logged_in = false;
            write_slice(self.store.as_ref(), USER_KEY, &user);
        }
        self.favorites.clear();
        if let Err(e) = self.store.remove(FAVORITES_KEY) {
            warn!(key = FAVORITES_KEY, error = %e, "Failed to clear stored favorites");
        }
        Outcome::notify(Notice::new("Logged out", "You have been successfully logged out."))
            .then_go(Route::Home)
    }

    /// Creates a fresh free-tier account, replacing any stored user record.
    pub fn register(&mut self, name: &str) -> Outcome {
        let user = User::new(name);
        info!(user = %user.name, "User registered");
        self.persist_user(user);
        Outcome::notify(Notice::new("Account created!", "Welcome to AI Recipe Curator."))
            .then_go(Route::Home)
    }

    /// Switches the current user to `plan`. Does nothing when signed out or for the free tier.
    pub fn upgrade_premium(&mut self, plan: SubscriptionType, redirect: bool) -> Outcome {
        let now = self.clock.now();
        let Some(mut user) = self.user.clone() else {
            return Outcome::default();
        };

        user.subscription_end_date = match plan {
            SubscriptionType::Daily => Some(now + entitlement::daily_plan_length()),
            SubscriptionType::Monthly => None,
            SubscriptionType::None => {
                warn!(user = %user.name, "Ignoring upgrade to the free tier");
                return Outcome::default();
            }
        };
        user.subscription = plan;
        info!(user = %user.name, plan = %plan, "User upgraded to premium");
        self.persist_user(user);

        let outcome = Outcome::notify(Notice::new(
            "Congratulations!",
            "You are now a premium member.",
        ));
        if redirect {
            outcome.then_go(Route::Home)
        } else {
            outcome
        }
    }

    //-------------------------------------------------------------------------------------
    // Favorites and catalog
    //-------------------------------------------------------------------------------------

    /// Adds `title` to the favorites, or removes it if already there.
    pub fn toggle_favorite(&mut self, title: &str) -> Outcome {
        let notice = if let Some(pos) = self.favorites.iter().position(|f| f == title) {
            self.favorites.remove(pos);
            Notice::title_only("Removed from favorites.")
        } else {
            self.favorites.push(title.to_string());
            Notice::title_only("Added to favorites!")
        };
        write_slice(self.store.as_ref(), FAVORITES_KEY, &self.favorites);
        Outcome::notify(notice)
    }

    /// Appends the recipes whose titles are not yet in the catalog, in the given order.
    ///
    /// Returns how many were appended; storage is only written when that is non-zero.
    pub fn add_recipes(&mut self, new_recipes: impl IntoIterator<Item = Recipe>) -> usize {
        let mut titles: HashSet<String> = self.catalog.iter().map(|r| r.title.clone()).collect();
        let fresh: Vec<Recipe> = new_recipes
            .into_iter()
            .filter(|r| titles.insert(r.title.clone()))
            .collect();

        let added = fresh.len();
        if added > 0 {
            self.catalog.extend(fresh);
            write_slice(self.store.as_ref(), ALL_RECIPES_KEY, &self.catalog);
        }
        added
    }

    /// Stores fetched instructions on the catalog entry. Returns `false` for an unknown title.
    pub fn set_instructions(&mut self, title: &str, instructions: &str) -> bool {
        let Some(recipe) = self.catalog.iter_mut().find(|r| r.title == title) else {
            return false;
        };
        recipe.instructions = Some(instructions.to_string());
        write_slice(self.store.as_ref(), ALL_RECIPES_KEY, &self.catalog);
        true
    }

    fn persist_user(&mut self, user: User) {
        write_slice(self.store.as_ref(), USER_KEY, &user);
        self.user = Some(user);
    }
}

//=========================================================================================
// Storage helpers
//=========================================================================================

/// Reads the stored user record, repairing an end date that does not match the plan.
fn read_user(store: &dyn KeyValueStore) -> Option<User> {
    let user = read_slice::<User>(store, USER_KEY)?;
    let normalized = user.clone().normalized();
    if normalized != user {
        warn!(user = %user.name, "Repaired stored subscription that did not match its plan");
    }
    Some(normalized)
}

/// Reads and decodes one slice. A stored JSON `null` counts as absent.
fn read_slice<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored session data, using defaults");
            return None;
        }
    };
    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed session data");
            None
        }
    }
}

fn write_slice<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(key, error = %e, "Failed to encode session data");
            return;
        }
    };
    if let Err(e) = store.set(key, &json) {
        warn!(key, error = %e, "Failed to persist session data");
    }
}
