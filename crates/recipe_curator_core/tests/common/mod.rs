//! Shared fakes for the core integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use recipe_curator_core::{
    Clock, Curator, KeyValueStore, MemoryStore, PaymentProvider, PaymentReceipt, PortError,
    PortResult, Recipe, RecipeInstructionService, RecipeSuggestionService, SessionManager,
    SubscriptionType,
};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// A store whose every call fails.
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> PortResult<Option<String>> {
        Err(PortError::Unexpected("disk on fire".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> PortResult<()> {
        Err(PortError::Unexpected("disk on fire".to_string()))
    }

    fn remove(&self, _key: &str) -> PortResult<()> {
        Err(PortError::Unexpected("disk on fire".to_string()))
    }
}

/// Counts writes on top of a memory store.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub writes: AtomicUsize,
}

impl CountingStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key)
    }
}

// ---------------------------------------------------------------------------
// AI and payment fakes
// ---------------------------------------------------------------------------

pub fn recipe(title: &str) -> Recipe {
    Recipe::new(title, "chicken, rice")
}

/// Returns a fixed list of suggestions, or fails when built with `failing`.
pub struct ScriptedSuggestions {
    reply: Option<Vec<Recipe>>,
    pub calls: AtomicUsize,
}

impl ScriptedSuggestions {
    pub fn returning(titles: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(titles.iter().map(|t| recipe(t)).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeSuggestionService for ScriptedSuggestions {
    async fn suggest_recipes(&self, _ingredients: &str) -> PortResult<Vec<Recipe>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| PortError::Unexpected("model unavailable".to_string()))
    }
}

pub struct ScriptedInstructions {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl ScriptedInstructions {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeInstructionService for ScriptedInstructions {
    async fn provide_instructions(&self, title: &str, _ingredients: &str) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .as_ref()
            .map(|text| format!("{}\n{}", title, text))
            .ok_or_else(|| PortError::Unexpected("model busy".to_string()))
    }
}

/// Accepts every charge immediately, or declines every charge.
pub struct FakePayments {
    pub approve: bool,
    pub charges: Mutex<Vec<SubscriptionType>>,
}

impl FakePayments {
    pub fn approving() -> Arc<Self> {
        Arc::new(Self {
            approve: true,
            charges: Mutex::new(Vec::new()),
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            approve: false,
            charges: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn charge(&self, plan: SubscriptionType) -> PortResult<PaymentReceipt> {
        self.charges.lock().unwrap().push(plan);
        if !self.approve {
            return Err(PortError::Unexpected("card declined".to_string()));
        }
        Ok(PaymentReceipt {
            plan,
            amount_cents: plan.price_cents().unwrap_or(0),
            reference: "test-receipt".to_string(),
            paid_at: Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn session(store: Arc<dyn KeyValueStore>, clock: Arc<ManualClock>) -> SessionManager {
    SessionManager::load(store, clock)
}

pub fn curator(
    clock: Arc<ManualClock>,
    suggestions: Arc<ScriptedSuggestions>,
    instructions: Arc<ScriptedInstructions>,
    payments: Arc<FakePayments>,
) -> Curator {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    Curator::new(session(store, clock), suggestions, instructions, payments)
}
