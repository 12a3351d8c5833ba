//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use recipe_curator_core::Curator;
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// There is one session per running server. The mutex serializes every interaction
/// with it, including the AI calls and payments, so actions apply in request order.
pub struct AppState {
    pub curator: Mutex<Curator>,
}

impl AppState {
    pub fn new(curator: Curator) -> Arc<Self> {
        Arc::new(Self {
            curator: Mutex::new(curator),
        })
    }
}
