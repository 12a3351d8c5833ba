pub mod curator;
pub mod domain;
pub mod entitlement;
pub mod ports;
pub mod session;
pub mod store;

pub use curator::{Curator, CuratorError, InstructionsOutcome};
pub use domain::{Notice, Outcome, PaymentReceipt, Recipe, Route, SubscriptionType, User};
pub use ports::{
    Clock, KeyValueStore, PaymentProvider, PortError, PortResult, RecipeInstructionService,
    RecipeSuggestionService, SystemClock,
};
pub use session::{SessionManager, SessionSnapshot};
pub use store::MemoryStore;
