//! Infrastructure boundary: collaborator port traits and the built-in
//! adapters that keep the engine runnable with no external services.

pub mod adapters;
pub mod ports;

pub use adapters::{
    FixedClock, InMemoryPersistence, NullAiFlow, StaticBookSource, StaticPlaceLookup,
    StaticRecipeSource, SystemClock,
};
pub use ports::{
    AiFlowPort, BookRef, BookSourcePort, ClockPort, LookupError, PersistenceError,
    PersistencePort, PlaceLookupPort, PlaceSummary, Recipe, RecipeSourcePort,
};
