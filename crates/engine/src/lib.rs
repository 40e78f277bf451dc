//! Wayfarer engine layer.
//!
//! Orchestration around the pure domain: the event bus, the state manager
//! with its total reducer, the cascading module-dependency enrichment engine,
//! the content and object enrichment modules, and the port traits for every
//! external collaborator (place lookup, recipes, books, AI flows,
//! persistence, clock).
//!
//! Ports are the only abstractions here; everything behind them is a
//! collaborator that may be swapped or absent. Collaborator failures never
//! cross into the reducer or the cascade - they degrade to placeholder
//! content at the boundary.

pub mod cascade;
pub mod event_bus;
pub mod infrastructure;
pub mod modules;
pub mod pipeline;
pub mod reducer;
pub mod state_manager;

pub use cascade::{
    CascadeContext, CascadeError, EnrichError, EnrichedContext, EnrichmentLevel, EnrichmentModule,
    ModuleDependency, ModuleEnrichmentResult, ModuleRegistry, PlayerSlice, resolve,
};
pub use event_bus::{EventBus, ListenerError, SubscriptionId};
pub use pipeline::{CascadeModule, DomainPipeline, ModuleInstance, ModuleResult, PipelineError};
pub use reducer::reduce;
pub use state_manager::{StateChange, StateManager};
