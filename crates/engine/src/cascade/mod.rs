//! Cascading module-dependency enrichment engine.
//!
//! Independently authored enrichment modules declare dependencies on other
//! modules by id; the resolver computes a dependency-ordered execution plan,
//! runs independent siblings concurrently, merges partial results, and
//! tolerates partial failure. Module data is opaque JSON - only the
//! producing and consuming modules agree on its shape.

mod resolver;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use wayfarer_domain::{IntelligentItem, Physiology, Player, SkillSet};

pub use resolver::resolve;

/// How deep a dependent wants its dependency's output to be.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentLevel {
    #[default]
    Basic,
    Detailed,
    Comprehensive,
}

/// One declared dependency edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDependency {
    pub module_id: String,
    pub required: bool,
    pub enrichment_level: EnrichmentLevel,
}

impl ModuleDependency {
    pub fn required(module_id: impl Into<String>, level: EnrichmentLevel) -> Self {
        Self {
            module_id: module_id.into(),
            required: true,
            enrichment_level: level,
        }
    }

    pub fn optional(module_id: impl Into<String>, level: EnrichmentLevel) -> Self {
        Self {
            module_id: module_id.into(),
            required: false,
            enrichment_level: level,
        }
    }
}

/// Output of one module within one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEnrichmentResult {
    pub module_id: String,
    /// Module-specific shape, opaque to the engine.
    pub data: Value,
    pub enrichment_level: EnrichmentLevel,
    /// Ids of the dependencies whose results actually fed this module.
    pub dependencies_used: Vec<String>,
    /// Wall-clock milliseconds for the module's own computation, excluding
    /// dependency time.
    pub execution_time_ms: u64,
}

/// The acting player's relevant state slice.
#[derive(Debug, Clone, Default)]
pub struct PlayerSlice {
    pub location_name: String,
    pub inventory: Vec<IntelligentItem>,
    pub skills: SkillSet,
    pub physiology: Physiology,
}

impl PlayerSlice {
    pub fn from_player(player: &Player) -> Self {
        Self {
            location_name: player.location.name.clone(),
            inventory: player.inventory.clone(),
            skills: player.skills.clone(),
            physiology: player.physiology,
        }
    }
}

/// Caller-supplied input to a resolution: the player slice and the
/// triggering action/payload.
#[derive(Debug, Clone, Default)]
pub struct CascadeContext {
    pub player: PlayerSlice,
    pub trigger: Value,
}

/// Immutable input bundle passed to one module execution.
///
/// `dependency_results` holds an entry for every listed dependency that
/// resolved successfully; missing optional dependencies are simply absent,
/// never null-valued placeholders.
#[derive(Debug, Clone)]
pub struct EnrichedContext {
    pub player: PlayerSlice,
    pub trigger: Value,
    pub requested_level: EnrichmentLevel,
    pub dependency_results: HashMap<String, ModuleEnrichmentResult>,
}

impl EnrichedContext {
    /// Convenience accessor for a dependency's data payload.
    pub fn dependency_data(&self, module_id: &str) -> Option<&Value> {
        self.dependency_results.get(module_id).map(|r| &r.data)
    }
}

/// Failure raised by a module's own computation. Contained at the resolver
/// boundary: it becomes a failed result for that module only.
#[derive(Debug, Error)]
#[error("Enrichment failed: {0}")]
pub struct EnrichError(pub String);

impl EnrichError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors that bubble to the resolution caller. Everything else is contained
/// per-module.
#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("Module not registered: {module_id}")]
    UnknownModule { module_id: String },

    #[error("Cyclic module dependency: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("Unresolved required dependency '{dependency_id}' of '{module_id}': {reason}")]
    UnresolvedRequiredDependency {
        module_id: String,
        dependency_id: String,
        reason: String,
    },

    #[error("Target module '{module_id}' failed: {reason}")]
    TargetFailed { module_id: String, reason: String },
}

/// A unit computing one named facet of derived content.
#[async_trait]
pub trait EnrichmentModule: Send + Sync {
    /// Unique id within a registry.
    fn id(&self) -> &str;

    fn dependencies(&self) -> &[ModuleDependency] {
        &[]
    }

    async fn enrich(&self, ctx: &EnrichedContext) -> Result<Value, EnrichError>;
}

/// Mapping from module id to instance. Populated at process start, treated
/// as immutable for the rest of the session.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn EnrichmentModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Re-registering an id replaces the previous entry
    /// and is logged, since it usually indicates a wiring mistake.
    pub fn register(&mut self, module: Arc<dyn EnrichmentModule>) {
        let id = module.id().to_string();
        if self.modules.insert(id.clone(), module).is_some() {
            tracing::warn!(module_id = %id, "Module id registered twice, replacing");
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn EnrichmentModule>> {
        self.modules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
