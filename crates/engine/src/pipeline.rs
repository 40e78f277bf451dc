//! Domain-logic cascade: the second flavor of module.
//!
//! Unlike enrichment modules, a `CascadeModule`'s dependency list is a plain
//! name list - it expresses module existence and ordering, not merged-data
//! feed-through. The `load()`-produced instance reads whatever shared state
//! it needs from the `GameState` it is handed. The runner orders modules
//! topologically, loads them, and executes the chain, containing individual
//! execution failures per module.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use wayfarer_domain::{
    add_item_to_inventory, add_player_xp, add_quest, apply_skill_xp, handle_money_change,
    GameEvent, GameState, ItemMaster, Quest,
};

use crate::infrastructure::ports::ClockPort;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Module not registered: {name}")]
    UnknownModule { name: String },

    #[error("Cyclic module dependency: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("Module '{name}' failed to load: {reason}")]
    LoadFailed { name: String, reason: String },
}

/// Outcome of one module execution.
#[derive(Debug, Clone)]
pub struct ModuleResult {
    pub success: bool,
    pub events: Vec<GameEvent>,
    pub errors: Vec<String>,
}

impl ModuleResult {
    pub fn ok(events: Vec<GameEvent>) -> Self {
        Self {
            success: true,
            events,
            errors: Vec::new(),
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            events: Vec::new(),
            errors: vec![error.into()],
        }
    }
}

/// A loaded, executable domain-logic module.
pub trait ModuleInstance: Send + Sync {
    fn execute(&self, state: &GameState, payload: &Value) -> ModuleResult;
}

/// Self-describing, lazily loaded domain-logic module.
#[async_trait]
pub trait CascadeModule: Send + Sync {
    fn name(&self) -> &str;

    /// Names of modules that must exist and run before this one.
    fn dependencies(&self) -> &[&str] {
        &[]
    }

    async fn load(&self) -> Result<Arc<dyn ModuleInstance>, PipelineError>;
}

/// Runner over a fixed module set, wired once at startup.
#[derive(Default)]
pub struct DomainPipeline {
    modules: Vec<Arc<dyn CascadeModule>>,
}

impl DomainPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: Arc<dyn CascadeModule>) {
        self.modules.push(module);
    }

    /// The standard game pipeline with every domain-logic wrapper.
    pub fn standard(clock: Arc<dyn ClockPort>) -> Self {
        let mut pipeline = Self::new();
        pipeline.register(Arc::new(PlayerLogicModule));
        pipeline.register(Arc::new(InventoryLogicModule));
        pipeline.register(Arc::new(EconomyLogicModule::new(clock)));
        pipeline.register(Arc::new(QuestsLogicModule));
        pipeline.register(Arc::new(HistoricalLogicModule));
        pipeline
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn CascadeModule>> {
        self.modules.iter().find(|m| m.name() == name)
    }

    /// Dependency-ordered names to run for `target`, dependencies first.
    fn plan(&self, target: &str) -> Result<Vec<String>, PipelineError> {
        #[derive(PartialEq)]
        enum Mark {
            Visiting,
            Visited,
        }

        fn visit(
            pipeline: &DomainPipeline,
            name: &str,
            marks: &mut HashMap<String, Mark>,
            path: &mut Vec<String>,
            order: &mut Vec<String>,
        ) -> Result<(), PipelineError> {
            let Some(module) = pipeline.find(name) else {
                return Err(PipelineError::UnknownModule { name: name.into() });
            };
            marks.insert(name.to_string(), Mark::Visiting);
            path.push(name.to_string());
            for dep in module.dependencies() {
                match marks.get(*dep) {
                    Some(Mark::Visiting) => {
                        let mut cycle = path.clone();
                        cycle.push((*dep).to_string());
                        return Err(PipelineError::CyclicDependency { path: cycle });
                    }
                    Some(Mark::Visited) => {}
                    None => visit(pipeline, dep, marks, path, order)?,
                }
            }
            path.pop();
            marks.insert(name.to_string(), Mark::Visited);
            order.push(name.to_string());
            Ok(())
        }

        let mut marks = HashMap::new();
        let mut path = Vec::new();
        let mut order = Vec::new();
        visit(self, target, &mut marks, &mut path, &mut order)?;
        Ok(order)
    }

    /// Load and execute `target` and its dependency chain in order.
    ///
    /// An execution failure is contained: it is logged, recorded in the
    /// report, and the rest of the chain still runs. Load failures and
    /// unknown/cyclic dependencies abort, since they are wiring defects.
    pub async fn run(
        &self,
        target: &str,
        state: &GameState,
        payload: &Value,
    ) -> Result<Vec<(String, ModuleResult)>, PipelineError> {
        let order = self.plan(target)?;
        let mut report = Vec::with_capacity(order.len());

        for name in order {
            let module = self
                .find(&name)
                .ok_or_else(|| PipelineError::UnknownModule { name: name.clone() })?;
            let instance = module.load().await?;
            let result = instance.execute(state, payload);
            if !result.success {
                tracing::warn!(module = %name, errors = ?result.errors, "Domain module declined to act");
            }
            report.push((name, result));
        }

        Ok(report)
    }
}

// =============================================================================
// Concrete wrappers
// =============================================================================

fn payload_field<T: serde::de::DeserializeOwned>(payload: &Value, field: &str) -> Option<T> {
    payload
        .get(field)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
}

/// Player progression wrapper: `{"xpGained": n}` and/or
/// `{"skillPath": "...", "skillXp": n}`.
pub struct PlayerLogicModule;

struct PlayerLogicInstance;

impl ModuleInstance for PlayerLogicInstance {
    fn execute(&self, state: &GameState, payload: &Value) -> ModuleResult {
        let Some(player) = &state.player else {
            return ModuleResult::fail("no player in state");
        };

        let mut events = Vec::new();
        if let Some(xp) = payload_field::<u64>(payload, "xpGained") {
            let (_, mut xp_events) = add_player_xp(&player.progression, xp);
            events.append(&mut xp_events);
        }
        if let (Some(path), Some(xp)) = (
            payload_field::<String>(payload, "skillPath"),
            payload_field::<u64>(payload, "skillXp"),
        ) {
            let (_, mut skill_events) = apply_skill_xp(&player.skills, &path, xp);
            events.append(&mut skill_events);
        }
        ModuleResult::ok(events)
    }
}

#[async_trait]
impl CascadeModule for PlayerLogicModule {
    fn name(&self) -> &str {
        "player"
    }

    async fn load(&self) -> Result<Arc<dyn ModuleInstance>, PipelineError> {
        Ok(Arc::new(PlayerLogicInstance))
    }
}

/// Inventory wrapper: `{"master": ItemMaster, "quantity": n}`.
pub struct InventoryLogicModule;

struct InventoryLogicInstance;

impl ModuleInstance for InventoryLogicInstance {
    fn execute(&self, state: &GameState, payload: &Value) -> ModuleResult {
        let Some(player) = &state.player else {
            return ModuleResult::fail("no player in state");
        };
        let Some(master) = payload_field::<ItemMaster>(payload, "master") else {
            return ModuleResult::fail("missing or malformed 'master'");
        };
        let quantity = payload_field::<u32>(payload, "quantity").unwrap_or(1);

        let (_, events) = add_item_to_inventory(
            &player.inventory,
            &master,
            quantity,
            &player.location.name,
            None,
        );
        ModuleResult::ok(events)
    }
}

#[async_trait]
impl CascadeModule for InventoryLogicModule {
    fn name(&self) -> &str {
        "inventory"
    }

    fn dependencies(&self) -> &[&str] {
        &["player"]
    }

    async fn load(&self) -> Result<Arc<dyn ModuleInstance>, PipelineError> {
        Ok(Arc::new(InventoryLogicInstance))
    }
}

/// Economy wrapper: `{"amount": f64, "description": "..."}`.
pub struct EconomyLogicModule {
    clock: Arc<dyn ClockPort>,
}

impl EconomyLogicModule {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self { clock }
    }
}

struct EconomyLogicInstance {
    clock: Arc<dyn ClockPort>,
}

impl ModuleInstance for EconomyLogicInstance {
    fn execute(&self, state: &GameState, payload: &Value) -> ModuleResult {
        let Some(player) = &state.player else {
            return ModuleResult::fail("no player in state");
        };
        let Some(amount) = payload_field::<f64>(payload, "amount") else {
            return ModuleResult::fail("missing or malformed 'amount'");
        };
        let description = payload_field::<String>(payload, "description").unwrap_or_default();

        let (_, events) = handle_money_change(player, amount, &description, self.clock.now());
        ModuleResult::ok(events)
    }
}

#[async_trait]
impl CascadeModule for EconomyLogicModule {
    fn name(&self) -> &str {
        "economy"
    }

    fn dependencies(&self) -> &[&str] {
        &["player"]
    }

    async fn load(&self) -> Result<Arc<dyn ModuleInstance>, PipelineError> {
        Ok(Arc::new(EconomyLogicInstance {
            clock: self.clock.clone(),
        }))
    }
}

/// Quest wrapper: `{"quest": Quest}`. Job rewards get recomputed from the
/// player's skills inside `add_quest`.
pub struct QuestsLogicModule;

struct QuestsLogicInstance;

impl ModuleInstance for QuestsLogicInstance {
    fn execute(&self, state: &GameState, payload: &Value) -> ModuleResult {
        let Some(player) = &state.player else {
            return ModuleResult::fail("no player in state");
        };
        let Some(quest) = payload_field::<Quest>(payload, "quest") else {
            return ModuleResult::fail("missing or malformed 'quest'");
        };

        let (_, events) = add_quest(&player.quest_log, quest, &player.skills);
        ModuleResult::ok(events)
    }
}

#[async_trait]
impl CascadeModule for QuestsLogicModule {
    fn name(&self) -> &str {
        "quests"
    }

    fn dependencies(&self) -> &[&str] {
        &["player"]
    }

    async fn load(&self) -> Result<Arc<dyn ModuleInstance>, PipelineError> {
        Ok(Arc::new(QuestsLogicInstance))
    }
}

/// Journal wrapper: `{"text": "..."}`.
pub struct HistoricalLogicModule;

struct HistoricalLogicInstance;

impl ModuleInstance for HistoricalLogicInstance {
    fn execute(&self, _state: &GameState, payload: &Value) -> ModuleResult {
        let Some(text) = payload_field::<String>(payload, "text") else {
            return ModuleResult::fail("missing or malformed 'text'");
        };
        if text.trim().is_empty() {
            return ModuleResult::fail("empty journal text");
        }
        ModuleResult::ok(vec![GameEvent::JournalEntryAdded {
            entry_id: uuid::Uuid::new_v4().to_string(),
        }])
    }
}

#[async_trait]
impl CascadeModule for HistoricalLogicModule {
    fn name(&self) -> &str {
        "historical"
    }

    async fn load(&self) -> Result<Arc<dyn ModuleInstance>, PipelineError> {
        Ok(Arc::new(HistoricalLogicInstance))
    }
}
