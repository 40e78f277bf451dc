//! Wayfarer domain layer.
//!
//! Pure game-state types and transition logic: player progression, inventory,
//! economy, quests, and the serializable `GameState` aggregate. Everything in
//! this crate is synchronous and side-effect free; the engine crate owns
//! orchestration, enrichment, and I/O.

pub mod actions;
pub mod economy;
pub mod error;
pub mod events;
pub mod ids;
pub mod inventory;
pub mod player;
pub mod quality;
pub mod quest;
pub mod state;

pub use actions::GameAction;
pub use economy::{
    handle_money_change, infer_transaction_category, Transaction, TransactionCategory,
    TransactionType,
};
pub use error::DomainError;
pub use events::GameEvent;
pub use ids::{ItemInstanceId, QuestId, TransactionId};
pub use inventory::{
    add_item_to_inventory, grant_xp_to_item, update_item_contextual_properties,
    ContextualProperties, IntelligentItem, ItemEvolution, ItemMaster,
};
pub use player::{
    add_player_xp, apply_skill_xp, xp_to_next_level, Physiology, Player, PlayerLocation,
    Progression, Skill, SkillSet,
};
pub use quality::QualityTier;
pub use quest::{
    add_quest, complete_objective, Quest, QuestObjective, QuestRewards, QuestStatus, QuestType,
};
pub use state::{GameState, GameStateSnapshot, JournalEntry, ToneSettings};
