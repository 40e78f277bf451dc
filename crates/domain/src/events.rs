//! Domain events.
//!
//! Coarse-grained events representing significant state changes. Transition
//! functions return these alongside the new state; the engine's state manager
//! forwards them to subscribers after a dispatch commits.

use serde::{Deserialize, Serialize};

use crate::ids::{ItemInstanceId, QuestId, TransactionId};

/// Domain event for significant state changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameEvent {
    // Progression
    XpGained {
        amount: u64,
    },
    PlayerLeveledUp {
        new_level: u32,
    },
    SkillLeveledUp {
        skill_path: String,
        new_level: u32,
    },

    // Inventory
    ItemAdded {
        item_id: String,
        instance_id: ItemInstanceId,
        quantity: u32,
    },
    ItemLeveledUp {
        instance_id: ItemInstanceId,
        new_level: u32,
    },
    ItemEvolved {
        instance_id: ItemInstanceId,
        from_item_id: String,
        to_item_id: String,
    },

    // Economy
    MoneyChanged {
        transaction_id: TransactionId,
        amount: f64,
        new_balance: f64,
    },

    // Quests
    QuestAdded {
        quest_id: QuestId,
        title: String,
    },
    ObjectiveCompleted {
        quest_id: QuestId,
        objective_id: String,
    },
    QuestCompleted {
        quest_id: QuestId,
    },

    // World
    TravelCompleted {
        destination: String,
    },
    JournalEntryAdded {
        entry_id: String,
    },
}
