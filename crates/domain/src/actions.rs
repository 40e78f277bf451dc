//! Dispatched actions.
//!
//! Every mutation of `GameState` flows through one of these. AI-driven
//! content application dispatches `Custom` actions whose kind the reducer may
//! not recognize; those are no-ops by contract, never errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::inventory::{ContextualProperties, ItemMaster};
use crate::quest::Quest;

/// An action dispatched to the state manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum GameAction {
    GainXp {
        amount: u64,
    },
    GainSkillXp {
        /// Dotted `category.subskill` path, e.g. `"survie.cuisine"`.
        skill_path: String,
        amount: u64,
    },
    AddItem {
        master: ItemMaster,
        quantity: u32,
        #[serde(default)]
        overrides: Option<ContextualProperties>,
    },
    GrantItemXp {
        /// Master item id; every matching instance in the inventory gains XP.
        item_id: String,
        amount: u64,
    },
    ChangeMoney {
        amount: f64,
        description: String,
    },
    AddQuest {
        quest: Quest,
    },
    CompleteObjective {
        quest_id: crate::ids::QuestId,
        objective_id: String,
    },
    TravelTo {
        destination: String,
        #[serde(default)]
        narration: Option<String>,
    },
    AddJournalEntry {
        text: String,
    },
    /// Escape hatch for generated payloads. Unrecognized kinds are no-ops.
    Custom {
        kind: String,
        payload: Value,
    },
}
