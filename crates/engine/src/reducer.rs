//! The total reducer over dispatched actions.
//!
//! Every recognized action maps to a defined transition; unrecognized
//! `Custom` kinds return the state unchanged. The reducer never throws:
//! malformed payloads (unknown item ids, missing player) are warning-level
//! no-ops, because actions arrive from best-effort AI-driven content
//! application as well as from the UI.

use chrono::{DateTime, Utc};
use serde_json::Value;

use wayfarer_domain::{
    add_item_to_inventory, add_player_xp, add_quest, apply_skill_xp, complete_objective,
    grant_xp_to_item, handle_money_change, update_item_contextual_properties, GameAction,
    GameEvent, GameState, JournalEntry,
};

/// Compute the next state and the events the transition produced.
pub fn reduce(state: &GameState, action: &GameAction, now: DateTime<Utc>) -> (GameState, Vec<GameEvent>) {
    match action {
        GameAction::GainXp { amount } => with_player(state, "GainXp", |state, player| {
            let (progression, events) = add_player_xp(&player.progression, *amount);
            player.progression = progression;
            (state, events)
        }),

        GameAction::GainSkillXp { skill_path, amount } => {
            with_player(state, "GainSkillXp", |state, player| {
                let (skills, events) = apply_skill_xp(&player.skills, skill_path, *amount);
                player.skills = skills;
                (state, events)
            })
        }

        GameAction::AddItem {
            master,
            quantity,
            overrides,
        } => with_player(state, "AddItem", |state, player| {
            let (inventory, events) = add_item_to_inventory(
                &player.inventory,
                master,
                *quantity,
                &player.location.name,
                overrides.as_ref(),
            );
            player.inventory = inventory;
            (state, events)
        }),

        GameAction::GrantItemXp { item_id, amount } => {
            with_player(state, "GrantItemXp", |state, player| {
                let mut events = Vec::new();
                let mut touched = false;
                player.inventory = player
                    .inventory
                    .iter()
                    .map(|item| {
                        if item.id != *item_id {
                            return item.clone();
                        }
                        touched = true;
                        let (next, mut item_events) = grant_xp_to_item(item, *amount);
                        events.append(&mut item_events);
                        next
                    })
                    .collect();
                if !touched {
                    tracing::warn!(item_id = %item_id, "No inventory instance of item, ignoring XP grant");
                }
                (state, events)
            })
        }

        GameAction::ChangeMoney { amount, description } => {
            with_player(state, "ChangeMoney", |mut state, player| {
                let (next_player, events) = handle_money_change(player, *amount, description, now);
                state.player = Some(next_player);
                (state, events)
            })
        }

        GameAction::AddQuest { quest } => with_player(state, "AddQuest", |state, player| {
            let (quest_log, events) = add_quest(&player.quest_log, quest.clone(), &player.skills);
            player.quest_log = quest_log;
            (state, events)
        }),

        GameAction::CompleteObjective {
            quest_id,
            objective_id,
        } => with_player(state, "CompleteObjective", |state, player| {
            let (quest_log, events) = complete_objective(&player.quest_log, *quest_id, objective_id);
            player.quest_log = quest_log;
            (state, events)
        }),

        GameAction::TravelTo {
            destination,
            narration,
        } => with_player(state, "TravelTo", |mut state, player| {
            player.location.name = destination.clone();
            // Arriving in a new market re-derives every location-sensitive
            // property in the inventory.
            for item in &mut player.inventory {
                item.contextual_properties = update_item_contextual_properties(item, destination);
            }
            let mut events = vec![GameEvent::TravelCompleted {
                destination: destination.clone(),
            }];
            if let Some(text) = narration {
                let (journal, mut journal_events) = append_journal(&state.journal, text, now);
                state.journal = journal;
                events.append(&mut journal_events);
            }
            (state, events)
        }),

        GameAction::AddJournalEntry { text } => {
            let mut next = state.clone();
            let (journal, events) = append_journal(&state.journal, text, now);
            next.journal = journal;
            (next, events)
        }

        GameAction::Custom { kind, payload } => {
            noop_custom(state, kind, payload)
        }
    }
}

fn append_journal(
    journal: &[JournalEntry],
    text: &str,
    now: DateTime<Utc>,
) -> (Vec<JournalEntry>, Vec<GameEvent>) {
    let entry = JournalEntry {
        id: uuid::Uuid::new_v4().to_string(),
        text: text.to_string(),
        timestamp: now,
    };
    let event = GameEvent::JournalEntryAdded {
        entry_id: entry.id.clone(),
    };
    let mut next = journal.to_vec();
    next.push(entry);
    (next, vec![event])
}

fn noop_custom(state: &GameState, kind: &str, _payload: &Value) -> (GameState, Vec<GameEvent>) {
    tracing::debug!(kind, "Unrecognized custom action, no-op");
    (state.clone(), Vec::new())
}

/// Run a transition that needs a player, or warn and no-op without one.
///
/// The closure receives the cloned state and a mutable borrow of its player;
/// most transitions only touch the player slice.
fn with_player(
    state: &GameState,
    action_name: &str,
    f: impl FnOnce(GameState, &mut wayfarer_domain::Player) -> (GameState, Vec<GameEvent>),
) -> (GameState, Vec<GameEvent>) {
    let mut next = state.clone();
    let Some(mut player) = next.player.take() else {
        tracing::warn!(action = action_name, "No player in state, action ignored");
        return (state.clone(), Vec::new());
    };
    let (mut result, events) = f(next, &mut player);
    // ChangeMoney replaces the player wholesale; only restore ours if the
    // transition did not.
    if result.player.is_none() {
        result.player = Some(player);
    }
    (result, events)
}
