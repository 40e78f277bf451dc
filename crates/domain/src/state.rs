//! The root `GameState` aggregate and its persistence snapshot.
//!
//! `GameState` is owned exclusively by the engine's state manager once a
//! session begins; everything else sees clones. The snapshot is a plain JSON
//! projection; rehydration fills missing fields with defaults so snapshots
//! written by older builds keep loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::player::Player;

/// One narrated moment recorded in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Narrative tone knobs passed through to AI flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneSettings {
    pub style: String,
    pub verbosity: String,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            style: "realiste".into(),
            verbosity: "normal".into(),
        }
    }
}

/// Root aggregate for one play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameState {
    pub player: Option<Player>,
    #[serde(default)]
    pub current_scenario: Option<String>,
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
    /// In-game minutes elapsed since the session started.
    #[serde(default)]
    pub game_time_minutes: u64,
    #[serde(default)]
    pub tone_settings: ToneSettings,
}

/// JSON-serializable projection of `GameState`.
///
/// Every field defaults so that snapshots missing newer fields rehydrate
/// without failing. The schema version is informational; decoding never
/// branches on it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameStateSnapshot {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub player: Option<Player>,
    #[serde(default)]
    pub current_scenario: Option<String>,
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
    #[serde(default)]
    pub game_time_minutes: u64,
    #[serde(default)]
    pub tone_settings: ToneSettings,
}

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

impl GameState {
    pub fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            player: self.player.clone(),
            current_scenario: self.current_scenario.clone(),
            journal: self.journal.clone(),
            game_time_minutes: self.game_time_minutes,
            tone_settings: self.tone_settings.clone(),
        }
    }

    pub fn from_snapshot(snapshot: GameStateSnapshot) -> Self {
        Self {
            player: snapshot.player,
            current_scenario: snapshot.current_scenario,
            journal: snapshot.journal,
            game_time_minutes: snapshot.game_time_minutes,
            tone_settings: snapshot.tone_settings,
        }
    }
}

impl GameStateSnapshot {
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::snapshot(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| DomainError::snapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::handle_money_change;
    use crate::player::PlayerLocation;

    fn populated_state() -> GameState {
        let player = Player::new("Isabeau", PlayerLocation::named("Rouen"));
        let (player, _) = handle_money_change(&player, 25.0, "Salaire", Utc::now());
        GameState {
            player: Some(player),
            current_scenario: Some("La route de Paris".into()),
            journal: vec![JournalEntry {
                id: "j1".into(),
                text: "Départ à l'aube.".into(),
                timestamp: Utc::now(),
            }],
            game_time_minutes: 480,
            tone_settings: ToneSettings::default(),
        }
    }

    #[test]
    fn snapshot_round_trips_exactly() {
        let state = populated_state();
        let json = state.snapshot().to_json().unwrap();
        let back = GameState::from_snapshot(GameStateSnapshot::from_json(&json).unwrap());
        assert_eq!(back, state);
    }

    #[test]
    fn old_snapshot_missing_fields_rehydrates_with_defaults() {
        // A minimal snapshot from an old build: only a player name survives.
        let json = r#"{"player":{"name":"Isabeau"}}"#;
        let back = GameState::from_snapshot(GameStateSnapshot::from_json(json).unwrap());
        let player = back.player.unwrap();
        assert_eq!(player.name, "Isabeau");
        assert_eq!(player.progression.level, 1);
        assert_eq!(player.progression.xp_to_next_level, 100);
        assert!(player.inventory.is_empty());
        assert_eq!(back.game_time_minutes, 0);
        assert_eq!(back.tone_settings, ToneSettings::default());
    }

    #[test]
    fn empty_snapshot_rehydrates_to_default_state() {
        let back = GameState::from_snapshot(GameStateSnapshot::from_json("{}").unwrap());
        assert_eq!(back, GameState::default());
    }
}
