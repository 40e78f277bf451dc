//! Player aggregate and progression logic.
//!
//! Progression functions are pure: they take the current slice, return the
//! new slice plus the events the change produced. Multi-level XP grants
//! cascade through as many level-ups as the amount covers in a single call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::economy::Transaction;
use crate::events::GameEvent;
use crate::inventory::IntelligentItem;
use crate::quest::Quest;

/// Where the player currently is. `name` is the display/lookup name used by
/// enrichment modules; coordinates are optional because generated locations
/// may not carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlayerLocation {
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl PlayerLocation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: None,
            longitude: None,
        }
    }
}

/// Hunger and thirst, both 0 (empty) to 100 (sated).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physiology {
    pub hunger: f64,
    pub thirst: f64,
}

impl Default for Physiology {
    fn default() -> Self {
        Self {
            hunger: 100.0,
            thirst: 100.0,
        }
    }
}

/// One trainable subskill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
}

impl Default for Skill {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: skill_xp_to_next_level(1),
        }
    }
}

/// Skills grouped by category, addressed by a dotted `category.subskill`
/// path. BTreeMap keeps serialization order stable across snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SkillSet {
    pub categories: BTreeMap<String, BTreeMap<String, Skill>>,
}

impl SkillSet {
    pub fn get(&self, category: &str, subskill: &str) -> Option<&Skill> {
        self.categories.get(category)?.get(subskill)
    }

    /// Highest level across every subskill, used when job rewards are
    /// recomputed from player competence at grant time.
    pub fn best_level(&self) -> u32 {
        self.categories
            .values()
            .flat_map(|subs| subs.values())
            .map(|s| s.level)
            .max()
            .unwrap_or(1)
    }
}

/// Character level, XP, and perks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    #[serde(default)]
    pub perks: Vec<String>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: xp_to_next_level(1),
            perks: Vec::new(),
        }
    }
}

/// The player aggregate.
///
/// Simple data struct: all fields public, no invalid state constructible.
/// Mutation happens through the pure transition functions in this crate,
/// driven by the engine's reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub location: PlayerLocation,
    /// Free-form named attributes (force, agilité, ...), set by character
    /// creation and scenario content.
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
    #[serde(default)]
    pub progression: Progression,
    #[serde(default)]
    pub skills: SkillSet,
    #[serde(default)]
    pub physiology: Physiology,
    #[serde(default)]
    pub money: f64,
    #[serde(default)]
    pub inventory: Vec<IntelligentItem>,
    #[serde(default)]
    pub transaction_log: Vec<Transaction>,
    #[serde(default)]
    pub quest_log: Vec<Quest>,
}

impl Player {
    pub fn new(name: impl Into<String>, location: PlayerLocation) -> Self {
        Self {
            name: name.into(),
            location,
            stats: BTreeMap::new(),
            progression: Progression::default(),
            skills: SkillSet::default(),
            physiology: Physiology::default(),
            money: 0.0,
            inventory: Vec::new(),
            transaction_log: Vec::new(),
            quest_log: Vec::new(),
        }
    }
}

/// XP required to go from `level` to `level + 1`.
pub fn xp_to_next_level(level: u32) -> u64 {
    let level = u64::from(level);
    level * 100 + 50 * (level - 1) * level
}

/// XP required to advance a subskill past `level`. Steeper than the player
/// curve at high levels, cheaper at low ones.
pub fn skill_xp_to_next_level(level: u32) -> u64 {
    let sq = u64::from(level) * u64::from(level);
    (sq * 3) / 2 + 20
}

/// Grant player XP, cascading through as many level-ups as the total covers.
///
/// Emits one `XpGained` for the grant and one `PlayerLeveledUp` per level
/// crossed. Re-invoking with zero XP never triggers further level-ups.
pub fn add_player_xp(progression: &Progression, xp_gained: u64) -> (Progression, Vec<GameEvent>) {
    let mut next = progression.clone();
    let mut events = vec![GameEvent::XpGained { amount: xp_gained }];

    next.xp += xp_gained;
    while next.xp >= next.xp_to_next_level {
        next.xp -= next.xp_to_next_level;
        next.level += 1;
        next.xp_to_next_level = xp_to_next_level(next.level);
        events.push(GameEvent::PlayerLeveledUp {
            new_level: next.level,
        });
    }

    (next, events)
}

/// Grant XP to one subskill addressed by a dotted `category.subskill` path.
///
/// An invalid path or unknown skill is a warning-level no-op: these calls
/// originate from generated content and must not take down the session.
pub fn apply_skill_xp(skills: &SkillSet, skill_path: &str, xp_gained: u64) -> (SkillSet, Vec<GameEvent>) {
    let Some((category, subskill)) = skill_path.split_once('.') else {
        tracing::warn!(skill_path, "Invalid skill path, expected category.subskill");
        return (skills.clone(), Vec::new());
    };

    let mut next = skills.clone();
    let Some(skill) = next
        .categories
        .get_mut(category)
        .and_then(|subs| subs.get_mut(subskill))
    else {
        tracing::warn!(skill_path, "Unknown skill, ignoring XP grant");
        return (skills.clone(), Vec::new());
    };

    let mut events = Vec::new();
    skill.xp += xp_gained;
    while skill.xp >= skill.xp_to_next_level {
        skill.xp -= skill.xp_to_next_level;
        skill.level += 1;
        skill.xp_to_next_level = skill_xp_to_next_level(skill.level);
        events.push(GameEvent::SkillLeveledUp {
            skill_path: skill_path.to_string(),
            new_level: skill.level,
        });
    }

    (next, events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xp_curve_is_monotonic() {
        assert_eq!(xp_to_next_level(1), 100);
        assert_eq!(xp_to_next_level(2), 300);
        for level in 1..50 {
            assert!(xp_to_next_level(level) < xp_to_next_level(level + 1));
        }
    }

    #[test]
    fn skill_curve_matches_formula() {
        // floor(level^2 * 1.5) + 20
        assert_eq!(skill_xp_to_next_level(1), 21);
        assert_eq!(skill_xp_to_next_level(2), 26);
        assert_eq!(skill_xp_to_next_level(3), 33);
        assert_eq!(skill_xp_to_next_level(10), 170);
    }

    #[test]
    fn single_level_up() {
        let (next, events) = add_player_xp(&Progression::default(), 120);
        assert_eq!(next.level, 2);
        assert_eq!(next.xp, 20);
        assert_eq!(next.xp_to_next_level, 300);
        assert_eq!(
            events,
            vec![
                GameEvent::XpGained { amount: 120 },
                GameEvent::PlayerLeveledUp { new_level: 2 },
            ]
        );
    }

    #[test]
    fn multi_level_grant_cascades() {
        // 450 covers level 1 -> 2 (100) and 2 -> 3 (300), leaving 50.
        let (next, events) = add_player_xp(&Progression::default(), 450);
        assert_eq!(next.level, 3);
        assert_eq!(next.xp, 450 - 100 - 300);
        let level_ups = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerLeveledUp { .. }))
            .count();
        assert_eq!(level_ups, 2);
        assert_eq!(events[0], GameEvent::XpGained { amount: 450 });
    }

    #[test]
    fn zero_xp_regrant_is_idempotent() {
        let (leveled, _) = add_player_xp(&Progression::default(), 450);
        let (again, events) = add_player_xp(&leveled, 0);
        assert_eq!(again, leveled);
        assert_eq!(events, vec![GameEvent::XpGained { amount: 0 }]);
    }

    fn skills_with(category: &str, subskill: &str) -> SkillSet {
        let mut set = SkillSet::default();
        set.categories
            .entry(category.to_string())
            .or_default()
            .insert(subskill.to_string(), Skill::default());
        set
    }

    #[test]
    fn skill_xp_levels_up_through_path() {
        let skills = skills_with("survie", "cuisine");
        // 21 + 26 = 47 crosses two levels, 3 left over.
        let (next, events) = apply_skill_xp(&skills, "survie.cuisine", 50);
        let skill = next.get("survie", "cuisine").unwrap();
        assert_eq!(skill.level, 3);
        assert_eq!(skill.xp, 3);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn unknown_skill_is_a_noop() {
        let skills = skills_with("survie", "cuisine");
        let (next, events) = apply_skill_xp(&skills, "combat.epee", 50);
        assert_eq!(next, skills);
        assert!(events.is_empty());
    }

    #[test]
    fn malformed_path_is_a_noop() {
        let skills = skills_with("survie", "cuisine");
        let (next, events) = apply_skill_xp(&skills, "cuisine", 50);
        assert_eq!(next, skills);
        assert!(events.is_empty());
    }
}
