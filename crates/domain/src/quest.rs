//! Quest log: quests, independently completable objectives, and rewards.
//!
//! Job-type quest rewards are recomputed from the player's skill at grant
//! time. Generated content may suggest a payout, but it is never trusted:
//! whatever the flow produced is replaced by the skill-derived figure.

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::ids::QuestId;
use crate::player::SkillSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    #[default]
    Inactive,
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    Main,
    Side,
    Job,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestObjective {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuestRewards {
    #[serde(default)]
    pub money: f64,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub item_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    pub quest_type: QuestType,
    #[serde(default)]
    pub status: QuestStatus,
    #[serde(default)]
    pub objectives: Vec<QuestObjective>,
    #[serde(default)]
    pub rewards: QuestRewards,
}

/// Payout for a job, derived from the player's best skill level. This is the
/// only reward source for `Job` quests.
pub fn job_rewards_for_skill(skills: &SkillSet) -> QuestRewards {
    let level = u64::from(skills.best_level());
    QuestRewards {
        money: 5.0 + 2.5 * level as f64,
        xp: 20 + 10 * level,
        item_ids: Vec::new(),
    }
}

/// Add a quest to the log, activating it and recomputing job rewards from
/// skill. A duplicate quest id is a warning-level no-op.
pub fn add_quest(
    quest_log: &[Quest],
    mut quest: Quest,
    skills: &SkillSet,
) -> (Vec<Quest>, Vec<GameEvent>) {
    if quest_log.iter().any(|q| q.id == quest.id) {
        tracing::warn!(quest_id = %quest.id, "Quest already in log, ignoring");
        return (quest_log.to_vec(), Vec::new());
    }

    if quest.quest_type == QuestType::Job {
        quest.rewards = job_rewards_for_skill(skills);
    }
    quest.status = QuestStatus::Active;

    let event = GameEvent::QuestAdded {
        quest_id: quest.id,
        title: quest.title.clone(),
    };
    let mut next = quest_log.to_vec();
    next.push(quest);
    (next, vec![event])
}

/// Complete one objective. When the last objective of an active quest
/// completes, the quest completes with it.
///
/// Unknown quest or objective ids, already-completed objectives, and
/// non-active quests are warning-level no-ops.
pub fn complete_objective(
    quest_log: &[Quest],
    quest_id: QuestId,
    objective_id: &str,
) -> (Vec<Quest>, Vec<GameEvent>) {
    let mut next = quest_log.to_vec();
    let Some(quest) = next.iter_mut().find(|q| q.id == quest_id) else {
        tracing::warn!(%quest_id, "Unknown quest, ignoring objective completion");
        return (quest_log.to_vec(), Vec::new());
    };
    if quest.status != QuestStatus::Active {
        tracing::warn!(%quest_id, status = ?quest.status, "Quest is not active, ignoring");
        return (quest_log.to_vec(), Vec::new());
    }
    let Some(objective) = quest.objectives.iter_mut().find(|o| o.id == objective_id) else {
        tracing::warn!(%quest_id, objective_id, "Unknown objective, ignoring");
        return (quest_log.to_vec(), Vec::new());
    };
    if objective.completed {
        tracing::warn!(%quest_id, objective_id, "Objective already completed, ignoring");
        return (quest_log.to_vec(), Vec::new());
    }

    objective.completed = true;
    let mut events = vec![GameEvent::ObjectiveCompleted {
        quest_id,
        objective_id: objective_id.to_string(),
    }];

    if quest.objectives.iter().all(|o| o.completed) {
        quest.status = QuestStatus::Completed;
        events.push(GameEvent::QuestCompleted { quest_id });
    }

    (next, events)
}
