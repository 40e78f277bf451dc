//! Inventory: item instances, stacking, item XP and evolution.
//!
//! Two identities are in play. The master `id` names a catalog entry shared
//! by every copy of an item; `instance_id` is unique per copy, minted even
//! when a stackable item is added singly. Stackable items collapse onto one
//! line per master id; everything else is an independent instance.

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::ids::ItemInstanceId;
use crate::quality::QualityTier;

/// Catalog definition of an item, shared by all copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMaster {
    pub id: String,
    pub name: String,
    /// e.g. "weapon", "consumable", "tool", "book"
    pub item_type: String,
    pub stackable: bool,
    #[serde(default)]
    pub base_value: f64,
    #[serde(default)]
    pub quality: QualityTier,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub evolution: Option<ItemEvolution>,
}

/// Evolution threshold: reaching `level_required` transforms the instance
/// into the target master item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEvolution {
    pub level_required: u32,
    pub target_item_id: Option<String>,
}

/// Location-sensitive properties, re-derived whenever an instance is minted
/// or the player moves it into a new market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualProperties {
    /// Local price multiplier against the master's base value.
    pub local_price_multiplier: f64,
    /// Whether openly carrying the item is lawful here.
    pub is_legal: bool,
    /// Whether carrying it draws attention from locals or guards.
    pub arouses_suspicion: bool,
}

impl Default for ContextualProperties {
    fn default() -> Self {
        Self {
            local_price_multiplier: 1.0,
            is_legal: true,
            arouses_suspicion: false,
        }
    }
}

/// One inventory line: a stack of a stackable master, or a single instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligentItem {
    pub id: String,
    pub instance_id: ItemInstanceId,
    pub name: String,
    pub item_type: String,
    pub stackable: bool,
    pub quantity: u32,
    /// 0.0 (broken) to 1.0 (pristine).
    pub condition: f64,
    pub item_xp: u64,
    pub item_level: u32,
    #[serde(default)]
    pub quality: QualityTier,
    #[serde(default)]
    pub base_value: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub evolution: Option<ItemEvolution>,
    #[serde(default)]
    pub contextual_properties: ContextualProperties,
}

impl IntelligentItem {
    fn from_master(master: &ItemMaster, quantity: u32) -> Self {
        Self {
            id: master.id.clone(),
            instance_id: ItemInstanceId::new(),
            name: master.name.clone(),
            item_type: master.item_type.clone(),
            stackable: master.stackable,
            quantity,
            condition: 1.0,
            item_xp: 0,
            item_level: 1,
            quality: master.quality,
            base_value: master.base_value,
            tags: master.tags.clone(),
            evolution: master.evolution.clone(),
            contextual_properties: ContextualProperties::default(),
        }
    }

    pub fn is_consumable(&self) -> bool {
        self.item_type == "consumable" || self.tags.iter().any(|t| t == "consumable")
    }
}

/// Item XP required to go from `level` to `level + 1`.
pub fn item_xp_to_next_level(level: u32) -> u64 {
    u64::from(level) * 100
}

// Markets where everything is dearer, and markets that frown on open steel.
const EXPENSIVE_MARKETS: &[(&str, f64)] = &[
    ("paris", 1.6),
    ("lyon", 1.3),
    ("venise", 1.5),
    ("londres", 1.4),
];
const WEAPON_WARY_PLACES: &[&str] = &["paris", "temple", "abbaye", "cathédrale", "palais"];

/// Re-derive the location-sensitive properties of an instance.
///
/// Substring matching against small curated tables, per the business rules:
/// explicit and testable, no cleverness.
pub fn update_item_contextual_properties(
    item: &IntelligentItem,
    location_name: &str,
) -> ContextualProperties {
    let location = location_name.to_lowercase();

    let local_price_multiplier = EXPENSIVE_MARKETS
        .iter()
        .find(|(name, _)| location.contains(name))
        .map(|(_, factor)| *factor)
        .unwrap_or(1.0);

    let is_weapon = item.item_type == "weapon";
    let weapon_wary = WEAPON_WARY_PLACES.iter().any(|place| location.contains(place));

    ContextualProperties {
        local_price_multiplier,
        is_legal: !(is_weapon && weapon_wary),
        arouses_suspicion: is_weapon && weapon_wary,
    }
}

/// Add items to an inventory.
///
/// Stackable masters with no overrides collapse onto an existing stack (or
/// one new stack line). Non-stackable masters, or any call carrying
/// overrides, mint `quantity` independent instances, each with a fresh
/// `instance_id` and re-derived contextual properties.
pub fn add_item_to_inventory(
    inventory: &[IntelligentItem],
    master: &ItemMaster,
    quantity: u32,
    location_name: &str,
    overrides: Option<&ContextualProperties>,
) -> (Vec<IntelligentItem>, Vec<GameEvent>) {
    if quantity == 0 {
        tracing::warn!(item_id = %master.id, "Ignoring zero-quantity item add");
        return (inventory.to_vec(), Vec::new());
    }

    let mut next = inventory.to_vec();
    let mut events = Vec::new();

    if master.stackable && overrides.is_none() {
        if let Some(stack) = next.iter_mut().find(|i| i.id == master.id && i.stackable) {
            stack.quantity += quantity;
            events.push(GameEvent::ItemAdded {
                item_id: master.id.clone(),
                instance_id: stack.instance_id,
                quantity,
            });
            return (next, events);
        }
        let mut stack = IntelligentItem::from_master(master, quantity);
        stack.contextual_properties = update_item_contextual_properties(&stack, location_name);
        events.push(GameEvent::ItemAdded {
            item_id: master.id.clone(),
            instance_id: stack.instance_id,
            quantity,
        });
        next.push(stack);
        return (next, events);
    }

    for _ in 0..quantity {
        let mut instance = IntelligentItem::from_master(master, 1);
        instance.contextual_properties = match overrides {
            Some(props) => props.clone(),
            None => update_item_contextual_properties(&instance, location_name),
        };
        events.push(GameEvent::ItemAdded {
            item_id: master.id.clone(),
            instance_id: instance.instance_id,
            quantity: 1,
        });
        next.push(instance);
    }

    (next, events)
}

/// Grant XP to an item instance, cascading level-ups.
///
/// Crossing an evolution threshold with a defined target emits `ItemEvolved`
/// and halts further level-up processing in this call: evolution supersedes
/// leveling.
pub fn grant_xp_to_item(item: &IntelligentItem, xp_gained: u64) -> (IntelligentItem, Vec<GameEvent>) {
    let mut next = item.clone();
    let mut events = Vec::new();

    next.item_xp += xp_gained;
    while next.item_xp >= item_xp_to_next_level(next.item_level) {
        next.item_xp -= item_xp_to_next_level(next.item_level);
        next.item_level += 1;
        events.push(GameEvent::ItemLeveledUp {
            instance_id: next.instance_id,
            new_level: next.item_level,
        });

        let evolved = next.evolution.as_ref().and_then(|evo| {
            (next.item_level >= evo.level_required)
                .then(|| evo.target_item_id.clone())
                .flatten()
        });
        if let Some(target_id) = evolved {
            events.push(GameEvent::ItemEvolved {
                instance_id: next.instance_id,
                from_item_id: next.id.clone(),
                to_item_id: target_id.clone(),
            });
            next.id = target_id;
            break;
        }
    }

    (next, events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bread() -> ItemMaster {
        ItemMaster {
            id: "pain".into(),
            name: "Pain".into(),
            item_type: "consumable".into(),
            stackable: true,
            base_value: 0.5,
            quality: QualityTier::Common,
            tags: vec!["consumable".into()],
            evolution: None,
        }
    }

    fn sword() -> ItemMaster {
        ItemMaster {
            id: "epee_fer".into(),
            name: "Épée de fer".into(),
            item_type: "weapon".into(),
            stackable: false,
            base_value: 40.0,
            quality: QualityTier::Fine,
            tags: Vec::new(),
            evolution: Some(ItemEvolution {
                level_required: 3,
                target_item_id: Some("epee_acier".into()),
            }),
        }
    }

    #[test]
    fn stackable_add_collapses_onto_existing_stack() {
        let (inv, _) = add_item_to_inventory(&[], &bread(), 2, "Lyon", None);
        assert_eq!(inv.len(), 1);
        let (inv, events) = add_item_to_inventory(&inv, &bread(), 3, "Lyon", None);
        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].quantity, 5);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn non_stackable_adds_mint_distinct_instances() {
        let (inv, events) = add_item_to_inventory(&[], &sword(), 3, "Rouen", None);
        assert_eq!(inv.len(), 3);
        assert_eq!(events.len(), 3);
        let ids: std::collections::HashSet<_> = inv.iter().map(|i| i.instance_id).collect();
        assert_eq!(ids.len(), 3);
        assert!(inv.iter().all(|i| i.quantity == 1));
    }

    #[test]
    fn overrides_force_instance_minting_even_for_stackables() {
        let overrides = ContextualProperties {
            local_price_multiplier: 3.0,
            is_legal: false,
            arouses_suspicion: true,
        };
        let (inv, _) = add_item_to_inventory(&[], &bread(), 2, "Lyon", Some(&overrides));
        assert_eq!(inv.len(), 2);
        assert!(inv.iter().all(|i| i.contextual_properties == overrides));
    }

    #[test]
    fn zero_quantity_is_a_noop() {
        let (inv, events) = add_item_to_inventory(&[], &bread(), 0, "Lyon", None);
        assert!(inv.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn contextual_properties_follow_location() {
        let (inv, _) = add_item_to_inventory(&[], &sword(), 1, "Paris", None);
        let props = &inv[0].contextual_properties;
        assert_eq!(props.local_price_multiplier, 1.6);
        assert!(!props.is_legal);
        assert!(props.arouses_suspicion);

        let (inv, _) = add_item_to_inventory(&[], &sword(), 1, "Campagne normande", None);
        assert!(inv[0].contextual_properties.is_legal);
    }

    #[test]
    fn item_levels_up_through_multiple_levels() {
        let mut master = sword();
        master.evolution = None;
        let (inv, _) = add_item_to_inventory(&[], &master, 1, "Rouen", None);
        // 100 + 200 = 300 crosses two levels, 50 left.
        let (item, events) = grant_xp_to_item(&inv[0], 350);
        assert_eq!(item.item_level, 3);
        assert_eq!(item.item_xp, 50);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn evolution_supersedes_further_leveling() {
        let (inv, _) = add_item_to_inventory(&[], &sword(), 1, "Rouen", None);
        // Enough XP for many levels, but evolution at 3 halts the loop.
        let (item, events) = grant_xp_to_item(&inv[0], 10_000);
        assert_eq!(item.id, "epee_acier");
        assert_eq!(item.item_level, 3);
        assert!(events.contains(&GameEvent::ItemEvolved {
            instance_id: item.instance_id,
            from_item_id: "epee_fer".into(),
            to_item_id: "epee_acier".into(),
        }));
    }
}
