//! Ingredients module: what the player could cook with, right now.
//!
//! Derived from consumable-tagged inventory items plus the staple goods any
//! local market carries.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::cascade::{EnrichError, EnrichedContext, EnrichmentModule};

pub const MODULE_ID: &str = "ingredients";

/// Staples assumed purchasable wherever there is a market.
const LOCAL_MARKET_INGREDIENTS: &[&str] = &["sel", "farine", "oeufs", "lait", "oignon"];

#[derive(Default)]
pub struct IngredientsModule;

impl IngredientsModule {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EnrichmentModule for IngredientsModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    async fn enrich(&self, ctx: &EnrichedContext) -> Result<Value, EnrichError> {
        let from_inventory: Vec<String> = ctx
            .player
            .inventory
            .iter()
            .filter(|item| item.is_consumable())
            .map(|item| item.name.clone())
            .collect();

        let from_market: Vec<String> = LOCAL_MARKET_INGREDIENTS
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut available = from_inventory.clone();
        available.extend(from_market.iter().cloned());

        Ok(json!({
            "available": available,
            "from_inventory": from_inventory,
            "from_market": from_market,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{CascadeContext, ModuleRegistry, PlayerSlice, resolve};
    use std::sync::Arc;
    use wayfarer_domain::{add_item_to_inventory, ItemMaster, QualityTier};

    fn master(id: &str, item_type: &str) -> ItemMaster {
        ItemMaster {
            id: id.into(),
            name: id.into(),
            item_type: item_type.into(),
            stackable: true,
            base_value: 1.0,
            quality: QualityTier::Common,
            tags: Vec::new(),
            evolution: None,
        }
    }

    #[tokio::test]
    async fn combines_inventory_consumables_with_market_staples() {
        let (inventory, _) =
            add_item_to_inventory(&[], &master("poule", "consumable"), 1, "Rouen", None);
        let (inventory, _) =
            add_item_to_inventory(&inventory, &master("corde", "tool"), 1, "Rouen", None);

        let ctx = CascadeContext {
            player: PlayerSlice {
                inventory,
                ..PlayerSlice::default()
            },
            trigger: Value::Null,
        };

        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(IngredientsModule::new()));
        let results = resolve(MODULE_ID, &ctx, &registry).await.unwrap();
        let data = &results[MODULE_ID].data;

        assert_eq!(data["from_inventory"], json!(["poule"]));
        let available = data["available"].as_array().unwrap();
        assert!(available.contains(&json!("poule")));
        assert!(available.contains(&json!("sel")));
        assert!(!available.contains(&json!("corde")));
    }
}
