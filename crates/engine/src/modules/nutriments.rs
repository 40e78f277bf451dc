//! Physiology guidance module: tiered hunger/thirst advice for prompts.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::cascade::{EnrichError, EnrichedContext, EnrichmentModule};

pub const MODULE_ID: &str = "nutriments";

// Hunger bands (0 = starving, 100 = sated) and the thirst threshold.
const HUNGER_URGENT: f64 = 30.0;
const HUNGER_PECKISH: f64 = 70.0;
const THIRST_LOW: f64 = 40.0;

#[derive(Default)]
pub struct NutrimentsModule;

impl NutrimentsModule {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EnrichmentModule for NutrimentsModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    async fn enrich(&self, ctx: &EnrichedContext) -> Result<Value, EnrichError> {
        let physiology = &ctx.player.physiology;
        let mut guidance = Vec::new();

        if physiology.hunger <= HUNGER_URGENT {
            guidance.push("La faim devient pressante, un vrai repas s'impose.".to_string());
        } else if physiology.hunger <= HUNGER_PECKISH {
            guidance.push("Un encas serait bienvenu avant de reprendre la route.".to_string());
        } else {
            guidance.push("L'appétit est satisfait pour l'instant.".to_string());
        }

        if physiology.thirst <= THIRST_LOW {
            guidance.push("Il faut boire, la gorge est sèche.".to_string());
        }

        Ok(json!({
            "hunger": physiology.hunger,
            "thirst": physiology.thirst,
            "guidance": guidance,
        }))
    }
}
