//! Recipes module: local cuisine inference plus a bounded recipe fetch.
//!
//! The location-to-cuisine mapping is a curated substring table with a
//! default, a legitimately simple business rule kept explicit and testable.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::cascade::{
    EnrichError, EnrichedContext, EnrichmentLevel, EnrichmentModule, ModuleDependency,
};
use crate::infrastructure::ports::RecipeSourcePort;

use super::culture_locale;

pub const MODULE_ID: &str = "recettes";
pub const DEFAULT_CUISINE: &str = "française";
const MAX_RECIPES: usize = 5;

const LOCATION_CUISINES: &[(&str, &str)] = &[
    ("paris", "française"),
    ("lyon", "française"),
    ("rouen", "française"),
    ("rome", "italienne"),
    ("venise", "italienne"),
    ("florence", "italienne"),
    ("madrid", "espagnole"),
    ("séville", "espagnole"),
    ("londres", "anglaise"),
    ("tanger", "marocaine"),
    ("marrakech", "marocaine"),
];

/// Map a location name to its cuisine by substring match, falling back to
/// the default cuisine.
pub fn cuisine_for_location(location_name: &str) -> &'static str {
    let location = location_name.to_lowercase();
    LOCATION_CUISINES
        .iter()
        .find(|(name, _)| location.contains(name))
        .map(|(_, cuisine)| *cuisine)
        .unwrap_or(DEFAULT_CUISINE)
}

pub struct RecettesModule {
    source: Arc<dyn RecipeSourcePort>,
    dependencies: Vec<ModuleDependency>,
}

impl RecettesModule {
    pub fn new(source: Arc<dyn RecipeSourcePort>) -> Self {
        Self {
            source,
            dependencies: vec![ModuleDependency::optional(
                culture_locale::MODULE_ID,
                EnrichmentLevel::Basic,
            )],
        }
    }
}

#[async_trait]
impl EnrichmentModule for RecettesModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    fn dependencies(&self) -> &[ModuleDependency] {
        &self.dependencies
    }

    async fn enrich(&self, ctx: &EnrichedContext) -> Result<Value, EnrichError> {
        let cuisine = cuisine_for_location(&ctx.player.location_name);
        let culture_summary = ctx
            .dependency_data(culture_locale::MODULE_ID)
            .and_then(|data| data.get("summary"))
            .cloned();

        let recipes = match self.source.fetch_recipes(cuisine, MAX_RECIPES).await {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!(cuisine, error = %e, "Recipe fetch failed, continuing empty");
                Vec::new()
            }
        };

        Ok(json!({
            "cuisine": cuisine,
            "culture_note": culture_summary,
            "recipes": recipes
                .iter()
                .map(|r| json!({ "name": r.name, "ingredients": r.ingredients }))
                .collect::<Vec<_>>(),
        }))
    }
}
