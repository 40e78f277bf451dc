//! Cuisine module: cookability of the local recipes against what the player
//! actually has.
//!
//! Top of the content cascade: requires `recettes` and `ingredients`,
//! optionally folds in `nutriments` guidance. Ingredient matching is fuzzy -
//! case-insensitive substring, in either direction - so "Chicken Breast"
//! satisfies "Chicken".

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::cascade::{
    EnrichError, EnrichedContext, EnrichmentLevel, EnrichmentModule, ModuleDependency,
};

use super::{ingredients, nutriments, recettes};

pub const MODULE_ID: &str = "cuisine";

/// A recipe missing at most this many ingredients is "nearly cookable".
const NEARLY_COOKABLE_MISSING_MAX: usize = 2;

/// Bidirectional case-insensitive substring match.
pub fn ingredient_matches(recipe_ingredient: &str, available: &str) -> bool {
    let recipe_ingredient = recipe_ingredient.to_lowercase();
    let available = available.to_lowercase();
    recipe_ingredient.contains(&available) || available.contains(&recipe_ingredient)
}

fn missing_ingredients(recipe_ingredients: &[String], available: &[String]) -> Vec<String> {
    recipe_ingredients
        .iter()
        .filter(|needed| !available.iter().any(|have| ingredient_matches(needed, have)))
        .cloned()
        .collect()
}

pub struct CuisineModule {
    dependencies: Vec<ModuleDependency>,
}

impl Default for CuisineModule {
    fn default() -> Self {
        Self::new()
    }
}

impl CuisineModule {
    pub fn new() -> Self {
        Self {
            dependencies: vec![
                ModuleDependency::required(recettes::MODULE_ID, EnrichmentLevel::Detailed),
                ModuleDependency::required(ingredients::MODULE_ID, EnrichmentLevel::Basic),
                ModuleDependency::optional(nutriments::MODULE_ID, EnrichmentLevel::Basic),
            ],
        }
    }
}

#[async_trait]
impl EnrichmentModule for CuisineModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    fn dependencies(&self) -> &[ModuleDependency] {
        &self.dependencies
    }

    async fn enrich(&self, ctx: &EnrichedContext) -> Result<Value, EnrichError> {
        let recipes = ctx
            .dependency_data(recettes::MODULE_ID)
            .and_then(|data| data.get("recipes"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let available: Vec<String> = ctx
            .dependency_data(ingredients::MODULE_ID)
            .and_then(|data| data.get("available"))
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut cookable = Vec::new();
        let mut nearly_cookable = Vec::new();
        let mut opportunities = Vec::new();

        for recipe in &recipes {
            let name = recipe
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("recette sans nom");
            let needed: Vec<String> = recipe
                .get("ingredients")
                .and_then(Value::as_array)
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            let missing = missing_ingredients(&needed, &available);
            if missing.is_empty() {
                cookable.push(json!({ "name": name }));
                opportunities.push(format!("Vous avez tout pour préparer {name}."));
            } else if missing.len() <= NEARLY_COOKABLE_MISSING_MAX {
                opportunities.push(format!(
                    "Il ne manque que {} pour préparer {name}.",
                    missing.join(", ")
                ));
                nearly_cookable.push(json!({ "name": name, "missing": missing }));
            }
        }

        let guidance = ctx
            .dependency_data(nutriments::MODULE_ID)
            .and_then(|data| data.get("guidance"))
            .cloned();

        Ok(json!({
            "cookable": cookable,
            "nearly_cookable": nearly_cookable,
            "opportunities": opportunities,
            "physiology_guidance": guidance,
        }))
    }
}
