//! Enrichment modules.
//!
//! Content layer: each module computes one facet of narrative context
//! (local culture, recipes, ingredients, physiology guidance, books,
//! cookability) for AI prompts and display. Modules prefer degraded
//! placeholder content over raised errors - they feed non-critical
//! narrative context.
//!
//! The `object` submodule is a second, simpler pipeline annotating game
//! objects with provenance, combat stats, and market value.

pub mod cuisine;
pub mod culture_locale;
pub mod ingredients;
pub mod livre;
pub mod nutriments;
pub mod object;
pub mod recettes;

use std::sync::Arc;

use crate::cascade::ModuleRegistry;
use crate::infrastructure::ports::{BookSourcePort, PlaceLookupPort, RecipeSourcePort};

pub use cuisine::CuisineModule;
pub use culture_locale::CultureLocaleModule;
pub use ingredients::IngredientsModule;
pub use livre::LivreModule;
pub use nutriments::NutrimentsModule;
pub use recettes::RecettesModule;

/// Wire the full content-module set into a fresh registry.
pub fn content_registry(
    place_lookup: Arc<dyn PlaceLookupPort>,
    recipe_source: Arc<dyn RecipeSourcePort>,
    book_source: Arc<dyn BookSourcePort>,
) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register(Arc::new(CultureLocaleModule::new(place_lookup)));
    registry.register(Arc::new(IngredientsModule::new()));
    registry.register(Arc::new(NutrimentsModule::new()));
    registry.register(Arc::new(RecettesModule::new(recipe_source)));
    registry.register(Arc::new(LivreModule::new(book_source)));
    registry.register(Arc::new(CuisineModule::new()));
    registry
}
