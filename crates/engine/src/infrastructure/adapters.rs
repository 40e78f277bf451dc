//! Built-in adapters.
//!
//! The static content sources carry a small curated catalog so the engine
//! produces real enrichment output with no network collaborators configured.
//! `NullAiFlow` is the documented degraded mode for missing AI credentials.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use wayfarer_domain::GameStateSnapshot;

use super::ports::{
    AiFlowPort, BookRef, BookSourcePort, ClockPort, LookupError, PersistenceError,
    PersistencePort, PlaceLookupPort, PlaceSummary, Recipe, RecipeSourcePort,
};

// =============================================================================
// Clock
// =============================================================================

pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant, for deterministic tests.
pub struct FixedClock(pub DateTime<Utc>);

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// =============================================================================
// AI flows
// =============================================================================

/// The no-credential AI adapter: every flow invocation yields `None`.
pub struct NullAiFlow;

#[async_trait]
impl AiFlowPort for NullAiFlow {
    async fn invoke(&self, flow_name: &str, _input: Value) -> Option<Value> {
        tracing::debug!(flow_name, "AI flow invoked without credentials, returning empty output");
        None
    }
}

// =============================================================================
// Persistence
// =============================================================================

/// Keyed snapshot store backed by a map of JSON strings.
///
/// Serializing through JSON keeps this adapter honest about the persistence
/// contract: whatever round-trips here round-trips through any JSON store.
#[derive(Default)]
pub struct InMemoryPersistence {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl PersistencePort for InMemoryPersistence {
    async fn load(&self, key: &str) -> Result<Option<GameStateSnapshot>, PersistenceError> {
        let entries = self.lock();
        let Some(json) = entries.get(key) else {
            return Ok(None);
        };
        GameStateSnapshot::from_json(json)
            .map(Some)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))
    }

    async fn save(
        &self,
        key: &str,
        snapshot: &GameStateSnapshot,
    ) -> Result<bool, PersistenceError> {
        let json = snapshot
            .to_json()
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        self.lock().insert(key.to_string(), json);
        Ok(true)
    }
}

// =============================================================================
// Static content sources
// =============================================================================

/// Offline gazetteer with a handful of seeded places.
pub struct StaticPlaceLookup {
    places: Vec<PlaceSummary>,
}

impl Default for StaticPlaceLookup {
    fn default() -> Self {
        Self {
            places: vec![
                PlaceSummary {
                    title: "Rouen".into(),
                    summary: "Ville normande aux cent clochers, grand port fluvial sur la Seine."
                        .into(),
                },
                PlaceSummary {
                    title: "Paris".into(),
                    summary: "Capitale du royaume, dense et bruyante, coupée par la Seine.".into(),
                },
                PlaceSummary {
                    title: "Lyon".into(),
                    summary: "Cité des foires et des soyeux, au confluent du Rhône et de la Saône."
                        .into(),
                },
            ],
        }
    }
}

impl StaticPlaceLookup {
    pub fn new(places: Vec<PlaceSummary>) -> Self {
        Self { places }
    }
}

#[async_trait]
impl PlaceLookupPort for StaticPlaceLookup {
    async fn lookup(&self, place_name: &str) -> Result<Option<PlaceSummary>, LookupError> {
        let needle = place_name.to_lowercase();
        Ok(self
            .places
            .iter()
            .find(|p| needle.contains(&p.title.to_lowercase()) || p.title.to_lowercase().contains(&needle))
            .cloned())
    }
}

/// Offline recipe catalog, filtered by cuisine.
pub struct StaticRecipeSource {
    recipes: Vec<Recipe>,
}

impl Default for StaticRecipeSource {
    fn default() -> Self {
        Self {
            recipes: vec![
                Recipe {
                    name: "Poule au pot".into(),
                    cuisine: "française".into(),
                    ingredients: vec!["poule".into(), "carotte".into(), "oignon".into(), "sel".into()],
                },
                Recipe {
                    name: "Soupe à l'oignon".into(),
                    cuisine: "française".into(),
                    ingredients: vec!["oignon".into(), "pain".into(), "fromage".into()],
                },
                Recipe {
                    name: "Risotto".into(),
                    cuisine: "italienne".into(),
                    ingredients: vec!["riz".into(), "bouillon".into(), "parmesan".into()],
                },
            ],
        }
    }
}

impl StaticRecipeSource {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }
}

#[async_trait]
impl RecipeSourcePort for StaticRecipeSource {
    async fn fetch_recipes(&self, cuisine: &str, limit: usize) -> Result<Vec<Recipe>, LookupError> {
        let cuisine = cuisine.to_lowercase();
        Ok(self
            .recipes
            .iter()
            .filter(|r| r.cuisine.to_lowercase() == cuisine)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Offline book catalog, matched on subject substrings.
pub struct StaticBookSource {
    books: Vec<(String, BookRef)>,
}

impl Default for StaticBookSource {
    fn default() -> Self {
        Self {
            books: vec![
                (
                    "rouen".into(),
                    BookRef {
                        title: "Chroniques de Normandie".into(),
                        author: "Anonyme".into(),
                    },
                ),
                (
                    "paris".into(),
                    BookRef {
                        title: "Le Ménagier de Paris".into(),
                        author: "Anonyme".into(),
                    },
                ),
            ],
        }
    }
}

impl StaticBookSource {
    pub fn new(books: Vec<(String, BookRef)>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl BookSourcePort for StaticBookSource {
    async fn search(&self, subject: &str, limit: usize) -> Result<Vec<BookRef>, LookupError> {
        let subject = subject.to_lowercase();
        Ok(self
            .books
            .iter()
            .filter(|(tag, _)| subject.contains(tag.as_str()))
            .map(|(_, book)| book.clone())
            .take(limit)
            .collect())
    }
}
