//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Ports exist for:
//! - Place lookup (gazetteer/encyclopedia source behind the culture module)
//! - Recipe and book sources (content enrichment collaborators)
//! - AI flows (prompt execution; degrades to `None` without credentials)
//! - Persistence (snapshot load/save)
//! - Clock (for testing)
//!
//! Contract shared by all data-source ports: "not found" is `Ok(None)` or an
//! empty vec, never an error. Errors are reserved for upstream failures, and
//! callers at the module layer convert even those into placeholder content.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use wayfarer_domain::GameStateSnapshot;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Lookup failed: {0}")]
    Failed(String),
    #[error("Source unavailable")]
    Unavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// Data-source Types
// =============================================================================

/// Summary of a real or generated place, as returned by the lookup source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub title: String,
    pub summary: String,
}

/// A recipe from the external recipe source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub cuisine: String,
    pub ingredients: Vec<String>,
}

/// A book reference from the external book source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRef {
    pub title: String,
    pub author: String,
}

// =============================================================================
// Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceLookupPort: Send + Sync {
    /// Look up a place-name summary. `Ok(None)` when the place is unknown.
    async fn lookup(&self, place_name: &str) -> Result<Option<PlaceSummary>, LookupError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeSourcePort: Send + Sync {
    /// Fetch up to `limit` recipes of a cuisine. Empty vec on no results.
    async fn fetch_recipes(&self, cuisine: &str, limit: usize) -> Result<Vec<Recipe>, LookupError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookSourcePort: Send + Sync {
    /// Search books about a subject. Empty vec on no results.
    async fn search(&self, subject: &str, limit: usize) -> Result<Vec<BookRef>, LookupError>;
}

/// Generative-AI prompt flow execution.
///
/// Callers never receive an error from a flow: a missing credential or any
/// internal failure yields `None`, and callers substitute their documented
/// neutral output. Missing-credential and rate-limit conditions share this
/// outcome but never any bookkeeping.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiFlowPort: Send + Sync {
    async fn invoke(&self, flow_name: &str, input: Value) -> Option<Value>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistencePort: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<GameStateSnapshot>, PersistenceError>;
    /// Returns whether the snapshot was written.
    async fn save(&self, key: &str, snapshot: &GameStateSnapshot)
        -> Result<bool, PersistenceError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
