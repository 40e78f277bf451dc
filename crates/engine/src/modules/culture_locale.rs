//! Local culture module: place-name summary from the lookup collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::cascade::{EnrichError, EnrichedContext, EnrichmentModule};
use crate::infrastructure::ports::PlaceLookupPort;

pub const MODULE_ID: &str = "culture_locale";

pub struct CultureLocaleModule {
    lookup: Arc<dyn PlaceLookupPort>,
}

impl CultureLocaleModule {
    pub fn new(lookup: Arc<dyn PlaceLookupPort>) -> Self {
        Self { lookup }
    }

    fn placeholder(place: &str) -> Value {
        json!({
            "place": place,
            "summary": "Aucune information locale trouvée.",
            "source": "placeholder",
        })
    }
}

#[async_trait]
impl EnrichmentModule for CultureLocaleModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    async fn enrich(&self, ctx: &EnrichedContext) -> Result<Value, EnrichError> {
        let place = ctx.player.location_name.as_str();
        match self.lookup.lookup(place).await {
            Ok(Some(summary)) => Ok(json!({
                "place": place,
                "title": summary.title,
                "summary": summary.summary,
                "source": "lookup",
            })),
            Ok(None) => Ok(Self::placeholder(place)),
            Err(e) => {
                // Degraded content beats a raised error here.
                tracing::warn!(place, error = %e, "Place lookup failed, using placeholder");
                Ok(Self::placeholder(place))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{CascadeContext, ModuleRegistry, PlayerSlice, resolve};
    use crate::infrastructure::ports::{LookupError, MockPlaceLookupPort, PlaceSummary};

    fn ctx_at(place: &str) -> CascadeContext {
        CascadeContext {
            player: PlayerSlice {
                location_name: place.into(),
                ..PlayerSlice::default()
            },
            trigger: Value::Null,
        }
    }

    async fn run(lookup: MockPlaceLookupPort, place: &str) -> Value {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(CultureLocaleModule::new(Arc::new(lookup))));
        let results = resolve(MODULE_ID, &ctx_at(place), &registry).await.unwrap();
        results[MODULE_ID].data.clone()
    }

    #[tokio::test]
    async fn returns_summary_when_lookup_succeeds() {
        let mut lookup = MockPlaceLookupPort::new();
        lookup.expect_lookup().returning(|_| {
            Ok(Some(PlaceSummary {
                title: "Rouen".into(),
                summary: "Ville aux cent clochers.".into(),
            }))
        });

        let data = run(lookup, "Rouen").await;
        assert_eq!(data["source"], "lookup");
        assert_eq!(data["summary"], "Ville aux cent clochers.");
    }

    #[tokio::test]
    async fn unknown_place_degrades_to_placeholder() {
        let mut lookup = MockPlaceLookupPort::new();
        lookup.expect_lookup().returning(|_| Ok(None));

        let data = run(lookup, "Nulle-Part").await;
        assert_eq!(data["source"], "placeholder");
    }

    #[tokio::test]
    async fn lookup_failure_degrades_instead_of_erroring() {
        let mut lookup = MockPlaceLookupPort::new();
        lookup
            .expect_lookup()
            .returning(|_| Err(LookupError::Unavailable));

        let data = run(lookup, "Rouen").await;
        assert_eq!(data["source"], "placeholder");
        assert_eq!(data["place"], "Rouen");
    }
}
