//! Books module: a bounded search for reading matter about the locale.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::cascade::{
    EnrichError, EnrichedContext, EnrichmentLevel, EnrichmentModule, ModuleDependency,
};
use crate::infrastructure::ports::BookSourcePort;

use super::culture_locale;

pub const MODULE_ID: &str = "livre";
const MAX_BOOKS: usize = 3;

pub struct LivreModule {
    source: Arc<dyn BookSourcePort>,
    dependencies: Vec<ModuleDependency>,
}

impl LivreModule {
    pub fn new(source: Arc<dyn BookSourcePort>) -> Self {
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
impl EnrichmentModule for LivreModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    fn dependencies(&self) -> &[ModuleDependency] {
        &self.dependencies
    }

    async fn enrich(&self, ctx: &EnrichedContext) -> Result<Value, EnrichError> {
        // Prefer the resolved place title over the raw location name when the
        // culture module found one.
        let subject = ctx
            .dependency_data(culture_locale::MODULE_ID)
            .and_then(|data| data.get("title"))
            .and_then(Value::as_str)
            .unwrap_or(ctx.player.location_name.as_str())
            .to_string();

        let books = match self.source.search(&subject, MAX_BOOKS).await {
            Ok(books) => books,
            Err(e) => {
                tracing::warn!(subject, error = %e, "Book search failed, continuing empty");
                Vec::new()
            }
        };

        if books.is_empty() {
            return Ok(json!({
                "subject": subject,
                "books": [],
                "note": "Aucun ouvrage trouvé sur le sujet.",
            }));
        }

        Ok(json!({
            "subject": subject,
            "books": books
                .iter()
                .map(|b| json!({ "title": b.title, "author": b.author }))
                .collect::<Vec<_>>(),
        }))
    }
}
