//! Market value facet: base value scaled by quality and the local market.

use serde_json::json;

use super::{BaseObject, ObjectContext, ObjectEnrichment, ObjectEnrichmentModule};

pub const MODULE_ID: &str = "valeur_economique";

// Market factors by location substring; anywhere else trades at par.
const MARKET_FACTORS: &[(&str, f64)] = &[
    ("paris", 1.6),
    ("lyon", 1.3),
    ("venise", 1.5),
    ("londres", 1.4),
    ("campagne", 0.8),
];

pub fn market_factor_for(location_name: &str) -> f64 {
    let location = location_name.to_lowercase();
    MARKET_FACTORS
        .iter()
        .find(|(name, _)| location.contains(name))
        .map(|(_, factor)| *factor)
        .unwrap_or(1.0)
}

pub struct ValeurEconomiqueModule;

impl ObjectEnrichmentModule for ValeurEconomiqueModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    fn enrich_object(&self, object: &BaseObject, ctx: &ObjectContext) -> ObjectEnrichment {
        let market_factor = market_factor_for(&ctx.location_name);
        let estimated = object.base_value * object.quality.multiplier() * market_factor;

        ObjectEnrichment {
            module_id: MODULE_ID.to_string(),
            data: json!({
                "base_value": object.base_value,
                "quality_multiplier": object.quality.multiplier(),
                "market_factor": market_factor,
                "estimated_value": (estimated * 100.0).round() / 100.0,
            }),
        }
    }
}
