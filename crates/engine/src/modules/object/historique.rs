//! Provenance facet: where an object plausibly comes from and how far it
//! has travelled.

use serde_json::json;

use wayfarer_domain::QualityTier;

use super::{BaseObject, ObjectContext, ObjectEnrichment, ObjectEnrichmentModule};

pub const MODULE_ID: &str = "historique";

// Name substrings carrying a provenance of their own.
const ORIGIN_HINTS: &[(&str, &str)] = &[
    ("damas", "Damas"),
    ("tolède", "Tolède"),
    ("milan", "Milan"),
    ("nuremberg", "Nuremberg"),
];

fn era_for(quality: QualityTier) -> &'static str {
    match quality {
        QualityTier::Poor | QualityTier::Common => "fabrication récente",
        QualityTier::Fine | QualityTier::Superior => "l'atelier d'un maître de la génération passée",
        QualityTier::Masterwork => "un siècle révolu",
        QualityTier::Legendary => "un autre âge, dont le nom s'est perdu",
    }
}

pub struct HistoriqueModule;

impl ObjectEnrichmentModule for HistoriqueModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    fn enrich_object(&self, object: &BaseObject, ctx: &ObjectContext) -> ObjectEnrichment {
        let name = object.name.to_lowercase();
        let origin = ORIGIN_HINTS
            .iter()
            .find(|(hint, _)| name.contains(hint))
            .map(|(_, origin)| origin.to_string())
            .unwrap_or_else(|| ctx.location_name.clone());

        // Higher tiers have passed through more hands.
        let previous_owners = object.quality as u32;

        ObjectEnrichment {
            module_id: MODULE_ID.to_string(),
            data: json!({
                "origin": origin,
                "era": era_for(object.quality),
                "previous_owners": previous_owners,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str, quality: QualityTier) -> BaseObject {
        BaseObject {
            name: name.into(),
            object_type: "weapon".into(),
            quality,
            base_value: 10.0,
        }
    }

    #[test]
    fn origin_hint_in_name_wins_over_location() {
        let facet = HistoriqueModule.enrich_object(
            &object("Lame de Damas", QualityTier::Fine),
            &ObjectContext {
                location_name: "Rouen".into(),
            },
        );
        assert_eq!(facet.data["origin"], "Damas");
    }

    #[test]
    fn unhinted_object_is_assumed_local() {
        let facet = HistoriqueModule.enrich_object(
            &object("Couteau simple", QualityTier::Common),
            &ObjectContext {
                location_name: "Rouen".into(),
            },
        );
        assert_eq!(facet.data["origin"], "Rouen");
        assert_eq!(facet.data["previous_owners"], 1);
    }

    #[test]
    fn era_scales_with_quality() {
        let ctx = ObjectContext::default();
        let common = HistoriqueModule.enrich_object(&object("Dague", QualityTier::Common), &ctx);
        let legendary =
            HistoriqueModule.enrich_object(&object("Dague", QualityTier::Legendary), &ctx);
        assert_ne!(common.data["era"], legendary.data["era"]);
    }
}
