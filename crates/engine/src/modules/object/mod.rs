//! Object enrichment: annotating a base game object with independent facets.
//!
//! A second, simpler pipeline than the cascade: no inter-module
//! dependencies. Each module derives one facet - provenance, combat stats,
//! market value - keyed off the same ordinal quality tier, which is the
//! shared vocabulary binding the facets together.

pub mod historique;
pub mod proprietes_armes;
pub mod valeur_economique;

use serde_json::Value;

use wayfarer_domain::QualityTier;

pub use historique::HistoriqueModule;
pub use proprietes_armes::ProprietesArmesModule;
pub use valeur_economique::ValeurEconomiqueModule;

/// The object being annotated.
#[derive(Debug, Clone)]
pub struct BaseObject {
    pub name: String,
    /// e.g. "weapon", "tool", "jewelry"
    pub object_type: String,
    pub quality: QualityTier,
    pub base_value: f64,
}

/// Where the annotation happens.
#[derive(Debug, Clone, Default)]
pub struct ObjectContext {
    pub location_name: String,
}

/// One facet produced by one module.
#[derive(Debug, Clone)]
pub struct ObjectEnrichment {
    pub module_id: String,
    pub data: Value,
}

/// A dependency-free annotator deriving one facet of an object.
pub trait ObjectEnrichmentModule: Send + Sync {
    fn id(&self) -> &str;
    fn enrich_object(&self, object: &BaseObject, ctx: &ObjectContext) -> ObjectEnrichment;
}

/// Run every module over the object. Facets are independent; order carries
/// no meaning.
pub fn enrich_object_all(
    modules: &[Box<dyn ObjectEnrichmentModule>],
    object: &BaseObject,
    ctx: &ObjectContext,
) -> Vec<ObjectEnrichment> {
    modules
        .iter()
        .map(|module| module.enrich_object(object, ctx))
        .collect()
}

/// The standard annotator set.
pub fn standard_modules() -> Vec<Box<dyn ObjectEnrichmentModule>> {
    vec![
        Box::new(HistoriqueModule),
        Box::new(ProprietesArmesModule),
        Box::new(ValeurEconomiqueModule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_standard_modules_produce_a_facet() {
        let object = BaseObject {
            name: "Épée d'acier de Tolède".into(),
            object_type: "weapon".into(),
            quality: QualityTier::Superior,
            base_value: 40.0,
        };
        let ctx = ObjectContext {
            location_name: "Paris".into(),
        };

        let facets = enrich_object_all(&standard_modules(), &object, &ctx);
        assert_eq!(facets.len(), 3);
        let ids: Vec<&str> = facets.iter().map(|f| f.module_id.as_str()).collect();
        assert!(ids.contains(&"historique"));
        assert!(ids.contains(&"proprietes_armes"));
        assert!(ids.contains(&"valeur_economique"));
    }
}
