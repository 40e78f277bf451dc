//! Physical and combat facet: material and weapon class inferred from name
//! substrings, stats scaled by quality tier.

use serde_json::json;

use super::{BaseObject, ObjectContext, ObjectEnrichment, ObjectEnrichmentModule};

pub const MODULE_ID: &str = "proprietes_armes";

// (hint, material, damage factor, weight factor)
const MATERIALS: &[(&str, &str, f64, f64)] = &[
    ("acier", "acier", 1.2, 1.0),
    ("fer", "fer", 1.0, 1.1),
    ("argent", "argent", 0.9, 0.9),
    ("bronze", "bronze", 0.8, 1.2),
    ("bois", "bois", 0.5, 0.6),
    ("os", "os", 0.4, 0.5),
];
const DEFAULT_MATERIAL: (&str, f64, f64) = ("fer", 1.0, 1.1);

// (hint, class, base damage, base weight kg)
const WEAPON_CLASSES: &[(&str, &str, f64, f64)] = &[
    ("épée", "lame longue", 8.0, 1.5),
    ("dague", "lame courte", 4.0, 0.5),
    ("couteau", "lame courte", 3.0, 0.3),
    ("hache", "arme de taille", 10.0, 2.5),
    ("marteau", "arme contondante", 9.0, 3.0),
    ("arc", "arme de trait", 6.0, 1.0),
    ("lance", "arme d'hast", 7.0, 2.0),
];
const DEFAULT_CLASS: (&str, f64, f64) = ("objet contondant", 2.0, 1.0);

pub struct ProprietesArmesModule;

impl ObjectEnrichmentModule for ProprietesArmesModule {
    fn id(&self) -> &str {
        MODULE_ID
    }

    fn enrich_object(&self, object: &BaseObject, _ctx: &ObjectContext) -> ObjectEnrichment {
        let name = object.name.to_lowercase();

        let (material, damage_factor, weight_factor) = MATERIALS
            .iter()
            .find(|(hint, ..)| name.contains(hint))
            .map(|(_, material, damage, weight)| (*material, *damage, *weight))
            .unwrap_or(DEFAULT_MATERIAL);

        let (class, base_damage, base_weight) = WEAPON_CLASSES
            .iter()
            .find(|(hint, ..)| name.contains(hint))
            .map(|(_, class, damage, weight)| (*class, *damage, *weight))
            .unwrap_or(DEFAULT_CLASS);

        let quality = object.quality.multiplier();
        let damage = base_damage * damage_factor * quality;
        // Durability scales with quality; weight does not.
        let durability = (50.0 * quality).round();

        ObjectEnrichment {
            module_id: MODULE_ID.to_string(),
            data: json!({
                "material": material,
                "weapon_class": class,
                "damage": (damage * 10.0).round() / 10.0,
                "weight_kg": (base_weight * weight_factor * 10.0).round() / 10.0,
                "durability": durability,
                "quality": object.quality.as_str(),
            }),
        }
    }
}
