//! Armor-class rules.
//!
//! Natural armor and unarmored defense become leveled traits. Worn armor
//! named in an entry's `from` list becomes a bundle of GURPS armor pieces.

use super::{ConversionRule, RuleOutcome, SheetBuilder};
use crate::context::ConversionContext;
use crate::document::Collection;
use crate::error::ConvertError;
use crate::input::{ArmorClass, ArmorRecord, InputStatblock};

/// AC above which natural armor and unarmored defense grant levels.
const BASE_AC: i64 = 11;

/// A `from` source that grants a trait leveled by `ac - 11`.
struct LeveledSource {
    source: &'static str,
    trait_key: &'static str,
}

const LEVELED_SOURCES: [LeveledSource; 2] = [
    LeveledSource {
        source: "natural armor",
        trait_key: "damage_resistance",
    },
    LeveledSource {
        source: "unarmored",
        trait_key: "enhanced_dodge",
    },
];

/// Armor pieces granted when a `from` source names a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorBundle {
    /// Substring looked for in the lowercased source.
    pub keyword: &'static str,
    /// The bundle does not fire when this substring is also present.
    pub unless: Option<&'static str>,
    pub equipment: &'static [&'static str],
}

impl ArmorBundle {
    pub fn matches(&self, source: &str) -> bool {
        let source = source.to_lowercase();
        source.contains(self.keyword) && !self.unless.is_some_and(|u| source.contains(u))
    }
}

/// Material bundles, checked independently of each other.
///
/// `plate` also matches "breastplate" and "half plate", so those sources
/// receive both bundles.
pub const ARMOR_BUNDLES: &[ArmorBundle] = &[
    ArmorBundle {
        keyword: "leather",
        unless: Some("studded"),
        equipment: &[
            "leather_armor",
            "leather_pants",
            "heavy_leather_sleeves",
            "leather_cap",
            "boots",
        ],
    },
    ArmorBundle {
        keyword: "studded leather",
        unless: None,
        equipment: &[
            "leather_armor",
            "heavy_leather_leggings",
            "heavy_leather_sleeves",
            "leather_helm",
            "studded_leather_skirts",
            "reinforced_boots",
            "leather_gloves",
        ],
    },
    ArmorBundle {
        keyword: "hide",
        unless: None,
        equipment: &[
            "fur_tunic",
            "fur_loincloth",
            "leather_armor",
            "leather_pants",
            "leather_helm",
            "reinforced_boots",
            "leather_gloves",
            "heavy_leather_sleeves",
            "heavy_leather_leggings",
        ],
    },
    ArmorBundle {
        keyword: "padded",
        unless: None,
        equipment: &[
            "buff_coat",
            "leather_pants",
            "heavy_leather_sleeves",
            "leather_helm",
            "reinforced_boots",
            "leather_gloves",
        ],
    },
    ArmorBundle {
        keyword: "shield",
        unless: None,
        equipment: &["medium_shield"],
    },
    ArmorBundle {
        keyword: "scale",
        unless: None,
        equipment: &[
            "scale_armor",
            "scale_leggings",
            "scale_sleeves",
            "steel_pot",
            "buff_coat",
            "leather_gloves",
            "reinforced_boots",
        ],
    },
    ArmorBundle {
        keyword: "chain",
        unless: None,
        equipment: &[
            "mail_coif",
            "mail_shirt",
            "mail_leggings",
            "mail_sleeves",
            "steel_pot",
            "buff_coat",
            "leather_gloves",
            "reinforced_boots",
        ],
    },
    ArmorBundle {
        keyword: "breastplate",
        unless: None,
        equipment: &[
            "steel_breastplate",
            "mail_leggings",
            "mail_sleeves",
            "steel_pot",
            "buff_coat",
            "leather_gloves",
            "reinforced_boots",
        ],
    },
    ArmorBundle {
        keyword: "half plate",
        unless: None,
        equipment: &[
            "steel_corselet",
            "mail_sleeves",
            "steel_pot",
            "mail_coif",
            "buff_coat",
            "gauntlets",
            "mail_leggings",
            "sollerets",
        ],
    },
    ArmorBundle {
        keyword: "splint",
        unless: None,
        equipment: &[
            "steel_corselet",
            "plate_arms",
            "plate_legs",
            "sollerets",
            "gauntlets",
            "mail_hauberk",
            "buff_coat",
            "barrel_helm",
        ],
    },
    ArmorBundle {
        keyword: "plate",
        unless: None,
        equipment: &[
            "heavy_steel_corselet",
            "heavy_plate_arms",
            "heavy_plate_legs",
            "sollerets",
            "heavy_gauntlets",
            "mail_hauberk",
            "buff_coat",
            "mail_leggings",
            "mail_sleeves",
            "great_helm",
        ],
    },
];

/// Converts armor-class entries into traits and armor pieces.
pub struct ArmorEquipment;

impl ArmorEquipment {
    fn apply_record(
        record: &ArmorRecord,
        sources: &[String],
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<(), ConvertError> {
        for leveled in &LEVELED_SOURCES {
            let listed = sources
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case(leveled.source));
            match record.ac {
                Some(ac) if listed && ac > BASE_AC => {
                    let mut entity = sheet.template(Collection::Traits, leveled.trait_key)?;
                    entity.set_levels(ac - BASE_AC);
                    sheet.push(Collection::Traits, entity);
                }
                _ => {}
            }
        }

        for bundle in ARMOR_BUNDLES {
            for source in sources.iter().filter(|s| bundle.matches(s)) {
                tracing::debug!(source = %source, keyword = bundle.keyword, "armor bundle");
                for key in bundle.equipment {
                    sheet.add(Collection::Equipment, key)?;
                }
            }
        }

        for source in sources {
            let known = LEVELED_SOURCES
                .iter()
                .any(|l| source.trim().eq_ignore_ascii_case(l.source))
                || ARMOR_BUNDLES.iter().any(|b| b.matches(source));
            if !known {
                sheet.gap(source.clone());
            }
        }
        Ok(())
    }
}

impl ConversionRule for ArmorEquipment {
    fn name(&self) -> &str {
        "armor"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let Some(entries) = &input.ac else {
            return Ok(RuleOutcome::Inapplicable);
        };
        let mut any_sources = false;
        for entry in entries {
            // Bare values carry no source to convert.
            let ArmorClass::Record(record) = entry else {
                continue;
            };
            let Some(sources) = &record.from else {
                continue;
            };
            any_sources = true;
            Self::apply_record(record, sources, sheet)?;
        }
        if !any_sources {
            return Ok(RuleOutcome::Inapplicable);
        }
        Ok(sheet.settle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::context::ConvertOptions;
    use crate::rules::test_support::{labels, run};
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_scale_mail_bundle() {
        let input = json!({"ac": [{"ac": 15, "from": ["scale mail"]}]});
        let (outcome, doc, gaps) = run(&ArmorEquipment, input, ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert!(gaps.is_empty());
        assert_eq!(
            labels(&doc, Collection::Equipment),
            [
                "Scale Armor",
                "Scale Leggings",
                "Scale Sleeves",
                "Steel Pot",
                "Buff Coat (Leather)",
                "Leather Gloves",
                "Reinforced Boots"
            ]
        );
        let ids: HashSet<&str> = doc.equipment.iter().filter_map(|e| e.id()).collect();
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn test_natural_armor_levels() {
        let input = json!({"ac": [{"ac": 15, "from": ["natural armor"]}]});
        let (_, doc, _) = run(&ArmorEquipment, input, ConvertOptions::default());
        assert_eq!(labels(&doc, Collection::Traits), ["Damage Resistance"]);
        assert_eq!(doc.traits[0].get("levels"), Some(&json!(4)));
        assert!(doc.equipment.is_empty());
    }

    #[test]
    fn test_natural_armor_at_base_ac_adds_nothing() {
        let input = json!({"ac": [{"ac": 11, "from": ["natural armor"]}]});
        let (outcome, doc, gaps) = run(&ArmorEquipment, input, ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::NoMatch);
        assert!(doc.traits.is_empty());
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_unarmored_and_leather_both_fire() {
        let input = json!({"ac": [{"ac": 14, "from": ["unarmored", "leather armor"]}]});
        let (_, doc, _) = run(&ArmorEquipment, input, ConvertOptions::default());
        assert_eq!(labels(&doc, Collection::Traits), ["Enhanced Dodge"]);
        assert_eq!(doc.traits[0].get("levels"), Some(&json!(3)));
        assert_eq!(doc.equipment.len(), 5);
    }

    #[test]
    fn test_studded_leather_excludes_plain_leather() {
        let input = json!({"ac": [{"ac": 12, "from": ["{@item studded leather armor|phb}"]}]});
        let (_, doc, _) = run(&ArmorEquipment, input, ConvertOptions::default());
        assert_eq!(doc.equipment.len(), 7);
        assert_eq!(
            labels(&doc, Collection::Equipment)[4],
            "Studded Leather Skirt"
        );
    }

    #[test]
    fn test_half_plate_also_matches_plate() {
        let input = json!({"ac": [{"ac": 15, "from": ["Half Plate"]}]});
        let (_, doc, _) = run(&ArmorEquipment, input, ConvertOptions::default());
        assert_eq!(doc.equipment.len(), 8 + 10);
    }

    #[test]
    fn test_shield_with_chain_mail() {
        let input = json!({"ac": [{"ac": 18, "from": ["chain mail", "shield"]}]});
        let (_, doc, _) = run(&ArmorEquipment, input, ConvertOptions::default());
        let labels = labels(&doc, Collection::Equipment);
        assert_eq!(labels[0], "Medium Shield");
        assert_eq!(labels.len(), 9);
    }

    #[test]
    fn test_bare_values_are_skipped() {
        let (outcome, doc, _) = run(
            &ArmorEquipment,
            json!({"ac": [12, "13"]}),
            ConvertOptions::default(),
        );
        assert_eq!(outcome.unwrap(), RuleOutcome::Inapplicable);
        assert!(doc.equipment.is_empty());
    }

    #[test]
    fn test_unknown_source_is_a_gap() {
        let input = json!({"ac": [{"ac": 17, "from": ["mage armor"]}]});
        let (outcome, _, gaps) = run(&ArmorEquipment, input, ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::NoMatch);
        assert_eq!(gaps, ["mage armor"]);
    }

    #[test]
    fn test_bundle_keys_are_in_the_catalog() {
        let catalog = Catalog::bundled().unwrap();
        for bundle in ARMOR_BUNDLES {
            for key in bundle.equipment {
                assert!(catalog.template(Collection::Equipment, key).is_some(), "{key}");
            }
        }
        for leveled in &LEVELED_SOURCES {
            assert!(catalog.template(Collection::Traits, leveled.trait_key).is_some());
        }
    }
}
