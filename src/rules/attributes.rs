//! Identity, attribute and size rules.

use super::{ConversionRule, RuleOutcome, SheetBuilder};
use crate::context::{Ability, ConversionContext};
use crate::document::Collection;
use crate::error::ConvertError;
use crate::input::InputStatblock;
use crate::numeric::ability_modifier;

/// Copies the creature's name into the profile.
pub struct Identity;

impl ConversionRule for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let Some(name) = &input.name else {
            return Ok(RuleOutcome::Inapplicable);
        };
        sheet.document_mut().profile.name = name.clone();
        Ok(RuleOutcome::Applied)
    }
}

/// A GURPS attribute fed by one or more 5e abilities.
struct AttributeSource {
    attr_id: &'static str,
    /// The highest modifier among these abilities is used.
    abilities: &'static [Ability],
    points_per_level: i64,
}

const ATTRIBUTE_SOURCES: [AttributeSource; 4] = [
    AttributeSource {
        attr_id: "st",
        abilities: &[Ability::Strength],
        points_per_level: 10,
    },
    AttributeSource {
        attr_id: "dx",
        abilities: &[Ability::Dexterity],
        points_per_level: 20,
    },
    AttributeSource {
        attr_id: "iq",
        abilities: &[Ability::Intelligence, Ability::Wisdom],
        points_per_level: 20,
    },
    AttributeSource {
        attr_id: "ht",
        abilities: &[Ability::Constitution],
        points_per_level: 10,
    },
];

/// Sets ST, DX, IQ and HT from the ability scores.
///
/// IQ takes the better of Intelligence and Wisdom. An attribute whose
/// abilities are all absent keeps its baseline value.
pub struct Attributes;

impl ConversionRule for Attributes {
    fn name(&self) -> &str {
        "attributes"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let mut outcome = RuleOutcome::Inapplicable;
        for source in &ATTRIBUTE_SOURCES {
            let modifier = source
                .abilities
                .iter()
                .filter_map(|a| a.score(input).map(ability_modifier))
                .max();
            let Some(modifier) = modifier else {
                continue;
            };
            sheet
                .document_mut()
                .attribute_mut(source.attr_id)?
                .set_from_modifier(modifier, source.points_per_level);
            outcome = RuleOutcome::Applied;
        }
        Ok(outcome)
    }
}

/// Constitution at which High Pain Threshold is granted.
const PAIN_THRESHOLD_CON: i64 = 14;

/// Grants High Pain Threshold to hardy creatures.
pub struct HighPainThreshold;

impl ConversionRule for HighPainThreshold {
    fn name(&self) -> &str {
        "high pain threshold"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        match input.con {
            Some(con) if con >= PAIN_THRESHOLD_CON => {
                sheet.add(Collection::Traits, "high_pain_threshold")?;
                Ok(RuleOutcome::Applied)
            }
            _ => Ok(RuleOutcome::Inapplicable),
        }
    }
}

/// Size modifier and the ST/HP bonus that comes with a size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEffect {
    pub code: char,
    pub size_modifier: i64,
    pub st_bonus: i64,
    pub hp_bonus: i64,
}

pub const SIZE_TABLE: [SizeEffect; 6] = [
    SizeEffect {
        code: 'T',
        size_modifier: -4,
        st_bonus: 0,
        hp_bonus: 0,
    },
    SizeEffect {
        code: 'S',
        size_modifier: -1,
        st_bonus: 0,
        hp_bonus: 0,
    },
    SizeEffect {
        code: 'M',
        size_modifier: 0,
        st_bonus: 0,
        hp_bonus: 0,
    },
    SizeEffect {
        code: 'L',
        size_modifier: 2,
        st_bonus: 1,
        hp_bonus: 10,
    },
    SizeEffect {
        code: 'H',
        size_modifier: 3,
        st_bonus: 2,
        hp_bonus: 20,
    },
    SizeEffect {
        code: 'G',
        size_modifier: 4,
        st_bonus: 3,
        hp_bonus: 30,
    },
];

impl SizeEffect {
    pub fn for_code(code: char) -> Option<&'static SizeEffect> {
        SIZE_TABLE.iter().find(|s| s.code == code)
    }
}

/// Sets the size modifier and adds size-based ST and HP adjustments.
pub struct SizeCategory;

impl ConversionRule for SizeCategory {
    fn name(&self) -> &str {
        "size"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let Some(code) = input.size.as_ref().and_then(|s| s.code()) else {
            return Ok(RuleOutcome::Inapplicable);
        };
        let Some(effect) = SizeEffect::for_code(code) else {
            sheet.gap(code.to_string());
            return Ok(RuleOutcome::NoMatch);
        };

        let doc = sheet.document_mut();
        doc.profile.size_modifier = effect.size_modifier;
        if effect.st_bonus != 0 {
            doc.attribute_mut("st")?.adj += effect.st_bonus;
        }
        if effect.hp_bonus != 0 {
            doc.attribute_mut("hp")?.adj += effect.hp_bonus;
        }
        Ok(RuleOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConvertOptions;
    use crate::rules::test_support::{labels, run};
    use serde_json::{json, Number};

    #[test]
    fn test_identity() {
        let (outcome, doc, _) = run(
            &Identity,
            json!({"name": "Goblin"}),
            ConvertOptions::default(),
        );
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert_eq!(doc.profile.name, "Goblin");

        let (outcome, doc, _) = run(&Identity, json!({}), ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Inapplicable);
        assert_eq!(doc.profile.name, "");
    }

    #[test]
    fn test_attributes_from_scores() {
        let input = json!({"str": 8, "dex": 14, "con": 16, "int": 10, "wis": 13, "cha": 8});
        let (outcome, doc, _) = run(&Attributes, input, ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);

        let st = doc.attribute("st").unwrap();
        assert_eq!((st.adj, st.calc.points), (-1, Some(-10)));
        assert_eq!(st.calc.value, Some(Number::from(9)));

        let dx = doc.attribute("dx").unwrap();
        assert_eq!((dx.adj, dx.calc.points), (2, Some(40)));

        // max(int 10 -> 0, wis 13 -> 1)
        let iq = doc.attribute("iq").unwrap();
        assert_eq!((iq.adj, iq.calc.points), (1, Some(20)));

        let ht = doc.attribute("ht").unwrap();
        assert_eq!((ht.adj, ht.calc.points), (3, Some(30)));
        assert_eq!(ht.calc.value, Some(Number::from(13)));
    }

    #[test]
    fn test_attributes_skip_absent_scores() {
        let (outcome, doc, _) = run(&Attributes, json!({"dex": 12}), ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert_eq!(doc.attribute("dx").unwrap().adj, 1);
        assert_eq!(doc.attribute("st").unwrap().calc.points, Some(0));

        let (outcome, _, _) = run(&Attributes, json!({}), ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Inapplicable);
    }

    #[test]
    fn test_high_pain_threshold() {
        let (outcome, doc, _) =
            run(&HighPainThreshold, json!({"con": 14}), ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert_eq!(labels(&doc, Collection::Traits), ["High Pain Threshold"]);

        let (outcome, doc, _) =
            run(&HighPainThreshold, json!({"con": 13}), ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Inapplicable);
        assert!(doc.traits.is_empty());
    }

    #[test]
    fn test_size_large_adjusts_st_and_hp() {
        let (outcome, doc, _) = run(
            &SizeCategory,
            json!({"size": ["L"]}),
            ConvertOptions::default(),
        );
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert_eq!(doc.profile.size_modifier, 2);
        assert_eq!(doc.attribute("st").unwrap().adj, 1);
        assert_eq!(doc.attribute("hp").unwrap().adj, 10);
    }

    #[test]
    fn test_size_small_and_tiny() {
        let (_, doc, _) = run(&SizeCategory, json!({"size": "S"}), ConvertOptions::default());
        assert_eq!(doc.profile.size_modifier, -1);
        let (_, doc, _) = run(&SizeCategory, json!({"size": ["T"]}), ConvertOptions::default());
        assert_eq!(doc.profile.size_modifier, -4);
        assert_eq!(doc.attribute("hp").unwrap().adj, 0);
    }

    #[test]
    fn test_size_gargantuan() {
        let (_, doc, _) = run(&SizeCategory, json!({"size": ["G"]}), ConvertOptions::default());
        assert_eq!(doc.profile.size_modifier, 4);
        assert_eq!(doc.attribute("st").unwrap().adj, 3);
        assert_eq!(doc.attribute("hp").unwrap().adj, 30);
    }

    #[test]
    fn test_size_unknown_code_is_a_gap() {
        let (outcome, doc, gaps) =
            run(&SizeCategory, json!({"size": ["V"]}), ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::NoMatch);
        assert_eq!(gaps, ["V"]);
        assert_eq!(doc.profile.size_modifier, 0);
    }
}
