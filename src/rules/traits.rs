//! Trait and spellcasting rules.

use super::{ConversionRule, RuleOutcome, SheetBuilder};
use crate::annotate::{annotate, Pass};
use crate::context::ConversionContext;
use crate::document::Collection;
use crate::error::{ConvertError, ParseError};
use crate::input::{InputStatblock, SpellEntry, Spellcasting};
use std::collections::BTreeMap;

const NIMBLE_ESCAPE: &str = "Nimble Escape";
const INNATE_SPELLCASTING: &str = "Innate Spellcasting";

/// Highest spell level listed in a general spellcasting block.
const MAX_SPELL_LEVEL: u8 = 9;

/// Grants Combat Reflexes when the user says the creature is battle-hardened.
pub struct BattleHardened;

impl ConversionRule for BattleHardened {
    fn name(&self) -> &str {
        "battle hardened"
    }

    fn apply(
        &self,
        _input: &InputStatblock,
        ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        if !ctx.options.battle_hardened {
            return Ok(RuleOutcome::Inapplicable);
        }
        sheet.add(Collection::Traits, "combat_reflexes")?;
        Ok(RuleOutcome::Applied)
    }
}

/// Copies each statblock trait onto the sheet with annotated notes.
///
/// Nimble Escape is the one trait with a dedicated GURPS rendering.
pub struct Traits;

impl ConversionRule for Traits {
    fn name(&self) -> &str {
        "traits"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let Some(traits) = &input.traits else {
            return Ok(RuleOutcome::Inapplicable);
        };
        for entry in traits {
            if entry.name == NIMBLE_ESCAPE {
                let mut nimble = sheet.template(Collection::Traits, "nimble_escape")?;
                nimble.set_notes(format!(
                    "The {} does not have a limit on the number of times it can use the \
                     Retreat active defense and can take 2 steps during a Retreat. The \
                     creatures step action size also becomes a minimum of 2 yards.",
                    ctx.creature_name()
                ));
                sheet.push(Collection::Traits, nimble);
                continue;
            }
            let mut generic = sheet.template(Collection::Traits, "generic_trait")?;
            generic.set_name(entry.name.as_str());
            generic.set_notes(annotate(entry.description().unwrap_or_default())?);
            sheet.push(Collection::Traits, generic);
        }
        Ok(sheet.settle())
    }
}

/// Summarizes the first spellcasting block as a single trait.
pub struct SpellcastingTrait;

impl SpellcastingTrait {
    fn innate_notes(block: &Spellcasting) -> Result<String, ParseError> {
        let header = block.header_entries.first().map(String::as_str);
        let mut notes = annotate(header.unwrap_or_default())?;
        if let Some(will) = &block.will {
            notes.push_str("\nAt Will: ");
            notes.push_str(&annotate(&SpellEntry::join(will))?);
        }
        if let Some(daily) = &block.daily {
            notes.push_str("\nDaily: ");
            notes.push_str(&annotate(&render_daily(daily))?);
        }
        Ok(notes)
    }

    fn general_notes(block: &Spellcasting) -> Result<String, ParseError> {
        let Some(levels) = &block.spells else {
            return Ok(String::new());
        };
        let mut lines = Vec::new();
        for level in 0..=MAX_SPELL_LEVEL {
            let Some(known) = levels.get(&level.to_string()) else {
                continue;
            };
            let spells = known
                .spells
                .iter()
                .map(|spell| Pass::Spells.apply(spell.text()))
                .collect::<Result<Vec<_>, _>>()?;
            lines.push(format!("{level}: {}", spells.join(", ")));
        }
        Ok(lines.join("\n"))
    }
}

/// Renders `{"1e": [a, b], "3": [c]}` as `1/day each: a, b; 3/day: c`.
fn render_daily(daily: &BTreeMap<String, Vec<SpellEntry>>) -> String {
    daily
        .iter()
        .map(|(uses, spells)| {
            let label = match uses.strip_suffix('e') {
                Some(count) => format!("{count}/day each"),
                None => format!("{uses}/day"),
            };
            format!("{label}: {}", SpellEntry::join(spells))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConversionRule for SpellcastingTrait {
    fn name(&self) -> &str {
        "spellcasting"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let Some(block) = input.spellcasting.as_ref().and_then(|s| s.first()) else {
            return Ok(RuleOutcome::Inapplicable);
        };
        let mut spellcasting = sheet.template(Collection::Traits, "generic_trait")?;
        if block.name == INNATE_SPELLCASTING {
            spellcasting.set_name(INNATE_SPELLCASTING);
            spellcasting.set_notes(Self::innate_notes(block)?);
        } else {
            spellcasting.set_name("Spellcasting");
            spellcasting.set_notes(Self::general_notes(block)?);
        }
        sheet.push(Collection::Traits, spellcasting);
        Ok(RuleOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConvertOptions;
    use crate::rules::test_support::{labels, run};
    use serde_json::json;

    #[test]
    fn test_battle_hardened_follows_option() {
        let (outcome, doc, _) = run(
            &BattleHardened,
            json!({}),
            ConvertOptions {
                battle_hardened: true,
            },
        );
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert_eq!(labels(&doc, Collection::Traits), ["Combat Reflexes"]);

        let (outcome, doc, _) = run(&BattleHardened, json!({}), ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Inapplicable);
        assert!(doc.traits.is_empty());
    }

    #[test]
    fn test_nimble_escape_uses_creature_name() {
        let input = json!({
            "name": "Goblin",
            "trait": [{
                "name": "Nimble Escape",
                "entries": ["The goblin can take the Disengage action."]
            }]
        });
        let (_, doc, _) = run(&Traits, input, ConvertOptions::default());
        let notes = doc.traits[0].notes().unwrap();
        assert!(notes.starts_with("The Goblin does not have a limit"));
        assert!(notes.ends_with("minimum of 2 yards."));
        assert_eq!(doc.traits[0].get("base_points"), Some(&json!(5)));
    }

    #[test]
    fn test_nimble_escape_without_name() {
        let input = json!({"trait": [{"name": "Nimble Escape", "entries": []}]});
        let (_, doc, _) = run(&Traits, input, ConvertOptions::default());
        assert!(doc.traits[0]
            .notes()
            .unwrap()
            .starts_with("The creature does not"));
    }

    #[test]
    fn test_generic_trait_is_annotated() {
        let input = json!({"trait": [{
            "name": "Pack Tactics",
            "entries": [
                "The wolf has advantage on an attack roll against a {@condition prone} creature."
            ]
        }]});
        let (outcome, doc, _) = run(&Traits, input, ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert_eq!(doc.traits[0].name(), Some("Pack Tactics"));
        assert_eq!(
            doc.traits[0].notes(),
            Some("The wolf has +3 on an attack roll against a prone creature.")
        );
    }

    #[test]
    fn test_non_text_first_entry_gives_empty_notes() {
        let input = json!({"trait": [{"name": "Odd", "entries": [{"type": "list", "items": []}]}]});
        let (_, doc, _) = run(&Traits, input, ConvertOptions::default());
        assert_eq!(doc.traits[0].notes(), Some(""));
    }

    #[test]
    fn test_innate_spellcasting() {
        let input = json!({"spellcasting": [{
            "name": "Innate Spellcasting",
            "headerEntries": ["The drow's spellcasting ability is Charisma (spell save {@dc 11})."],
            "will": ["{@spell dancing lights}"],
            "daily": {"1e": ["{@spell darkness}", "{@spell faerie fire}"]}
        }]});
        let (outcome, doc, _) = run(&SpellcastingTrait, input, ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        let trait_ = &doc.traits[0];
        assert_eq!(trait_.name(), Some("Innate Spellcasting"));
        let notes = trait_.notes().unwrap();
        assert!(notes.contains("\nAt Will: dancing lights"));
        assert!(notes.ends_with("\nDaily: 1/day each: darkness, faerie fire"));
    }

    #[test]
    fn test_render_daily_groups() {
        let mut daily = BTreeMap::new();
        let spell = |name: &str| SpellEntry::Text(name.to_string());
        daily.insert("1e".to_string(), vec![spell("a"), spell("b")]);
        daily.insert(
            "3".to_string(),
            vec![SpellEntry::Record {
                entry: "c".to_string(),
            }],
        );
        assert_eq!(render_daily(&daily), "1/day each: a, b; 3/day: c");
    }

    #[test]
    fn test_general_spellcasting_lists_levels() {
        let input = json!({"spellcasting": [{
            "name": "Spellcasting",
            "headerEntries": ["The mage is a 9th-level spellcaster."],
            "spells": {
                "0": {"spells": ["{@spell fire bolt}", "{@spell light}"]},
                "2": {"slots": 3, "spells": ["{@spell misty step}"]}
            }
        }]});
        let (_, doc, _) = run(&SpellcastingTrait, input, ConvertOptions::default());
        assert_eq!(doc.traits[0].name(), Some("Spellcasting"));
        assert_eq!(
            doc.traits[0].notes(),
            Some("0: fire bolt, light\n2: misty step")
        );
    }

    #[test]
    fn test_only_first_block_is_used() {
        let input = json!({"spellcasting": [
            {"name": "Spellcasting", "spells": {"1": {"spells": ["{@spell shield}"]}}},
            {"name": "Innate Spellcasting", "headerEntries": ["x"]}
        ]});
        let (_, doc, _) = run(&SpellcastingTrait, input, ConvertOptions::default());
        assert_eq!(doc.traits.len(), 1);
        assert_eq!(doc.traits[0].notes(), Some("1: shield"));
    }

    #[test]
    fn test_no_spellcasting_is_inapplicable() {
        let (outcome, _, _) = run(&SpellcastingTrait, json!({}), ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::Inapplicable);
        let (outcome, _, _) = run(
            &SpellcastingTrait,
            json!({"spellcasting": []}),
            ConvertOptions::default(),
        );
        assert_eq!(outcome.unwrap(), RuleOutcome::Inapplicable);
    }
}
