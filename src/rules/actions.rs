//! Action rules.
//!
//! Named weapon attacks become a weapon skill bought at the proficiency
//! cost plus the matching piece of equipment. Natural attacks become
//! traits. Every other action, and every legendary, bonus and reaction
//! entry, becomes a free-form action entry with annotated notes.

use super::{ConversionRule, RuleOutcome, SheetBuilder};
use crate::annotate::annotate;
use crate::context::ConversionContext;
use crate::document::Collection;
use crate::error::ConvertError;
use crate::input::{InputStatblock, NamedEntry};

/// What a named action grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionMapping {
    /// Exact action names that select this row.
    pub names: &'static [&'static str],
    /// Skills bought at the proficiency cost, added before the equipment.
    pub skills: &'static [&'static str],
    pub equipment: &'static [&'static str],
    pub traits: &'static [&'static str],
}

const fn weapon(
    names: &'static [&'static str],
    skills: &'static [&'static str],
    equipment: &'static [&'static str],
) -> ActionMapping {
    ActionMapping {
        names,
        skills,
        equipment,
        traits: &[],
    }
}

const fn natural(names: &'static [&'static str], traits: &'static [&'static str]) -> ActionMapping {
    ActionMapping {
        names,
        skills: &[],
        equipment: &[],
        traits,
    }
}

pub const ACTION_MAPPINGS: &[ActionMapping] = &[
    weapon(&["Dagger"], &["knife"], &["dagger"]),
    weapon(&["Light Crossbow"], &["crossbow"], &["crossbow"]),
    weapon(&["Club"], &["broadsword_club"], &["light_club"]),
    weapon(&["Scimitar", "Shortsword"], &["shortsword"], &["shortsword"]),
    weapon(&["Greataxe", "Great Axe"], &["two_handed_axe_mace"], &["great_axe"]),
    weapon(&["Hand Crossbow"], &["crossbow"], &["pistol_crossbow"]),
    weapon(&["Heavy Crossbow"], &["crossbow"], &["military_crossbow"]),
    weapon(&["Spear"], &["spear"], &["spear"]),
    weapon(&["Javelin"], &["spear", "thrown_weapon_spear"], &["javelin"]),
    weapon(&["Longsword", "Long Sword"], &["broadsword"], &["broadsword"]),
    weapon(&["Longbow"], &["bow"], &["longbow"]),
    // No shortbow template; the longbow stands in.
    weapon(&["Shortbow"], &["bow"], &["longbow"]),
    weapon(&["Rapier"], &["rapier"], &["rapier"]),
    weapon(&["Greatclub", "Great Club"], &["axe_mace_club"], &["knobbed_club"]),
    weapon(&["Sling"], &["sling"], &["sling"]),
    weapon(&["Quarterstaff", "Staff", "Quarter Staff"], &["staff"], &["quarterstaff"]),
    weapon(&["Maul"], &["two_handed_axe_mace"], &["maul"]),
    weapon(&["Pike"], &["spear"], &["pike"]),
    weapon(&["Hand Axe"], &["axe_mace"], &["axe"]),
    weapon(&["Trident"], &["spear", "thrown_weapon_spear"], &["trident"]),
    natural(&["Claws", "Claw"], &["sharp_claws"]),
    natural(&["Fangs"], &["fangs"]),
    natural(&["Bite"], &["sharp_teeth"]),
];

/// Appends a free-form action entry to the traits list.
fn push_generic_action(
    sheet: &mut SheetBuilder<'_>,
    entry: &NamedEntry,
    prefix: &str,
) -> Result<(), ConvertError> {
    let mut action = sheet.template(Collection::Traits, "generic_action")?;
    action.set_name(entry.name.as_str());
    let description = annotate(entry.description().unwrap_or_default())?;
    action.set_notes(format!("{prefix}{description}"));
    sheet.push(Collection::Traits, action);
    Ok(())
}

/// Converts the statblock's actions.
pub struct Actions {
    table: &'static [ActionMapping],
}

impl Actions {
    pub fn new(table: &'static [ActionMapping]) -> Self {
        Self { table }
    }

    pub fn standard() -> Self {
        Self::new(ACTION_MAPPINGS)
    }

    fn lookup(&self, name: &str) -> Option<&'static ActionMapping> {
        self.table.iter().find(|m| m.names.iter().any(|n| *n == name))
    }
}

impl ConversionRule for Actions {
    fn name(&self) -> &str {
        "actions"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let actions = match &input.action {
            Some(actions) if !actions.is_empty() => actions,
            _ => return Ok(RuleOutcome::Inapplicable),
        };
        let points = ctx.proficiency_points();
        for action in actions {
            let Some(mapping) = self.lookup(&action.name) else {
                push_generic_action(sheet, action, "")?;
                continue;
            };
            tracing::debug!(action = %action.name, "mapped action");
            for skill in mapping.skills {
                sheet.add_skill(skill, points)?;
            }
            for item in mapping.equipment {
                sheet.add(Collection::Equipment, item)?;
            }
            for key in mapping.traits {
                sheet.add(Collection::Traits, key)?;
            }
        }
        Ok(sheet.settle())
    }
}

/// Action economy outside the creature's own turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Economy {
    Legendary,
    Bonus,
    Reaction,
}

impl Economy {
    /// Fatigue-cost prefix put in front of each entry's notes.
    pub fn prefix(self) -> &'static str {
        match self {
            Economy::Legendary | Economy::Reaction => {
                "For 1 fp, the following can be done following the turn of another creature. "
            }
            Economy::Bonus => "For 1 fp do the following on your turn in addition to a maneuver. ",
        }
    }

    fn entries(self, input: &InputStatblock) -> Option<&[NamedEntry]> {
        match self {
            Economy::Legendary => input.legendary.as_deref(),
            Economy::Bonus => input.bonus.as_deref(),
            Economy::Reaction => input.reaction.as_deref(),
        }
    }
}

/// Converts legendary, bonus or reaction entries into fatigue-cost actions.
pub struct EconomyActions {
    economy: Economy,
}

impl EconomyActions {
    pub fn new(economy: Economy) -> Self {
        Self { economy }
    }
}

impl ConversionRule for EconomyActions {
    fn name(&self) -> &str {
        match self.economy {
            Economy::Legendary => "legendary actions",
            Economy::Bonus => "bonus actions",
            Economy::Reaction => "reactions",
        }
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let entries = match self.economy.entries(input) {
            Some(entries) if !entries.is_empty() => entries,
            _ => return Ok(RuleOutcome::Inapplicable),
        };
        for entry in entries {
            push_generic_action(sheet, entry, self.economy.prefix())?;
        }
        Ok(sheet.settle())
    }
}
