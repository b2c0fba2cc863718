//! Skill rules.
//!
//! Each listed 5e skill unlocks a fixed set of GURPS skills, sometimes a
//! trait, at a cost derived from the listed modifier. The mapping is the
//! data table [`SKILL_UNLOCKS`].

use super::{ConversionRule, RuleOutcome, SheetBuilder};
use crate::context::Ability::{self, Charisma, Dexterity, Strength};
use crate::context::ConversionContext;
use crate::document::Collection;
use crate::error::ConvertError;
use crate::input::InputStatblock;
use crate::numeric::modifier_to_points;

/// How an unlocked skill is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cost {
    /// `modifier_to_points(proficiency)`.
    Proficiency,
    /// `modifier_to_points(listed modifier - ability modifier)`.
    Relative(Ability),
}

/// Extra condition on a single grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    /// The listed modifier is at least this value.
    MinModifier(i64),
    /// The statblock does not list this other skill.
    Without(&'static str),
}

/// What a grant writes into the copied template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Set `points` to the computed cost.
    Points,
    /// Set `levels` to the proficiency bonus.
    ProficiencyLevels,
}

/// One template appended when a skill unlock fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub collection: Collection,
    pub key: &'static str,
    pub gate: Gate,
    pub fill: Fill,
}

impl Grant {
    const fn skill(key: &'static str) -> Self {
        Self {
            collection: Collection::Skills,
            key,
            gate: Gate::Always,
            fill: Fill::Points,
        }
    }

    const fn skill_if(key: &'static str, gate: Gate) -> Self {
        Self {
            collection: Collection::Skills,
            key,
            gate,
            fill: Fill::Points,
        }
    }

    const fn leveled_trait(key: &'static str) -> Self {
        Self {
            collection: Collection::Traits,
            key,
            gate: Gate::Always,
            fill: Fill::ProficiencyLevels,
        }
    }
}

/// A 5e skill and what it unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillUnlock {
    /// Skill name as listed in the statblock.
    pub skill: &'static str,
    pub cost: Cost,
    pub grants: &'static [Grant],
}

impl SkillUnlock {
    /// Whether pricing or gating needs the listed modifier.
    fn reads_modifier(&self) -> bool {
        matches!(self.cost, Cost::Relative(_))
            || self
                .grants
                .iter()
                .any(|g| matches!(g.gate, Gate::MinModifier(_)))
    }
}

pub const SKILL_UNLOCKS: &[SkillUnlock] = &[
    SkillUnlock {
        skill: "acrobatics",
        cost: Cost::Relative(Dexterity),
        grants: &[Grant::skill("climbing"), Grant::skill("acrobatics")],
    },
    SkillUnlock {
        skill: "animal handling",
        cost: Cost::Proficiency,
        grants: &[
            Grant::skill("animal_handling"),
            Grant::skill("riding"),
            Grant::skill_if("veterinary", Gate::MinModifier(6)),
        ],
    },
    SkillUnlock {
        skill: "arcana",
        cost: Cost::Proficiency,
        grants: &[Grant::skill("thaumatology"), Grant::skill("occultism")],
    },
    SkillUnlock {
        skill: "athletics",
        cost: Cost::Relative(Strength),
        grants: &[
            Grant::skill_if("climbing_athletic", Gate::Without("acrobatics")),
            Grant::skill("hiking"),
            Grant::skill("brawling"),
            Grant::skill("running"),
        ],
    },
    SkillUnlock {
        skill: "deception",
        cost: Cost::Relative(Charisma),
        grants: &[Grant::skill("fast_talk")],
    },
    SkillUnlock {
        skill: "history",
        cost: Cost::Proficiency,
        grants: &[Grant::skill("history")],
    },
    SkillUnlock {
        skill: "insight",
        cost: Cost::Proficiency,
        grants: &[Grant::skill("detect_lies")],
    },
    SkillUnlock {
        skill: "intimidation",
        cost: Cost::Relative(Charisma),
        grants: &[Grant::skill("intimidation")],
    },
    SkillUnlock {
        skill: "investigation",
        cost: Cost::Proficiency,
        grants: &[Grant::skill("scrounging"), Grant::skill("search")],
    },
    SkillUnlock {
        skill: "medicine",
        cost: Cost::Proficiency,
        grants: &[
            Grant::skill("first_aid"),
            Grant::skill("diagnosis"),
            Grant::skill_if("physician", Gate::MinModifier(3)),
            Grant::skill_if("surgery", Gate::MinModifier(6)),
        ],
    },
    SkillUnlock {
        skill: "nature",
        cost: Cost::Proficiency,
        grants: &[Grant::skill("gardening"), Grant::skill("biology_botany")],
    },
    SkillUnlock {
        skill: "perception",
        cost: Cost::Proficiency,
        grants: &[
            Grant::skill("observation"),
            Grant::leveled_trait("acute_vision"),
        ],
    },
    SkillUnlock {
        skill: "performance",
        cost: Cost::Relative(Charisma),
        grants: &[
            Grant::skill("acting"),
            Grant::skill("dancing"),
            Grant::skill("musical_instrument"),
            Grant::skill("singing"),
        ],
    },
    SkillUnlock {
        skill: "persuasion",
        cost: Cost::Relative(Charisma),
        grants: &[Grant::skill("diplomacy")],
    },
    SkillUnlock {
        skill: "religion",
        cost: Cost::Proficiency,
        grants: &[Grant::skill("theology")],
    },
    SkillUnlock {
        skill: "sleight of hand",
        cost: Cost::Relative(Dexterity),
        grants: &[Grant::skill("sleight_of_hand")],
    },
    SkillUnlock {
        skill: "stealth",
        cost: Cost::Relative(Dexterity),
        grants: &[Grant::skill("stealth")],
    },
    SkillUnlock {
        skill: "survival",
        cost: Cost::Proficiency,
        grants: &[Grant::skill("survival")],
    },
];

/// Applies a table of [`SkillUnlock`]s.
pub struct SkillUnlocks {
    table: &'static [SkillUnlock],
}

impl SkillUnlocks {
    pub fn new(table: &'static [SkillUnlock]) -> Self {
        Self { table }
    }

    /// The built-in table.
    pub fn standard() -> Self {
        Self::new(SKILL_UNLOCKS)
    }

    fn unlock(
        unlock: &SkillUnlock,
        input: &InputStatblock,
        ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<(), ConvertError> {
        let modifier = if unlock.reads_modifier() {
            input.skill_modifier(unlock.skill)?.unwrap_or(0)
        } else {
            0
        };
        let points = match unlock.cost {
            Cost::Proficiency => ctx.proficiency_points(),
            Cost::Relative(ability) => ctx.relative_points(modifier, ability),
        };

        for grant in unlock.grants {
            let granted = match grant.gate {
                Gate::Always => true,
                Gate::MinModifier(min) => modifier >= min,
                Gate::Without(other) => !input.has_skill(other),
            };
            if !granted {
                continue;
            }
            let mut entity = sheet.template(grant.collection, grant.key)?;
            match grant.fill {
                Fill::Points => entity.set_points(points),
                Fill::ProficiencyLevels => entity.set_levels(ctx.proficiency),
            }
            sheet.push(grant.collection, entity);
        }
        Ok(())
    }
}

impl ConversionRule for SkillUnlocks {
    fn name(&self) -> &str {
        "skills"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let Some(listed) = &input.skill else {
            return Ok(RuleOutcome::Inapplicable);
        };
        for unlock in self.table {
            if input.has_skill(unlock.skill) {
                Self::unlock(unlock, input, ctx, sheet)?;
            }
        }
        for name in listed.keys() {
            if !self.table.iter().any(|u| u.skill == name) {
                sheet.gap(name.clone());
            }
        }
        Ok(sheet.settle())
    }
}

/// Social skills granted by a positive Charisma when the statblock does
/// not already list the matching 5e skill.
pub struct CharismaDefaults;

/// Statblock skill and the default skill granted in its absence.
const CHARISMA_DEFAULTS: [(&str, &str); 2] =
    [("persuasion", "diplomacy"), ("deception", "fast_talk_default")];

impl ConversionRule for CharismaDefaults {
    fn name(&self) -> &str {
        "charisma defaults"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let charisma = ctx.modifiers.charisma;
        if charisma <= 0 {
            return Ok(RuleOutcome::Inapplicable);
        }
        let points = modifier_to_points(charisma);
        for (listed, default) in CHARISMA_DEFAULTS {
            if !input.has_skill(listed) {
                sheet.add_skill(default, points)?;
            }
        }
        Ok(if sheet.added() > 0 {
            RuleOutcome::Applied
        } else {
            RuleOutcome::Inapplicable
        })
    }
}
