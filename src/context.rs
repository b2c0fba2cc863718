//! Per-conversion derived values.
//!
//! [`ConversionContext`] holds what the rules compute once up front from
//! the raw statblock: the six ability modifiers, the proficiency-bonus
//! equivalent of the challenge rating, and the battle-hardened answer.
//! Rules read it but never write to it, so they stay independent of each
//! other's output.

use crate::error::ParseError;
use crate::input::InputStatblock;
use crate::numeric::{ability_modifier, modifier_to_points, proficiency_bonus};
use serde::{Deserialize, Serialize};

/// Name used in synthesized text when the statblock has none.
const UNNAMED_CREATURE: &str = "creature";

/// Caller-supplied switches for one conversion.
///
/// # Examples
///
/// ```rust
/// use gurpsify::ConvertOptions;
///
/// assert!(ConvertOptions::from_answer("YES").battle_hardened);
/// assert!(!ConvertOptions::from_answer("no").battle_hardened);
/// assert!(!ConvertOptions::from_answer("y").battle_hardened);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Adds Combat Reflexes when set.
    pub battle_hardened: bool,
}

impl ConvertOptions {
    /// Options from a free-form answer to "Is the character battle-hardened?".
    ///
    /// Only a case-insensitive `yes` counts as affirmative.
    pub fn from_answer(answer: &str) -> Self {
        Self {
            battle_hardened: answer.to_lowercase() == "yes",
        }
    }
}

/// The six 5e abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// The raw score of this ability, if the statblock has one.
    pub fn score(self, input: &InputStatblock) -> Option<i64> {
        match self {
            Ability::Strength => input.strength,
            Ability::Dexterity => input.dex,
            Ability::Constitution => input.con,
            Ability::Intelligence => input.intelligence,
            Ability::Wisdom => input.wis,
            Ability::Charisma => input.cha,
        }
    }
}

/// Ability modifiers; an absent score counts as modifier `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityModifiers {
    pub strength: i64,
    pub dexterity: i64,
    pub constitution: i64,
    pub intelligence: i64,
    pub wisdom: i64,
    pub charisma: i64,
}

impl AbilityModifiers {
    pub fn from_input(input: &InputStatblock) -> Self {
        let modifier = |ability: Ability| ability.score(input).map(ability_modifier).unwrap_or(0);
        Self {
            strength: modifier(Ability::Strength),
            dexterity: modifier(Ability::Dexterity),
            constitution: modifier(Ability::Constitution),
            intelligence: modifier(Ability::Intelligence),
            wisdom: modifier(Ability::Wisdom),
            charisma: modifier(Ability::Charisma),
        }
    }

    pub fn get(&self, ability: Ability) -> i64 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }
}

/// Values derived once per conversion and shared by every rule.
///
/// # Examples
///
/// ```rust
/// use gurpsify::{ConversionContext, ConvertOptions, InputStatblock};
/// use gurpsify::context::Ability;
///
/// let input: InputStatblock =
///     serde_json::from_str(r#"{"name": "Ogre", "str": 19, "cr": "2"}"#).unwrap();
/// let ctx = ConversionContext::new(&input, ConvertOptions::default()).unwrap();
///
/// assert_eq!(ctx.modifiers.get(Ability::Strength), 4);
/// assert_eq!(ctx.proficiency, 2);
/// assert_eq!(ctx.creature_name(), "Ogre");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionContext {
    pub name: Option<String>,
    pub modifiers: AbilityModifiers,
    /// Proficiency-bonus equivalent of the challenge rating.
    pub proficiency: i64,
    pub options: ConvertOptions,
}

impl ConversionContext {
    /// Derive the context for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ChallengeRating`] if a present challenge
    /// rating is not a number.
    pub fn new(input: &InputStatblock, options: ConvertOptions) -> Result<Self, ParseError> {
        let rating = input.cr.as_ref().map(|cr| cr.rating());
        Ok(Self {
            name: input.name.clone(),
            modifiers: AbilityModifiers::from_input(input),
            proficiency: proficiency_bonus(rating.as_deref())?,
            options,
        })
    }

    /// The creature's name for synthesized descriptions.
    pub fn creature_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_CREATURE)
    }

    /// Point cost of the proficiency bonus.
    pub fn proficiency_points(&self) -> i64 {
        modifier_to_points(self.proficiency)
    }

    /// Point cost of a skill modifier relative to `ability`.
    pub fn relative_points(&self, modifier: i64, ability: Ability) -> i64 {
        modifier_to_points(modifier - self.modifiers.get(ability))
    }
}
