//! Free-text annotation rewriter.
//!
//! Rewrites 5etools prose (inline `{@tag ...}` markup and 5e game terms)
//! into GURPS vocabulary. The rewrite is an ordered pipeline of [`Pass`]es,
//! each applied to the output of the previous one. Order matters: the
//! damage pass must see the text after the markup and spell passes, and the
//! DC pass relies on the keyword pass having already turned
//! "Constitution saving throw" into "HT roll".
//!
//! # Examples
//!
//! ```rust
//! use gurpsify::annotate::annotate;
//!
//! let text = "{@atk mw} {@hit 5} to hit. {@h}8 ({@damage 1d8 + 3}) slashing damage.";
//! assert_eq!(
//!     annotate(text).unwrap(),
//!     "Melee Weapon Attack, DC 11 to hit. 1d + 1 slashing damage."
//! );
//! ```

use crate::error::ParseError;
use crate::numeric::{
    attack_bonus_to_target_number, dice_expected_value, expected_damage_to_dice,
    saving_throw_dc_to_offset,
};
use regex::{Captures, Regex};
use std::sync::OnceLock;

// Compiled once on first use.
static CONDITION_TAG: OnceLock<Regex> = OnceLock::new();
static SPELL_TAG: OnceLock<Regex> = OnceLock::new();
static DAMAGE_TAG: OnceLock<Regex> = OnceLock::new();
static HIT_TAG: OnceLock<Regex> = OnceLock::new();
static DC_ROLL: OnceLock<Regex> = OnceLock::new();

/// Advantage phrases, applied in order.
const ADVANTAGE_TERMS: [(&str, &str); 4] = [
    (" advantage", " +3"),
    ("Advantage", "+3"),
    (" disadvantage", " -3"),
    ("Disadvantage", "-3"),
];

/// Ability names and the GURPS roll each saving throw becomes.
const SAVING_THROWS: [(&str, &str); 6] = [
    ("constitution", "HT roll"),
    ("strength", "ST roll"),
    ("dexterity", "DX roll"),
    ("wisdom", "WL roll"),
    ("intelligence", "IQ roll"),
    ("charisma", "WL roll"),
];

/// Literal markup tags and their replacements.
const MARKUP_TAGS: [(&str, &str); 3] = [
    ("{@h}", ""),
    ("{@atk mw}", "Melee Weapon Attack,"),
    ("{@atk rw}", "Ranged Weapon Attack,"),
];

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("annotation pattern is invalid"))
}

/// One step of the annotation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Advantage/disadvantage and the six "<ability> saving throw" phrases.
    Keywords,
    /// `{@h}` and the two `{@atk ..}` attack-type tags.
    MarkupTags,
    /// `{@condition X}` becomes `X`.
    Conditions,
    /// `{@spell X}` becomes `X`.
    Spells,
    /// `N ({@damage XdY + Z})` becomes a converted GURPS dice expression.
    Damage,
    /// `{@hit N}` becomes a target-number label.
    AttackBonus,
    /// `{@dc N} XX roll` becomes `XX - offset roll`.
    SavingThrowDc,
}

impl Pass {
    /// Every pass in pipeline order.
    pub const ALL: [Pass; 7] = [
        Pass::Keywords,
        Pass::MarkupTags,
        Pass::Conditions,
        Pass::Spells,
        Pass::Damage,
        Pass::AttackBonus,
        Pass::SavingThrowDc,
    ];

    /// Apply this single pass to `text`.
    ///
    /// # Errors
    ///
    /// The damage, attack-bonus and DC passes fail with a [`ParseError`]
    /// when a matched tag carries something other than the expected number
    /// or dice expression. The other passes never fail.
    pub fn apply(self, text: &str) -> Result<String, ParseError> {
        match self {
            Pass::Keywords => Ok(replace_keywords(text)),
            Pass::MarkupTags => Ok(MARKUP_TAGS
                .iter()
                .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))),
            Pass::Conditions => Ok(pattern(&CONDITION_TAG, r"\{@condition (.+?)\}")
                .replace_all(text, "$1")
                .into_owned()),
            Pass::Spells => Ok(pattern(&SPELL_TAG, r"\{@spell (.+?)\}")
                .replace_all(text, "$1")
                .into_owned()),
            Pass::Damage => try_replace_all(
                pattern(&DAMAGE_TAG, r"\d+\s\(\{@damage (.+?)\}\)"),
                text,
                |caps| Ok(expected_damage_to_dice(dice_expected_value(&caps[1])?)),
            ),
            Pass::AttackBonus => {
                try_replace_all(pattern(&HIT_TAG, r"\{@hit (.+?)\}"), text, |caps| {
                    let bonus = caps[1]
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| ParseError::AttackBonus(caps[1].to_string()))?;
                    Ok(attack_bonus_to_target_number(bonus))
                })
            }
            Pass::SavingThrowDc => try_replace_all(
                pattern(&DC_ROLL, r"\{@dc (\d+)\} (\w{2}) roll"),
                text,
                |caps| {
                    let dc = caps[1]
                        .parse::<i64>()
                        .map_err(|_| ParseError::SavingThrowDc(caps[1].to_string()))?;
                    Ok(format!("{} - {} roll", &caps[2], saving_throw_dc_to_offset(dc)))
                },
            ),
        }
    }
}

fn replace_keywords(text: &str) -> String {
    let mut out = ADVANTAGE_TERMS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to));

    for (ability, roll) in SAVING_THROWS {
        let capitalized = capitalize(ability);
        for phrase in [
            format!("{ability} saving throw"),
            format!("{capitalized} saving throw"),
            format!("{capitalized} Saving Throw"),
        ] {
            out = out.replace(&phrase, roll);
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Regex::replace_all` with a fallible replacement.
///
/// Matches are replaced left to right; the first failing replacement aborts
/// the whole rewrite.
fn try_replace_all<F>(re: &Regex, text: &str, mut replace: F) -> Result<String, ParseError>
where
    F: FnMut(&Captures<'_>) -> Result<String, ParseError>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replace(&caps)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Run the full annotation pipeline over `text`.
///
/// Text containing none of the trigger phrases or tags comes back
/// unchanged.
///
/// # Errors
///
/// Returns a [`ParseError`] if an embedded damage, hit or DC tag is
/// malformed. No partial rewrite is returned.
pub fn annotate(text: &str) -> Result<String, ParseError> {
    Pass::ALL
        .iter()
        .try_fold(text.to_string(), |acc, pass| pass.apply(&acc))
}
