//! Numeric converters between the two rulesets.
//!
//! Pure functions mapping 5e numbers onto their GURPS counterparts:
//! ability scores to modifiers, modifiers to character points, average
//! damage to dice expressions, attack bonuses to target numbers, and
//! saving-throw DCs to roll penalties.
//!
//! Rounding follows round-half-to-even throughout, so `2.5` rounds to `2`
//! and `3.5` rounds to `4`.

use crate::error::ParseError;

/// Threshold below which average damage is scaled linearly by `0.55`.
const DAMAGE_SCALE_THRESHOLD: f64 = 28.571;

/// Expected value of a single six-sided die.
const D6_AVERAGE: f64 = 3.5;

/// Ability score to modifier: `floor((score - 10) / 2)`.
///
/// # Examples
///
/// ```rust
/// use gurpsify::numeric::ability_modifier;
///
/// assert_eq!(ability_modifier(16), 3);
/// assert_eq!(ability_modifier(10), 0);
/// assert_eq!(ability_modifier(7), -2);
/// ```
pub fn ability_modifier(score: i64) -> i64 {
    (score - 10).div_euclid(2)
}

/// Skill or ability modifier to a character-point cost.
///
/// Identity up to `+2`, doubled for `+3` and `+4`, then four points per
/// step beyond `+3` on top of a base of eight. Negative modifiers pass
/// through unchanged.
///
/// # Examples
///
/// ```rust
/// use gurpsify::numeric::modifier_to_points;
///
/// assert_eq!(modifier_to_points(2), 2);
/// assert_eq!(modifier_to_points(3), 6);
/// assert_eq!(modifier_to_points(5), 12);
/// assert_eq!(modifier_to_points(-1), -1);
/// ```
pub fn modifier_to_points(modifier: i64) -> i64 {
    if modifier <= 2 {
        modifier
    } else if modifier <= 4 {
        2 * modifier
    } else {
        4 * (modifier - 3) + 8
    }
}

/// Expected value of a dice expression of the form `XdY` or `XdY + Z`.
///
/// The flat modifier must be separated by a literal `" + "`.
///
/// # Errors
///
/// Returns [`ParseError::DiceExpression`] if the `d` separator is missing,
/// any component is not an integer, or the dice total overflows.
///
/// # Examples
///
/// ```rust
/// use gurpsify::numeric::dice_expected_value;
///
/// assert_eq!(dice_expected_value("2d6").unwrap(), 7.0);
/// assert_eq!(dice_expected_value("1d8 + 3").unwrap(), 7.5);
/// assert!(dice_expected_value("d").is_err());
/// ```
pub fn dice_expected_value(expr: &str) -> Result<f64, ParseError> {
    let malformed = || ParseError::DiceExpression(expr.to_string());

    let (dice, flat) = if expr.contains('+') {
        let (dice, flat) = expr.split_once(" + ").ok_or_else(malformed)?;
        let flat: i64 = flat.trim().parse().map_err(|_| malformed())?;
        (dice, flat)
    } else {
        (expr, 0)
    };

    let (count, sides) = dice.split_once('d').ok_or_else(malformed)?;
    let count: i64 = count.trim().parse().map_err(|_| malformed())?;
    let sides: i64 = sides.trim().parse().map_err(|_| malformed())?;

    let total = sides
        .checked_add(1)
        .and_then(|faces| count.checked_mul(faces))
        .ok_or_else(malformed)?;
    Ok(total as f64 / 2.0 + flat as f64)
}

/// Average 5e damage to the nearest GURPS dice expression.
///
/// The value is first rescaled (`0.55 * v` below 28.571, `0.25 * v + 10`
/// above) and then expressed as `N` dice plus a signed integer adjustment.
///
/// # Examples
///
/// ```rust
/// use gurpsify::numeric::expected_damage_to_dice;
///
/// assert_eq!(expected_damage_to_dice(7.0), "1d");
/// assert_eq!(expected_damage_to_dice(40.0), "6d - 1");
/// ```
pub fn expected_damage_to_dice(value: f64) -> String {
    let scaled = if value < DAMAGE_SCALE_THRESHOLD {
        0.55 * value
    } else {
        0.25 * value + 10.0
    };

    let dice = (scaled / D6_AVERAGE).round_ties_even();
    let adjust = (scaled - dice * D6_AVERAGE).round_ties_even() as i64;
    let dice = dice as i64;

    match adjust {
        0 => format!("{dice}d"),
        a if a < 0 => format!("{dice}d - {}", a.abs()),
        a => format!("{dice}d + {a}"),
    }
}

/// 5e attack bonus to the GURPS target number label.
///
/// Saturates at `DC 9` for bonuses of `+1` and below, and at `DC 18` for
/// `+15` and above.
///
/// # Examples
///
/// ```rust
/// use gurpsify::numeric::attack_bonus_to_target_number;
///
/// assert_eq!(attack_bonus_to_target_number(0), "DC 9");
/// assert_eq!(attack_bonus_to_target_number(5), "DC 11");
/// assert_eq!(attack_bonus_to_target_number(20), "DC 18");
/// ```
pub fn attack_bonus_to_target_number(bonus: i64) -> String {
    let target = match bonus {
        i64::MIN..=1 => 9,
        2 | 3 | 4 => 10,
        5 | 6 => 11,
        7 | 8 => 12,
        9 | 10 => 13,
        11 => 14,
        12 => 15,
        13 => 16,
        14 => 17,
        _ => 18,
    };
    format!("DC {target}")
}

/// Saving-throw DC to the penalty applied to the equivalent GURPS roll.
///
/// # Examples
///
/// ```rust
/// use gurpsify::numeric::saving_throw_dc_to_offset;
///
/// assert_eq!(saving_throw_dc_to_offset(12), 0);
/// assert_eq!(saving_throw_dc_to_offset(15), 2);
/// assert_eq!(saving_throw_dc_to_offset(21), 5);
/// ```
pub fn saving_throw_dc_to_offset(dc: i64) -> i64 {
    match dc {
        i64::MIN..=12 => 0,
        13 | 14 => 1,
        15 | 16 => 2,
        17 | 18 => 3,
        19 | 20 => 4,
        _ => 5,
    }
}

/// Proficiency-bonus equivalent for a challenge rating.
///
/// Fractional ratings and `0` give `+2`; otherwise `ceil(cr / 4) + 1`.
/// An absent rating also gives `+2`.
///
/// # Errors
///
/// Returns [`ParseError::ChallengeRating`] if the rating is neither one of
/// the fractional forms nor a number.
///
/// # Examples
///
/// ```rust
/// use gurpsify::numeric::proficiency_bonus;
///
/// assert_eq!(proficiency_bonus(None).unwrap(), 2);
/// assert_eq!(proficiency_bonus(Some("1/4")).unwrap(), 2);
/// assert_eq!(proficiency_bonus(Some("5")).unwrap(), 3);
/// assert_eq!(proficiency_bonus(Some("17")).unwrap(), 6);
/// ```
pub fn proficiency_bonus(cr: Option<&str>) -> Result<i64, ParseError> {
    let Some(cr) = cr else {
        return Ok(2);
    };
    match cr.trim() {
        "0" | "1/8" | "1/4" | "1/2" => Ok(2),
        other => {
            let rating: f64 = other
                .parse()
                .map_err(|_| ParseError::ChallengeRating(cr.to_string()))?;
            if !rating.is_finite() {
                return Err(ParseError::ChallengeRating(cr.to_string()));
            }
            Ok((rating / 4.0).ceil() as i64 + 1)
        }
    }
}

/// Parse a signed skill modifier string such as `"+5"` or `"-1"`.
///
/// Every `+` is stripped before parsing.
///
/// # Errors
///
/// Returns [`ParseError::SkillModifier`] naming the skill when the
/// remainder is not an integer.
///
/// # Examples
///
/// ```rust
/// use gurpsify::numeric::parse_skill_modifier;
///
/// assert_eq!(parse_skill_modifier("stealth", "+6").unwrap(), 6);
/// assert_eq!(parse_skill_modifier("stealth", "-1").unwrap(), -1);
/// assert!(parse_skill_modifier("stealth", "+x").is_err());
/// ```
pub fn parse_skill_modifier(skill: &str, value: &str) -> Result<i64, ParseError> {
    value
        .replace('+', "")
        .trim()
        .parse()
        .map_err(|_| ParseError::SkillModifier {
            skill: skill.to_string(),
            value: value.to_string(),
        })
}
