//! 5etools creature statblock types.
//!
//! These mirror the parts of the 5etools bestiary schema the conversion
//! reads. Every field is optional; an absent field means the rules that
//! read it do not apply. Unknown fields are ignored.

use crate::error::{ConvertError, LoadError, ParseError};
use crate::numeric::parse_skill_modifier;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Read and decode a JSON document from disk.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConvertError> {
    let load = |source: LoadError| ConvertError::ConfigLoad {
        path: path.to_path_buf(),
        source,
    };
    let text = std::fs::read_to_string(path).map_err(|e| load(e.into()))?;
    serde_json::from_str(&text).map_err(|e| load(e.into()))
}

/// A creature statblock in 5etools format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputStatblock {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "str")]
    pub strength: Option<i64>,
    #[serde(default)]
    pub dex: Option<i64>,
    #[serde(default)]
    pub con: Option<i64>,
    #[serde(default, rename = "int")]
    pub intelligence: Option<i64>,
    #[serde(default)]
    pub wis: Option<i64>,
    #[serde(default)]
    pub cha: Option<i64>,
    #[serde(default)]
    pub cr: Option<ChallengeRating>,
    #[serde(default)]
    pub size: Option<Size>,
    /// Skill name to signed modifier, e.g. `"stealth": "+6"`.
    #[serde(default)]
    pub skill: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub ac: Option<Vec<ArmorClass>>,
    #[serde(default)]
    pub resist: Option<Vec<DamageEntry>>,
    #[serde(default)]
    pub immune: Option<Vec<DamageEntry>>,
    #[serde(default, rename = "trait")]
    pub traits: Option<Vec<NamedEntry>>,
    #[serde(default)]
    pub action: Option<Vec<NamedEntry>>,
    #[serde(default)]
    pub legendary: Option<Vec<NamedEntry>>,
    #[serde(default)]
    pub bonus: Option<Vec<NamedEntry>>,
    #[serde(default)]
    pub reaction: Option<Vec<NamedEntry>>,
    #[serde(default)]
    pub spellcasting: Option<Vec<Spellcasting>>,
    #[serde(default)]
    pub senses: Option<Vec<String>>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

impl InputStatblock {
    /// Load a statblock from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ConfigLoad`] if the file is unreadable or
    /// does not decode as a statblock.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        read_json(path.as_ref())
    }

    /// Whether the statblock lists `name` among its skills.
    pub fn has_skill(&self, name: &str) -> bool {
        self.skill.as_ref().is_some_and(|s| s.contains_key(name))
    }

    /// The parsed modifier for a listed skill, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::SkillModifier`] if the skill is present but
    /// its value is not a signed integer.
    pub fn skill_modifier(&self, name: &str) -> Result<Option<i64>, ParseError> {
        let Some(value) = self.skill.as_ref().and_then(|s| s.get(name)) else {
            return Ok(None);
        };
        let malformed = || ParseError::SkillModifier {
            skill: name.to_string(),
            value: value.to_string(),
        };
        match value {
            Value::String(text) => parse_skill_modifier(name, text).map(Some),
            Value::Number(n) => n.as_i64().map(Some).ok_or_else(malformed),
            _ => Err(malformed()),
        }
    }
}

/// Challenge rating: a bare value, or a record carrying one under `cr`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChallengeRating {
    Text(String),
    Number(serde_json::Number),
    Detailed { cr: Box<ChallengeRating> },
}

impl ChallengeRating {
    /// The rating as written, e.g. `"1/4"` or `"5"`.
    pub fn rating(&self) -> String {
        match self {
            ChallengeRating::Text(text) => text.clone(),
            ChallengeRating::Number(n) => n.to_string(),
            ChallengeRating::Detailed { cr } => cr.rating(),
        }
    }
}

/// Size category: a code string or a list of codes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Size {
    Code(String),
    Codes(Vec<String>),
}

impl Size {
    /// First character of the first listed code.
    pub fn code(&self) -> Option<char> {
        let first = match self {
            Size::Code(code) => Some(code.as_str()),
            Size::Codes(codes) => codes.first().map(String::as_str),
        };
        first.and_then(|c| c.chars().next())
    }
}

/// One armor-class entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArmorClass {
    Number(i64),
    Text(String),
    Record(ArmorRecord),
}

/// An armor-class entry that names where the value comes from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArmorRecord {
    #[serde(default)]
    pub ac: Option<i64>,
    #[serde(default)]
    pub from: Option<Vec<String>>,
}

/// One resistance or immunity entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DamageEntry {
    /// A plain damage type such as `"fire"`.
    Plain(String),
    /// A grouped entry such as
    /// `{"resist": ["bludgeoning", "piercing", "slashing"], "note": "..."}`.
    Record(DamageRecord),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DamageRecord {
    #[serde(default)]
    pub resist: Option<Vec<Value>>,
    #[serde(default)]
    pub immune: Option<Vec<Value>>,
    #[serde(default)]
    pub note: Option<String>,
}

impl DamageRecord {
    /// Whether `list` names every one of `types` as a plain string.
    pub fn lists_all(list: Option<&[Value]>, types: &[&str]) -> bool {
        let Some(list) = list else {
            return false;
        };
        types
            .iter()
            .all(|t| list.iter().any(|v| v.as_str() == Some(*t)))
    }
}

/// A named trait or action with its description entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedEntry {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<Value>,
}

impl NamedEntry {
    /// The first entry when it is plain text.
    pub fn description(&self) -> Option<&str> {
        self.entries.first().and_then(Value::as_str)
    }
}

/// A spellcasting block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spellcasting {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub header_entries: Vec<String>,
    /// Spells usable at will.
    #[serde(default)]
    pub will: Option<Vec<SpellEntry>>,
    /// Uses-per-day key (`"1"`, `"1e"`, ...) to spells.
    #[serde(default)]
    pub daily: Option<BTreeMap<String, Vec<SpellEntry>>>,
    /// Spell level (`"0"` to `"9"`) to the spells known at that level.
    #[serde(default)]
    pub spells: Option<BTreeMap<String, SpellLevel>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpellLevel {
    #[serde(default)]
    pub slots: Option<i64>,
    #[serde(default)]
    pub spells: Vec<SpellEntry>,
}

/// One spell in a spell list: a bare tag, or a record such as
/// `{"entry": "{@spell invisibility}", "hidden": true}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SpellEntry {
    Text(String),
    Record { entry: String },
}

impl SpellEntry {
    pub fn text(&self) -> &str {
        match self {
            SpellEntry::Text(text) => text,
            SpellEntry::Record { entry } => entry,
        }
    }

    /// Comma-joined text of every entry in `spells`.
    pub fn join(spells: &[SpellEntry]) -> String {
        spells
            .iter()
            .map(SpellEntry::text)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn statblock(value: Value) -> InputStatblock {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_statblock_has_no_fields() {
        let input = statblock(json!({}));
        assert!(input.name.is_none());
        assert!(input.ac.is_none());
        assert!(!input.has_skill("stealth"));
        assert_eq!(input.skill_modifier("stealth").unwrap(), None);
    }

    #[test]
    fn test_challenge_rating_shapes() {
        let text = statblock(json!({"cr": "1/4"}));
        assert_eq!(text.cr.unwrap().rating(), "1/4");
        let number = statblock(json!({"cr": 5}));
        assert_eq!(number.cr.unwrap().rating(), "5");
        let detailed = statblock(json!({"cr": {"cr": "10", "lair": "11"}}));
        assert_eq!(detailed.cr.unwrap().rating(), "10");
    }

    #[test]
    fn test_size_code() {
        assert_eq!(statblock(json!({"size": ["L"]})).size.unwrap().code(), Some('L'));
        assert_eq!(statblock(json!({"size": "Huge"})).size.unwrap().code(), Some('H'));
        assert_eq!(statblock(json!({"size": []})).size.unwrap().code(), None);
    }

    #[test]
    fn test_armor_class_shapes() {
        let input = statblock(json!({
            "ac": [12, "special", {"ac": 15, "from": ["natural armor"]}, {"special": "varies"}]
        }));
        let ac = input.ac.unwrap();
        assert_eq!(ac[0], ArmorClass::Number(12));
        assert_eq!(ac[1], ArmorClass::Text("special".to_string()));
        assert_eq!(
            ac[2],
            ArmorClass::Record(ArmorRecord {
                ac: Some(15),
                from: Some(vec!["natural armor".to_string()]),
            })
        );
        assert_eq!(ac[3], ArmorClass::Record(ArmorRecord { ac: None, from: None }));
    }

    #[test]
    fn test_damage_entries() {
        let input = statblock(json!({
            "resist": [
                "cold",
                {
                    "resist": ["bludgeoning", "piercing", "slashing"],
                    "note": "from nonmagical attacks"
                }
            ]
        }));
        let resist = input.resist.unwrap();
        assert_eq!(resist[0], DamageEntry::Plain("cold".to_string()));
        let DamageEntry::Record(record) = &resist[1] else {
            panic!("expected a record");
        };
        assert!(DamageRecord::lists_all(
            record.resist.as_deref(),
            &["bludgeoning", "piercing", "slashing"]
        ));
        assert!(!DamageRecord::lists_all(record.immune.as_deref(), &["slashing"]));
    }

    #[test]
    fn test_skill_modifier_parsing() {
        let input = statblock(json!({
            "skill": {"stealth": "+6", "perception": 3, "athletics": "strong"}
        }));
        assert_eq!(input.skill_modifier("stealth").unwrap(), Some(6));
        assert_eq!(input.skill_modifier("perception").unwrap(), Some(3));
        assert!(matches!(
            input.skill_modifier("athletics"),
            Err(ParseError::SkillModifier { .. })
        ));
    }

    #[test]
    fn test_spellcasting_fields() {
        let input = statblock(json!({
            "spellcasting": [{
                "name": "Innate Spellcasting",
                "headerEntries": ["The drow's innate spellcasting ability is Charisma."],
                "will": ["{@spell dancing lights}"],
                "daily": {"1e": ["{@spell darkness}", "{@spell faerie fire}"]}
            }]
        }));
        let casting = &input.spellcasting.unwrap()[0];
        assert_eq!(casting.header_entries.len(), 1);
        assert_eq!(casting.daily.as_ref().unwrap()["1e"].len(), 2);
        assert!(casting.spells.is_none());
    }

    #[test]
    fn test_spell_entries_accept_records() {
        let input = statblock(json!({
            "spellcasting": [{
                "will": [
                    "{@spell mage hand}",
                    {"entry": "{@spell dancing lights}", "hidden": true}
                ],
                "spells": {"1": {"spells": [{"entry": "{@spell shield}"}]}}
            }]
        }));
        let casting = &input.spellcasting.unwrap()[0];
        let will = casting.will.as_deref().unwrap();
        assert_eq!(will[1].text(), "{@spell dancing lights}");
        assert_eq!(
            SpellEntry::join(will),
            "{@spell mage hand}, {@spell dancing lights}"
        );
        assert_eq!(
            casting.spells.as_ref().unwrap()["1"].spells[0].text(),
            "{@spell shield}"
        );
    }

    #[test]
    fn test_named_entry_description() {
        let entry: NamedEntry = serde_json::from_value(json!({
            "name": "Multiattack",
            "entries": [{"type": "list", "items": []}]
        }))
        .unwrap();
        assert_eq!(entry.description(), None);
    }
}
