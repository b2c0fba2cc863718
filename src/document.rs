//! GURPS character-sheet document.
//!
//! [`OutputDocument`] is seeded from a baseline sheet and then mutated by
//! the conversion rules. Only the parts the rules touch are typed: the
//! profile, the attribute list and the three entity collections. Every
//! other field of the baseline is carried through untouched.

use crate::error::{ConvertError, LoadError};
use crate::input::read_json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Baseline sheet compiled into the crate.
const BUNDLED_BASELINE: &str = include_str!("../data/default.json");

/// The three append-only entity collections of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Traits,
    Skills,
    Equipment,
}

impl Collection {
    /// All collections, in sheet order.
    pub const ALL: [Collection; 3] = [
        Collection::Traits,
        Collection::Skills,
        Collection::Equipment,
    ];
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Traits => "trait",
            Collection::Skills => "skill",
            Collection::Equipment => "equipment",
        };
        f.write_str(name)
    }
}

/// A complete character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub profile: Profile,
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub traits: Vec<Entity>,
    #[serde(default)]
    pub skills: Vec<Entity>,
    #[serde(default)]
    pub equipment: Vec<Entity>,
    /// Baseline fields the conversion does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sheet profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    /// Size modifier.
    #[serde(rename = "SM", default)]
    pub size_modifier: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One attribute slot, such as `st` or `hp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub attr_id: String,
    #[serde(default)]
    pub adj: i64,
    #[serde(default)]
    pub calc: AttributeCalc,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeCalc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attribute {
    /// Set the attribute from an ability modifier.
    ///
    /// The adjustment becomes `modifier`, the value `10 + modifier`, and the
    /// cost `modifier * points_per_level`.
    pub fn set_from_modifier(&mut self, modifier: i64, points_per_level: i64) {
        self.adj = modifier;
        self.calc.value = Some(Number::from(10 + modifier));
        self.calc.points = Some(modifier * points_per_level);
    }
}

/// A trait, skill or equipment record.
///
/// Kept as an ordered JSON object so template fields survive verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Map<String, Value>);

impl Entity {
    /// The entity's identifier, when it has one.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// The `name` field (traits and skills).
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// The `description` field (equipment).
    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn notes(&self) -> Option<&str> {
        self.str_field("notes")
    }

    /// A string field by key.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Any field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field. Existing keys keep their position.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set("name", name.into());
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.set("notes", notes.into());
    }

    pub fn set_points(&mut self, points: i64) {
        self.set("points", points);
    }

    pub fn set_levels(&mut self, levels: i64) {
        self.set("levels", levels);
    }

    /// Give this entity and each of its nested `weapons` a fresh random id
    /// where none is present. Literal ids are left untouched.
    pub fn assign_missing_ids(&mut self) {
        with_id(&mut self.0);
        if let Some(Value::Array(weapons)) = self.0.get_mut("weapons") {
            for weapon in weapons.iter_mut() {
                if let Value::Object(fields) = weapon {
                    with_id(fields);
                }
            }
        }
    }

    /// Ids of this entity and its nested weapons.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.id().into_iter().collect();
        if let Some(Value::Array(weapons)) = self.0.get("weapons") {
            ids.extend(
                weapons
                    .iter()
                    .filter_map(|w| w.get("id").and_then(Value::as_str)),
            );
        }
        ids
    }
}

/// Prepend a fresh `id` to `fields` unless one is already present.
fn with_id(fields: &mut Map<String, Value>) {
    if fields.contains_key("id") {
        return;
    }
    let mut ordered = Map::with_capacity(fields.len() + 1);
    ordered.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    ordered.append(fields);
    *fields = ordered;
}

impl OutputDocument {
    /// The baseline sheet bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ConfigLoad`] if the bundled sheet fails to
    /// decode.
    pub fn bundled() -> Result<Self, ConvertError> {
        serde_json::from_str(BUNDLED_BASELINE).map_err(|e| ConvertError::ConfigLoad {
            path: PathBuf::from("data/default.json"),
            source: LoadError::Json(e),
        })
    }

    /// Load a baseline sheet from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ConfigLoad`] if the file is unreadable or is
    /// not a sheet.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        read_json(path.as_ref())
    }

    /// Look up an attribute by its `attr_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingAttribute`] if the sheet has no such
    /// attribute.
    pub fn attribute_mut(&mut self, attr_id: &str) -> Result<&mut Attribute, ConvertError> {
        self.attributes
            .iter_mut()
            .find(|a| a.attr_id == attr_id)
            .ok_or_else(|| ConvertError::MissingAttribute(attr_id.to_string()))
    }

    pub fn attribute(&self, attr_id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.attr_id == attr_id)
    }

    pub fn collection(&self, collection: Collection) -> &[Entity] {
        match collection {
            Collection::Traits => &self.traits,
            Collection::Skills => &self.skills,
            Collection::Equipment => &self.equipment,
        }
    }

    /// Append an entity to a collection.
    pub fn push(&mut self, collection: Collection, entity: Entity) {
        match collection {
            Collection::Traits => self.traits.push(entity),
            Collection::Skills => self.skills.push(entity),
            Collection::Equipment => self.equipment.push(entity),
        }
    }

    /// Every appended entity across the three collections.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        Collection::ALL
            .into_iter()
            .flat_map(move |collection| self.collection(collection))
    }

    /// Serialize as pretty-printed JSON with four-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Serialize`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ConvertError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser).map_err(ConvertError::Serialize)?;
        // serde_json only ever emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the sheet to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Serialize`] or [`ConvertError::Write`].
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ConvertError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| ConvertError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
