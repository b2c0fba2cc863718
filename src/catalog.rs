//! Template catalog.
//!
//! The fixed set of GURPS skills, traits and equipment the rules copy into
//! a sheet. Templates live as JSON under `data/catalog/` and are compiled
//! into the crate. Templates without an `id` receive a fresh one on every
//! instantiation; the few that carry a literal id keep it, so the same
//! conceptual entity shares one id across sheets.

use crate::document::{Collection, Entity};
use crate::error::ConvertError;
use std::collections::BTreeMap;

const SKILLS: &str = include_str!("../data/catalog/skills.json");
const TRAITS: &str = include_str!("../data/catalog/traits.json");
const EQUIPMENT: &str = include_str!("../data/catalog/equipment.json");

/// Read-only lookup of named templates.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    skills: BTreeMap<String, Entity>,
    traits: BTreeMap<String, Entity>,
    equipment: BTreeMap<String, Entity>,
}

impl Catalog {
    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Catalog`] if a bundled file fails to decode.
    pub fn bundled() -> Result<Self, ConvertError> {
        Ok(Self {
            skills: serde_json::from_str(SKILLS).map_err(ConvertError::Catalog)?,
            traits: serde_json::from_str(TRAITS).map_err(ConvertError::Catalog)?,
            equipment: serde_json::from_str(EQUIPMENT).map_err(ConvertError::Catalog)?,
        })
    }

    fn templates(&self, collection: Collection) -> &BTreeMap<String, Entity> {
        match collection {
            Collection::Traits => &self.traits,
            Collection::Skills => &self.skills,
            Collection::Equipment => &self.equipment,
        }
    }

    /// The unmodified template for `key`.
    pub fn template(&self, collection: Collection, key: &str) -> Option<&Entity> {
        self.templates(collection).get(key)
    }

    /// Template keys of a collection, sorted.
    pub fn keys(&self, collection: Collection) -> impl Iterator<Item = &str> {
        self.templates(collection).keys().map(String::as_str)
    }

    /// A copy of the template for `key` with ids filled in.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingTemplate`] if the catalog has no such
    /// template.
    pub fn instantiate(&self, collection: Collection, key: &str) -> Result<Entity, ConvertError> {
        let mut entity = self
            .template(collection, key)
            .cloned()
            .ok_or_else(|| ConvertError::MissingTemplate {
                collection,
                key: key.to_string(),
            })?;
        entity.assign_missing_ids();
        Ok(entity)
    }
}
