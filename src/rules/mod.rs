//! Conversion rules.
//!
//! A conversion is an ordered list of [`ConversionRule`]s. Each rule reads
//! the raw statblock and the shared [`ConversionContext`], then edits the
//! sheet through a [`SheetBuilder`]: setting profile and attribute fields,
//! or appending catalog templates with fresh ids. Rules never read what
//! earlier rules wrote.
//!
//! Every rule reports a typed [`RuleOutcome`], separating "field absent"
//! from "field present but nothing matched". A malformed present field is
//! an `Err` and aborts the conversion.
//!
//! # Examples
//!
//! ```rust
//! use gurpsify::rules::{ConversionRule, RuleOutcome, SheetBuilder};
//! use gurpsify::{ConversionContext, ConvertError, InputStatblock};
//!
//! /// Marks every creature as a legend.
//! struct Legendary;
//!
//! impl ConversionRule for Legendary {
//!     fn name(&self) -> &str {
//!         "legendary title"
//!     }
//!
//!     fn apply(
//!         &self,
//!         _input: &InputStatblock,
//!         _ctx: &ConversionContext,
//!         sheet: &mut SheetBuilder<'_>,
//!     ) -> Result<RuleOutcome, ConvertError> {
//!         sheet.document_mut().profile.extra.insert("title".into(), "Legend".into());
//!         Ok(RuleOutcome::Applied)
//!     }
//! }
//! ```

pub mod actions;
pub mod armor;
pub mod attributes;
pub mod defenses;
pub mod senses;
pub mod skills;
pub mod traits;

use crate::catalog::Catalog;
use crate::context::ConversionContext;
use crate::document::{Collection, Entity, OutputDocument};
use crate::error::ConvertError;
use crate::input::InputStatblock;
use serde::{Deserialize, Serialize};

/// What a rule did with its input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    /// Nothing to do: the field the rule reads is absent, or its value is
    /// below the rule's threshold.
    Inapplicable,
    /// The rule changed the sheet.
    Applied,
    /// The field is present but no branch of the rule matched it.
    NoMatch,
}

/// A single step of the conversion.
pub trait ConversionRule: Send + Sync {
    /// Short name used in logs and the conversion report.
    fn name(&self) -> &str;

    /// Apply the rule to the sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if a present input field is malformed or a
    /// referenced template is missing from the catalog.
    fn apply(
        &self,
        input: &InputStatblock,
        ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError>;
}

/// Exclusive write access to the sheet for one rule.
///
/// Tracks how many entities the rule appended and which input values it
/// could not match.
pub struct SheetBuilder<'a> {
    document: &'a mut OutputDocument,
    catalog: &'a Catalog,
    added: usize,
    gaps: Vec<String>,
}

impl<'a> SheetBuilder<'a> {
    pub fn new(document: &'a mut OutputDocument, catalog: &'a Catalog) -> Self {
        Self {
            document,
            catalog,
            added: 0,
            gaps: Vec::new(),
        }
    }

    pub fn document(&self) -> &OutputDocument {
        &*self.document
    }

    pub fn document_mut(&mut self) -> &mut OutputDocument {
        &mut *self.document
    }

    /// A fresh copy of a catalog template, not yet on the sheet.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingTemplate`] for an unknown key.
    pub fn template(&self, collection: Collection, key: &str) -> Result<Entity, ConvertError> {
        self.catalog.instantiate(collection, key)
    }

    /// Append an entity to a collection.
    pub fn push(&mut self, collection: Collection, entity: Entity) {
        self.document.push(collection, entity);
        self.added += 1;
    }

    /// Append a catalog template unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingTemplate`] for an unknown key.
    pub fn add(&mut self, collection: Collection, key: &str) -> Result<(), ConvertError> {
        let entity = self.template(collection, key)?;
        self.push(collection, entity);
        Ok(())
    }

    /// Append a catalog skill at the given point cost.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingTemplate`] for an unknown key.
    pub fn add_skill(&mut self, key: &str, points: i64) -> Result<(), ConvertError> {
        let mut skill = self.template(Collection::Skills, key)?;
        skill.set_points(points);
        self.push(Collection::Skills, skill);
        Ok(())
    }

    /// Record an input value that no branch of the rule recognized.
    pub fn gap(&mut self, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(value = %value, "no template matched");
        self.gaps.push(value);
    }

    /// Number of entities appended so far.
    pub fn added(&self) -> usize {
        self.added
    }

    /// `Applied` if anything was appended, otherwise `NoMatch`.
    pub fn settle(&self) -> RuleOutcome {
        if self.added > 0 {
            RuleOutcome::Applied
        } else {
            RuleOutcome::NoMatch
        }
    }

    /// Unmatched values, consuming the builder.
    pub fn into_gaps(self) -> Vec<String> {
        self.gaps
    }
}

/// The standard rule sequence, in execution order.
pub fn standard() -> Vec<Box<dyn ConversionRule>> {
    vec![
        Box::new(attributes::Identity),
        Box::new(attributes::Attributes),
        Box::new(attributes::HighPainThreshold),
        Box::new(skills::CharismaDefaults),
        Box::new(attributes::SizeCategory),
        Box::new(skills::SkillUnlocks::standard()),
        Box::new(traits::BattleHardened),
        Box::new(armor::ArmorEquipment),
        Box::new(defenses::DamageDefenses::resistances()),
        Box::new(defenses::DamageDefenses::immunities()),
        Box::new(traits::Traits),
        Box::new(traits::SpellcastingTrait),
        Box::new(actions::Actions::standard()),
        Box::new(actions::EconomyActions::new(actions::Economy::Legendary)),
        Box::new(actions::EconomyActions::new(actions::Economy::Bonus)),
        Box::new(actions::EconomyActions::new(actions::Economy::Reaction)),
        Box::new(senses::Senses),
        Box::new(senses::Languages),
    ]
}
