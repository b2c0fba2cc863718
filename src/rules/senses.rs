//! Sense and language rules.

use super::{ConversionRule, RuleOutcome, SheetBuilder};
use crate::context::ConversionContext;
use crate::document::Collection;
use crate::error::ConvertError;
use crate::input::InputStatblock;

/// Sense keyword and the trait it grants. First match wins.
pub const SENSE_TRAITS: [(&str, &str); 5] = [
    ("darkvision", "dark_vision"),
    ("blindsight", "blindsight"),
    ("tremor", "tremorsense"),
    ("true", "true_sight"),
    ("devil", "devils_sight"),
];

/// One trait per recognized special sense.
pub struct Senses;

impl ConversionRule for Senses {
    fn name(&self) -> &str {
        "senses"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let senses = match &input.senses {
            Some(senses) if !senses.is_empty() => senses,
            _ => return Ok(RuleOutcome::Inapplicable),
        };
        for sense in senses {
            let lowered = sense.to_lowercase();
            match SENSE_TRAITS.iter().find(|(keyword, _)| lowered.contains(keyword)) {
                Some((_, key)) => sheet.add(Collection::Traits, key)?,
                None => sheet.gap(sense.clone()),
            }
        }
        Ok(sheet.settle())
    }
}

/// One language trait per spoken language.
pub struct Languages;

impl ConversionRule for Languages {
    fn name(&self) -> &str {
        "languages"
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let languages = match &input.languages {
            Some(languages) if !languages.is_empty() => languages,
            _ => return Ok(RuleOutcome::Inapplicable),
        };
        for language in languages {
            let mut entity = sheet.template(Collection::Traits, "language")?;
            entity.set_name(language.as_str());
            sheet.push(Collection::Traits, entity);
        }
        Ok(RuleOutcome::Applied)
    }
}
