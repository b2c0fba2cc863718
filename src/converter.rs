//! Converter module.
//!
//! Provides the [`Converter`] type, the main entry point for turning a
//! statblock into a character sheet. It owns the template catalog and the
//! ordered rule list.

use crate::catalog::Catalog;
use crate::context::{ConversionContext, ConvertOptions};
use crate::document::OutputDocument;
use crate::error::ConvertError;
use crate::input::InputStatblock;
use crate::report::ConversionReport;
use crate::rules::{self, ConversionRule, SheetBuilder};

/// The finished sheet together with its per-rule breakdown.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: OutputDocument,
    pub report: ConversionReport,
}

/// Runs conversion rules against a baseline sheet.
///
/// The conversion proceeds in two steps:
/// 1. Derive the [`ConversionContext`] (modifiers, proficiency, options)
/// 2. Apply every rule in order, each through its own [`SheetBuilder`]
///
/// The first rule error aborts the conversion and no document is returned.
///
/// # Examples
///
/// ```rust
/// use gurpsify::*;
///
/// let converter = Converter::new().unwrap();
/// let input: InputStatblock = serde_json::from_str(
///     r#"{"name": "Goblin", "dex": 14, "skill": {"stealth": "+6"}, "languages": ["Goblin"]}"#,
/// )
/// .unwrap();
///
/// let conversion = converter
///     .convert(&input, OutputDocument::bundled().unwrap(), ConvertOptions::default())
///     .unwrap();
///
/// assert_eq!(conversion.document.profile.name, "Goblin");
/// assert_eq!(conversion.document.skills[0].name(), Some("Stealth"));
/// assert_eq!(conversion.document.traits[0].name(), Some("Goblin"));
/// ```
pub struct Converter {
    catalog: Catalog,
    rules: Vec<Box<dyn ConversionRule>>,
}

impl Converter {
    /// Bundled catalog and the standard rule sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Catalog`] if the bundled catalog is corrupt.
    pub fn new() -> Result<Self, ConvertError> {
        Ok(Self::with_rules(Catalog::bundled()?, rules::standard()))
    }

    /// A converter running exactly `rules`, in order.
    pub fn with_rules(catalog: Catalog, rules: Vec<Box<dyn ConversionRule>>) -> Self {
        Self { catalog, rules }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Names of the installed rules in execution order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    /// Convert `input` on top of `baseline`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Parse`] when a present field is malformed,
    /// and [`ConvertError::MissingTemplate`] or
    /// [`ConvertError::MissingAttribute`] when the catalog or baseline lacks
    /// an entry a rule needs.
    pub fn convert(
        &self,
        input: &InputStatblock,
        baseline: OutputDocument,
        options: ConvertOptions,
    ) -> Result<Conversion, ConvertError> {
        let ctx = ConversionContext::new(input, options)?;
        tracing::info!(
            creature = ctx.creature_name(),
            proficiency = ctx.proficiency,
            rules = self.rules.len(),
            "converting statblock"
        );

        let mut document = baseline;
        let mut report = ConversionReport::new();
        for rule in &self.rules {
            let mut sheet = SheetBuilder::new(&mut document, &self.catalog);
            let outcome = rule.apply(input, &ctx, &mut sheet).map_err(|err| {
                tracing::error!(rule = rule.name(), error = %err, "rule failed");
                err
            })?;
            let added = sheet.added();
            let gaps = sheet.into_gaps();
            tracing::debug!(
                rule = rule.name(),
                ?outcome,
                added,
                gaps = gaps.len(),
                "rule finished"
            );
            report.add_rule(rule.name(), outcome, added, gaps);
        }

        tracing::info!(
            creature = ctx.creature_name(),
            traits = document.traits.len(),
            skills = document.skills.len(),
            equipment = document.equipment.len(),
            "conversion complete"
        );
        Ok(Conversion { document, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Collection;
    use crate::error::ParseError;
    use crate::rules::RuleOutcome;
    use serde_json::json;

    fn statblock(value: serde_json::Value) -> InputStatblock {
        serde_json::from_value(value).unwrap()
    }

    fn convert(value: serde_json::Value) -> Result<Conversion, ConvertError> {
        Converter::new().unwrap().convert(
            &statblock(value),
            OutputDocument::bundled().unwrap(),
            ConvertOptions::default(),
        )
    }

    #[test]
    fn test_report_follows_rule_order() {
        let converter = Converter::new().unwrap();
        let conversion = convert(json!({})).unwrap();
        let reported: Vec<&str> = conversion
            .report
            .rules
            .iter()
            .map(|r| r.rule.as_str())
            .collect();
        assert_eq!(reported, converter.rule_names().collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_statblock_leaves_baseline() {
        let conversion = convert(json!({})).unwrap();
        let baseline = OutputDocument::bundled().unwrap();
        assert!(conversion
            .report
            .rules
            .iter()
            .all(|r| r.outcome == RuleOutcome::Inapplicable));
        assert_eq!(conversion.document.attributes, baseline.attributes);
        assert!(conversion.document.traits.is_empty());
        assert_eq!(conversion.report.total_added(), 0);
    }

    #[test]
    fn test_bad_challenge_rating_aborts() {
        let err = convert(json!({"cr": "lots"})).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Parse(ParseError::ChallengeRating(ref cr)) if cr == "lots"
        ));
    }

    #[test]
    fn test_bad_skill_modifier_aborts() {
        let err = convert(json!({"skill": {"stealth": "+x"}})).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Parse(ParseError::SkillModifier { .. })
        ));
    }

    #[test]
    fn test_catalog_covers_every_collection() {
        let converter = Converter::new().unwrap();
        for collection in Collection::ALL {
            assert!(
                converter.catalog().keys(collection).next().is_some(),
                "{collection}"
            );
        }
        assert!(converter
            .catalog()
            .template(Collection::Traits, "generic_action")
            .is_some());
    }

    #[test]
    fn test_custom_rule_list() {
        let converter = Converter::with_rules(
            Catalog::bundled().unwrap(),
            vec![Box::new(crate::rules::senses::Languages)],
        );
        let conversion = converter
            .convert(
                &statblock(json!({"languages": ["Draconic"], "con": 20})),
                OutputDocument::bundled().unwrap(),
                ConvertOptions::default(),
            )
            .unwrap();
        assert_eq!(conversion.report.rules.len(), 1);
        assert_eq!(conversion.document.collection(Collection::Traits).len(), 1);
    }
}
