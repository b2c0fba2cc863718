//! Damage resistance and immunity rules.

use super::{ConversionRule, RuleOutcome, SheetBuilder};
use crate::context::ConversionContext;
use crate::document::Collection;
use crate::error::ConvertError;
use crate::input::{DamageEntry, DamageRecord, InputStatblock};

/// The three physical damage types.
const PHYSICAL: [&str; 3] = ["bludgeoning", "piercing", "slashing"];

/// A 5e damage type and its GURPS label for each kind of defense.
struct DamageType {
    keyword: &'static str,
    resist_label: &'static str,
    immune_label: &'static str,
}

const fn same(keyword: &'static str, label: &'static str) -> DamageType {
    DamageType {
        keyword,
        resist_label: label,
        immune_label: label,
    }
}

/// Checked in order; the first keyword found in an entry wins.
const DAMAGE_TYPES: [DamageType; 13] = [
    same("cold", "Cold"),
    same("fire", "Fire"),
    same("poison", "Poison"),
    same("acid", "Acid"),
    same("lightning", "Lightning"),
    same("necrotic", "Necrotic"),
    same("radiant", "Radiant"),
    same("thunder", "Thunder"),
    same("force", "Force"),
    same("psychic", "Psychic"),
    same("bludgeoning", "Crushing"),
    DamageType {
        keyword: "piercing",
        resist_label: "Impaling and Piercing",
        immune_label: "Piercing and Impaling",
    },
    same("slashing", "Cutting"),
];

/// Resistance or immunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefenseKind {
    Resistance,
    Immunity,
}

impl DefenseKind {
    fn trait_key(self) -> &'static str {
        match self {
            DefenseKind::Resistance => "half_damage",
            DefenseKind::Immunity => "damage_immunity",
        }
    }

    fn label(self, damage: &DamageType) -> &'static str {
        match self {
            DefenseKind::Resistance => damage.resist_label,
            DefenseKind::Immunity => damage.immune_label,
        }
    }

    /// Note for physical damage from nonmagical weapons.
    fn nonmagical_note(self) -> &'static str {
        match self {
            DefenseKind::Resistance => {
                "Limited (Crushing, Impaling, Piercing, and Cutting From Nonmagical Weapons)"
            }
            DefenseKind::Immunity => {
                "Limited (Crushing, Piercing, Impaling, and Cutting From Nonmagical Weapons)"
            }
        }
    }

    /// The statblock list this kind reads.
    fn entries(self, input: &InputStatblock) -> Option<&[DamageEntry]> {
        match self {
            DefenseKind::Resistance => input.resist.as_deref(),
            DefenseKind::Immunity => input.immune.as_deref(),
        }
    }

    /// The list inside a grouped record that belongs to this kind.
    fn record_list(self, record: &DamageRecord) -> Option<&[serde_json::Value]> {
        match self {
            DefenseKind::Resistance => record.resist.as_deref(),
            DefenseKind::Immunity => record.immune.as_deref(),
        }
    }
}

/// Adds a limited damage resistance or immunity trait per entry.
pub struct DamageDefenses {
    kind: DefenseKind,
}

impl DamageDefenses {
    pub fn new(kind: DefenseKind) -> Self {
        Self { kind }
    }

    pub fn resistances() -> Self {
        Self::new(DefenseKind::Resistance)
    }

    pub fn immunities() -> Self {
        Self::new(DefenseKind::Immunity)
    }

    fn note_for(&self, entry: &DamageEntry) -> Option<String> {
        match entry {
            DamageEntry::Plain(text) => {
                let text = text.to_lowercase();
                DAMAGE_TYPES
                    .iter()
                    .find(|d| text.contains(d.keyword))
                    .map(|d| format!("Limited ({})", self.kind.label(d)))
            }
            DamageEntry::Record(record) => {
                DamageRecord::lists_all(self.kind.record_list(record), &PHYSICAL)
                    .then(|| self.kind.nonmagical_note().to_string())
            }
        }
    }
}

impl ConversionRule for DamageDefenses {
    fn name(&self) -> &str {
        match self.kind {
            DefenseKind::Resistance => "resistances",
            DefenseKind::Immunity => "immunities",
        }
    }

    fn apply(
        &self,
        input: &InputStatblock,
        _ctx: &ConversionContext,
        sheet: &mut SheetBuilder<'_>,
    ) -> Result<RuleOutcome, ConvertError> {
        let Some(entries) = self.kind.entries(input) else {
            return Ok(RuleOutcome::Inapplicable);
        };
        for entry in entries {
            match self.note_for(entry) {
                Some(note) => {
                    let mut defense = sheet.template(Collection::Traits, self.kind.trait_key())?;
                    defense.set_notes(note);
                    sheet.push(Collection::Traits, defense);
                }
                None => sheet.gap(describe(entry)),
            }
        }
        Ok(sheet.settle())
    }
}

fn describe(entry: &DamageEntry) -> String {
    match entry {
        DamageEntry::Plain(text) => text.clone(),
        DamageEntry::Record(record) => {
            let types: Vec<String> = record
                .resist
                .iter()
                .chain(record.immune.iter())
                .flatten()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect();
            types.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConvertOptions;
    use crate::rules::test_support::{labels, run};
    use serde_json::json;

    fn notes(doc: &crate::document::OutputDocument) -> Vec<String> {
        doc.traits
            .iter()
            .map(|t| t.notes().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_plain_resistances() {
        let input = json!({"resist": ["cold", "piercing", "slashing"]});
        let (outcome, doc, _) = run(
            &DamageDefenses::resistances(),
            input,
            ConvertOptions::default(),
        );
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert_eq!(
            notes(&doc),
            [
                "Limited (Cold)",
                "Limited (Impaling and Piercing)",
                "Limited (Cutting)"
            ]
        );
        assert!(labels(&doc, Collection::Traits)
            .iter()
            .all(|l| l == "Damage Resistance (0.5x)"));
    }

    #[test]
    fn test_plain_immunities() {
        let input = json!({"immune": ["poison", "piercing"]});
        let (_, doc, _) = run(&DamageDefenses::immunities(), input, ConvertOptions::default());
        assert_eq!(
            notes(&doc),
            ["Limited (Poison)", "Limited (Piercing and Impaling)"]
        );
        assert_eq!(doc.traits[0].name(), Some("Damage Immunity"));
        assert_eq!(doc.traits[0].get("base_points"), Some(&json!(50)));
    }

    #[test]
    fn test_priority_order_first_keyword_wins() {
        // Table order decides, not position in the text.
        let input = json!({"resist": ["fire and cold"]});
        let (_, doc, _) = run(&DamageDefenses::resistances(), input, ConvertOptions::default());
        assert_eq!(notes(&doc), ["Limited (Cold)"]);
    }

    #[test]
    fn test_nonmagical_physical_resistance() {
        let input = json!({"resist": [{
            "resist": ["bludgeoning", "piercing", "slashing"],
            "note": "from nonmagical attacks",
            "cond": true
        }]});
        let (_, doc, _) = run(&DamageDefenses::resistances(), input, ConvertOptions::default());
        assert_eq!(
            notes(&doc),
            ["Limited (Crushing, Impaling, Piercing, and Cutting From Nonmagical Weapons)"]
        );
    }

    #[test]
    fn test_nonmagical_physical_immunity_reads_immune_list() {
        let input = json!({"immune": [{
            "immune": ["bludgeoning", "piercing", "slashing"],
            "note": "from nonmagical attacks",
            "cond": true
        }]});
        let (outcome, doc, _) = run(
            &DamageDefenses::immunities(),
            input,
            ConvertOptions::default(),
        );
        assert_eq!(outcome.unwrap(), RuleOutcome::Applied);
        assert_eq!(
            notes(&doc),
            ["Limited (Crushing, Piercing, Impaling, and Cutting From Nonmagical Weapons)"]
        );
    }

    #[test]
    fn test_partial_physical_record_is_a_gap() {
        let input = json!({"resist": [{"resist": ["piercing", "slashing"], "note": "x"}]});
        let (outcome, doc, gaps) =
            run(&DamageDefenses::resistances(), input, ConvertOptions::default());
        assert_eq!(outcome.unwrap(), RuleOutcome::NoMatch);
        assert!(doc.traits.is_empty());
        assert_eq!(gaps, ["piercing, slashing"]);
    }

    #[test]
    fn test_absent_list_is_inapplicable() {
        let (outcome, _, _) = run(
            &DamageDefenses::immunities(),
            json!({"resist": ["fire"]}),
            ConvertOptions::default(),
        );
        assert_eq!(outcome.unwrap(), RuleOutcome::Inapplicable);
    }
}
