//! Conversion report module.
//!
//! Contains the [`ConversionReport`] type, a per-rule breakdown of what a
//! conversion did: which rules fired, how many entities each appended, and
//! which input values had no matching template.

use crate::rules::RuleOutcome;
use serde::{Deserialize, Serialize};

/// What one rule did during a conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleReport {
    /// The rule's name.
    pub rule: String,

    pub outcome: RuleOutcome,

    /// Entities appended to the sheet.
    pub added: usize,

    /// Input values no branch of the rule matched.
    ///
    /// Listed in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gaps: Vec<String>,
}

/// Breakdown of a whole conversion, one entry per rule in execution order.
///
/// # Examples
///
/// ```rust
/// use gurpsify::ConversionReport;
/// use gurpsify::rules::RuleOutcome;
///
/// let mut report = ConversionReport::new();
/// report.add_rule("senses", RuleOutcome::NoMatch, 0, vec!["keen smell".into()]);
/// report.add_rule("languages", RuleOutcome::Applied, 2, Vec::new());
///
/// assert_eq!(report.total_added(), 2);
/// assert_eq!(report.gaps().count(), 1);
/// assert_eq!(report.outcome("senses"), Some(RuleOutcome::NoMatch));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversionReport {
    pub rules: Vec<RuleReport>,
}

impl ConversionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rule's result.
    pub fn add_rule(
        &mut self,
        rule: impl Into<String>,
        outcome: RuleOutcome,
        added: usize,
        gaps: Vec<String>,
    ) {
        self.rules.push(RuleReport {
            rule: rule.into(),
            outcome,
            added,
            gaps,
        });
    }

    /// Outcome of the named rule, if it ran.
    pub fn outcome(&self, rule: &str) -> Option<RuleOutcome> {
        self.rules.iter().find(|r| r.rule == rule).map(|r| r.outcome)
    }

    /// Rules that changed the sheet.
    pub fn applied(&self) -> impl Iterator<Item = &RuleReport> {
        self.rules
            .iter()
            .filter(|r| r.outcome == RuleOutcome::Applied)
    }

    /// Every unmatched value as `(rule, value)`.
    pub fn gaps(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules
            .iter()
            .flat_map(|r| r.gaps.iter().map(move |g| (r.rule.as_str(), g.as_str())))
    }

    pub fn total_added(&self) -> usize {
        self.rules.iter().map(|r| r.added).sum()
    }
}
