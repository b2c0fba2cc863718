//! # gurpsify - 5e Monster Statblocks to GURPS Character Sheets
//!
//! Converts a 5etools-style monster statblock into a GURPS character sheet
//! in the GCS JSON layout:
//! - **Rule-driven**: each statblock field has its own [`ConversionRule`](rules::ConversionRule)
//! - **Template-based**: skills, traits and equipment come from a bundled catalog
//! - **Annotated**: free text is rewritten into GURPS terms
//! - **Reported**: every rule records what it did and what it could not match
//!
//! ## Core Concepts
//!
//! ### Conversion Pipeline
//!
//! ```text
//! [InputStatblock] → [ConversionContext] → [rules...] → [OutputDocument]
//! ```
//!
//! 1. **Context** derives ability modifiers and proficiency once
//! 2. **Rules** run in a fixed order, each editing the sheet
//! 3. **OutputDocument** is the baseline sheet with every rule's edits
//!
//! ## Example
//!
//! ```rust
//! use gurpsify::*;
//!
//! let input: InputStatblock = serde_json::from_str(
//!     r#"{
//!         "name": "Orc",
//!         "str": 16, "dex": 12, "con": 16, "int": 7, "wis": 11, "cha": 10,
//!         "cr": "1/2",
//!         "skill": {"intimidation": "+2"},
//!         "action": [{"name": "Greataxe", "entries": ["{@atk mw} {@hit 5} to hit."]}]
//!     }"#,
//! )
//! .unwrap();
//!
//! let conversion = convert(&input, ConvertOptions::default()).unwrap();
//! let sheet = &conversion.document;
//!
//! assert_eq!(sheet.profile.name, "Orc");
//! assert_eq!(sheet.attribute("st").unwrap().adj, 3);
//! assert_eq!(sheet.equipment[0].description(), Some("Great Axe"));
//! ```
//!
//! ## Modules
//!
//! - [`converter`] - Main converter
//! - [`rules`] - Conversion rules and the sheet builder
//! - [`annotate`] - Free-text rewriter
//! - [`numeric`] - 5e to GURPS number conversions
//! - [`input`] - Statblock types
//! - [`document`] - Character sheet types
//! - [`catalog`] - Template catalog
//! - [`context`] - Per-conversion derived values
//! - [`report`] - Per-rule conversion report
//! - [`error`] - Error types

pub mod annotate;
pub mod catalog;
pub mod context;
pub mod converter;
pub mod document;
pub mod error;
pub mod input;
pub mod numeric;
pub mod report;
pub mod rules;

// Re-export main types for convenience
pub use catalog::Catalog;
pub use context::{ConversionContext, ConvertOptions};
pub use converter::{Conversion, Converter};
pub use document::{Collection, Entity, OutputDocument};
pub use error::{ConvertError, LoadError, ParseError};
pub use input::InputStatblock;
pub use report::{ConversionReport, RuleReport};

pub use annotate::annotate;

/// Convert `input` with the standard rules onto the bundled baseline sheet.
///
/// # Errors
///
/// See [`Converter::convert`].
pub fn convert(
    input: &InputStatblock,
    options: ConvertOptions,
) -> Result<Conversion, ConvertError> {
    Converter::new()?.convert(input, OutputDocument::bundled()?, options)
}
