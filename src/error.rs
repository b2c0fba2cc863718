//! Error types for statblock conversion.
//!
//! Two layers of failure exist:
//!
//! - [`ParseError`]: a present input field does not match the sub-format
//!   the rules need (a dice expression without a `d`, a skill modifier that
//!   is not a signed integer). Always fatal for the conversion.
//! - [`ConvertError`]: everything that can abort a conversion, including
//!   loading the input and baseline documents and writing the result.
//!
//! Unmatched values inside a recognized field are not errors. They are
//! reported as lookup gaps on the [`ConversionReport`](crate::report::ConversionReport).

use crate::document::Collection;
use std::path::PathBuf;
use thiserror::Error;

/// A present input field did not match its expected sub-format.
///
/// # Examples
///
/// ```rust
/// use gurpsify::ParseError;
///
/// let err = ParseError::DiceExpression("2x6".to_string());
/// assert_eq!(err.to_string(), "Invalid dice expression: 2x6");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// A dice expression was not of the form `XdY` or `XdY + Z`.
    #[error("Invalid dice expression: {0}")]
    DiceExpression(String),

    /// A skill modifier string was not a signed integer.
    #[error("Invalid modifier for skill {skill}: {value:?}")]
    SkillModifier { skill: String, value: String },

    /// An embedded `{@hit N}` tag did not carry an integer.
    #[error("Invalid attack bonus: {0:?}")]
    AttackBonus(String),

    /// An embedded `{@dc N}` tag did not carry an integer.
    #[error("Invalid saving throw DC: {0:?}")]
    SavingThrowDc(String),

    /// The challenge rating could not be read as a number or fraction.
    #[error("Invalid challenge rating: {0:?}")]
    ChallengeRating(String),
}

/// Why a JSON document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The file was read but is not valid JSON for its schema.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a conversion.
///
/// No partial output is ever produced: a conversion either returns a
/// complete document or one of these.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input statblock or baseline document could not be loaded.
    #[error("Failed to load {}: {source}", .path.display())]
    ConfigLoad {
        /// Path of the document that failed to load.
        path: PathBuf,
        /// The underlying I/O or decoding failure.
        #[source]
        source: LoadError,
    },

    /// A present input field was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A rule referenced a template that the catalog does not contain.
    #[error("No {collection} template named {key:?} in the catalog")]
    MissingTemplate {
        /// Collection the template was expected in.
        collection: Collection,
        /// Catalog key that failed to resolve.
        key: String,
    },

    /// The bundled template catalog could not be decoded.
    #[error("Template catalog is invalid: {0}")]
    Catalog(#[source] serde_json::Error),

    /// The baseline document has no attribute with the requested id.
    #[error("Baseline document has no attribute {0:?}")]
    MissingAttribute(String),

    /// The output document could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The output document could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
