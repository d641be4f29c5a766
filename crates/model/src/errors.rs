//! Error types for the attribute model.
//!
//! [`AttributeError`] covers conditions raised locally, before any broker
//! traffic happens. Transport and protocol failures are defined in the
//! `broker` crate, which wraps this type.

use thiserror::Error;

/// Errors produced while adding or strictly decoding attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// The caller supplied a native value the model has no wire type for.
    ///
    /// Produced by: [`crate::Attributes::add`]. The attribute set is left
    /// unchanged.
    #[error("unsupported implicit type: {type_name}")]
    UnsupportedType {
        /// Name of the rejected native type (e.g. `"bool"`, `"null"`).
        type_name: &'static str,
    },

    /// A stored value could not be parsed as the requested native type.
    ///
    /// Produced only by the strict accessors ([`crate::Attributes::parse_int`],
    /// [`crate::Attributes::parse_float`]); the lenient accessors return zero.
    #[error("attribute '{name}' of type '{type_tag}' has malformed value '{value}'")]
    Malformed {
        /// Attribute name.
        name: String,
        /// Wire type tag stored with the value.
        type_tag: String,
        /// The stored string that failed to parse.
        value: String,
    },
}
