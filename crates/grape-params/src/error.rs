//! # Bind Errors
//!
//! Every failure of a bind call is a [`BindError`]. Binding stops at the
//! first failing field, so a call reports exactly one error. Nested schema
//! failures wrap the inner error, which keeps the full path available
//! through [`std::error::Error::source`].

use thiserror::Error;

/// Failure of a single validation tag evaluated by the rule engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A rule segment evaluated to false.
    #[error("value failed on the '{rule}' rule")]
    Failed {
        /// The failing tag segment, e.g. `min=2` or `email|url`.
        rule: String,
    },

    /// The tag names a rule the engine does not know.
    #[error("unknown validation rule '{rule}'")]
    UnknownRule {
        /// The unrecognised rule name.
        rule: String,
    },
}

/// Error returned by a bind call.
#[derive(Error, Debug)]
pub enum BindError {
    /// A field listed as mandatory for the call's mode is absent.
    #[error("missing required field '{field}' for {mode}")]
    MissingRequired {
        /// Name of the absent field.
        field: String,
        /// Mode the call was made with.
        mode: String,
    },

    /// A present field has a value of the wrong shape for its declared type.
    #[error("field '{field}' must be {expected}")]
    WrongType {
        /// Name of the offending field.
        field: String,
        /// Human-readable description of the accepted shapes.
        expected: &'static str,
    },

    /// The field's validation tag rejected the value.
    #[error("field '{field}' validation failed: {source}")]
    RuleFailed {
        /// Name of the offending field.
        field: String,
        /// The rule engine's verdict.
        source: RuleError,
    },

    /// A nested object failed its nested schema.
    #[error("field '{field}' validation failed: {source}")]
    Nested {
        /// Name of the field holding the nested object.
        field: String,
        /// The nested schema's error.
        source: Box<BindError>,
    },

    /// A JSON field was given as a string that is not valid JSON text.
    #[error("field '{field}' must be valid JSON")]
    MalformedJson {
        /// Name of the offending field.
        field: String,
        /// The parser error.
        source: serde_json::Error,
    },

    /// An element of an array-of-objects field is not an object.
    #[error("element in '{field}' must be object")]
    MalformedElement {
        /// Name of the array field.
        field: String,
    },

    /// An element of an array-of-objects field failed its nested schema.
    #[error("element in '{field}' validation failed: {source}")]
    ElementFailed {
        /// Name of the array field.
        field: String,
        /// The nested schema's error for the first failing element.
        source: Box<BindError>,
    },

    /// The request body could not be decoded as a JSON object.
    #[error("invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BindError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } => "MISSING_REQUIRED_FIELD",
            Self::WrongType { .. } => "WRONG_TYPE",
            Self::RuleFailed { .. } | Self::Nested { .. } | Self::ElementFailed { .. } => {
                "VALIDATION_FAILED"
            }
            Self::MalformedJson { .. } => "MALFORMED_JSON",
            Self::MalformedElement { .. } => "MALFORMED_ELEMENT",
            Self::Decode(_) => "DECODE_FAILED",
        }
    }

    /// Top-level field the error is attributed to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { field, .. }
            | Self::WrongType { field, .. }
            | Self::RuleFailed { field, .. }
            | Self::Nested { field, .. }
            | Self::MalformedJson { field, .. }
            | Self::MalformedElement { field }
            | Self::ElementFailed { field, .. } => Some(field),
            Self::Decode(_) => None,
        }
    }
}
