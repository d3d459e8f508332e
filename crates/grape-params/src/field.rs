//! Declared field types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a schema field.
///
/// Serialized in lowercase (`"bigdecimal"`, `"datetime"`, ...) so schema
/// definition files read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Text.
    String,
    /// Whole number; JSON floats are truncated toward zero.
    Integer,
    /// Floating-point number.
    Float,
    /// Arbitrary-precision decimal carried as a string.
    BigDecimal,
    /// A number given either as a JSON number or a string.
    Numeric,
    /// Date string.
    Date,
    /// Date-time string.
    DateTime,
    /// Time-of-day string.
    Time,
    /// Boolean.
    Boolean,
    /// Structured JSON: object, array, or JSON text.
    Json,
    /// Array, optionally of nested objects.
    Slice,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 11] = [
        FieldType::String,
        FieldType::Integer,
        FieldType::Float,
        FieldType::BigDecimal,
        FieldType::Numeric,
        FieldType::Date,
        FieldType::DateTime,
        FieldType::Time,
        FieldType::Boolean,
        FieldType::Json,
        FieldType::Slice,
    ];

    /// Returns the lowercase name used in definition files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::BigDecimal => "bigdecimal",
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Boolean => "boolean",
            Self::Json => "json",
            Self::Slice => "slice",
        }
    }

    /// Describes the accepted shapes, as used in type errors.
    pub fn expectation(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::BigDecimal => "bigdecimal (string or float)",
            Self::Numeric => "numeric (float or string)",
            Self::Date => "date string",
            Self::DateTime => "datetime string",
            Self::Time => "time string",
            Self::Boolean => "boolean",
            Self::Json => "json (object, array, or json string)",
            Self::Slice => "array",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_as_str() {
        for ty in FieldType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
            let back: FieldType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, ty);
        }
    }

    #[test]
    fn rejects_unknown_type_name() {
        assert!(serde_json::from_str::<FieldType>("\"uuid\"").is_err());
    }

    #[test]
    fn expectations() {
        assert_eq!(FieldType::Slice.expectation(), "array");
        assert_eq!(FieldType::Date.expectation(), "date string");
        assert_eq!(
            FieldType::Json.expectation(),
            "json (object, array, or json string)"
        );
    }
}
