//! # Schema Builder
//!
//! A [`Params`] value is an ordered list of [`Param`] descriptors plus a
//! name index. Order matters: binding walks descriptors front to back and
//! reports the first failure, so the declaration order is the error
//! precedence.
//!
//! Declaring a name twice overwrites the earlier descriptor at its original
//! position. This holds for the builder and for definition files alike.
//!
//! ## Definition Files
//!
//! Schemas (de)serialize through serde, so they can live in YAML or JSON:
//!
//! ```yaml
//! fields:
//!   - name: name
//!     type: string
//!     validate: "required,min=2"
//!     required_on: [create]
//!   - name: tags
//!     type: slice
//!     of: json
//!     schema:
//!       fields:
//!         - { name: label, type: string }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldType;

/// A single field descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Field name; unique within its schema.
    pub name: String,

    /// Declared type. `None` passes the value through unchanged.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    /// Validation tag handed to the rule engine. Empty means no rules.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub validate: String,

    /// Modes on which the field must be present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_on: Vec<String>,

    /// Whether the field was declared with `requires`. Descriptive only;
    /// presence is enforced through `required_on`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    /// Nested schema for `json` objects and `slice` elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<Params>>,

    /// Element type of a `slice` field.
    #[serde(rename = "of", default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<FieldType>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Param {
    /// Creates an untyped descriptor with no rules and no required modes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            validate: String::new(),
            required_on: Vec::new(),
            required: false,
            schema: None,
            element_type: None,
        }
    }

    /// Returns true if `mode` matches one of the (whitespace-trimmed)
    /// required modes.
    pub fn is_required_on(&self, mode: &str) -> bool {
        self.required_on.iter().any(|m| m.trim() == mode)
    }

    /// Returns the nested schema, if any.
    pub fn nested(&self) -> Option<&Params> {
        self.schema.as_deref()
    }
}

/// An ordered, name-indexed field schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParamsDef", into = "ParamsDef")]
pub struct Params {
    fields: Vec<Param>,
    index: HashMap<String, usize>,
}

/// Wire form of [`Params`]: the field list only.
#[derive(Serialize, Deserialize)]
struct ParamsDef {
    #[serde(default)]
    fields: Vec<Param>,
}

impl From<ParamsDef> for Params {
    fn from(def: ParamsDef) -> Self {
        let mut params = Params::new();
        for field in def.fields {
            params.put(field);
        }
        params
    }
}

impl From<Params> for ParamsDef {
    fn from(params: Params) -> Self {
        Self {
            fields: params.fields,
        }
    }
}

impl Params {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field that is mandatory on the modes given to
    /// [`FieldBuilder::on`].
    pub fn requires(&mut self, name: impl Into<String>) -> FieldBuilder<'_> {
        let mut param = Param::new(name);
        param.required = true;
        FieldBuilder {
            param: self.put(param),
        }
    }

    /// Declares an optional field.
    pub fn optional(&mut self, name: impl Into<String>) -> FieldBuilder<'_> {
        FieldBuilder {
            param: self.put(Param::new(name)),
        }
    }

    /// Inserts a descriptor, replacing an existing one with the same name in
    /// place.
    pub fn put(&mut self, param: Param) -> &mut Param {
        let pos = match self.index.get(&param.name) {
            Some(&pos) => {
                self.fields[pos] = param;
                pos
            }
            None => {
                let pos = self.fields.len();
                self.index.insert(param.name.clone(), pos);
                self.fields.push(param);
                pos
            }
        };
        &mut self.fields[pos]
    }

    /// Descriptors in declaration order.
    pub fn fields(&self) -> &[Param] {
        &self.fields
    }

    /// Looks up a descriptor by name.
    pub fn field(&self, name: &str) -> Option<&Param> {
        self.index.get(name).map(|&pos| &self.fields[pos])
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Chained setters for one descriptor. Setters overwrite; the last call
/// wins, except [`FieldBuilder::on`] which appends.
#[derive(Debug)]
pub struct FieldBuilder<'a> {
    param: &'a mut Param,
}

impl<'a> FieldBuilder<'a> {
    /// Appends modes on which the field is mandatory.
    pub fn on<I, S>(self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param
            .required_on
            .extend(modes.into_iter().map(Into::into));
        self
    }

    fn typed(self, ty: FieldType) -> Self {
        self.param.field_type = Some(ty);
        self
    }

    /// Text; the tag is checked against the string.
    pub fn string(self) -> Self {
        self.typed(FieldType::String)
    }

    /// Whole number; decoded floats are truncated toward zero.
    pub fn integer(self) -> Self {
        self.typed(FieldType::Integer)
    }

    /// Floating-point number.
    pub fn float(self) -> Self {
        self.typed(FieldType::Float)
    }

    /// Decimal kept as a string; floats are rendered with ten fractional digits.
    pub fn big_decimal(self) -> Self {
        self.typed(FieldType::BigDecimal)
    }

    /// Float or numeric string, kept as given.
    pub fn numeric(self) -> Self {
        self.typed(FieldType::Numeric)
    }

    /// Date string.
    pub fn date(self) -> Self {
        self.typed(FieldType::Date)
    }

    /// Date-time string.
    pub fn date_time(self) -> Self {
        self.typed(FieldType::DateTime)
    }

    /// Time-of-day string.
    pub fn time(self) -> Self {
        self.typed(FieldType::Time)
    }

    /// Boolean, bound without checking the tag.
    pub fn boolean(self) -> Self {
        self.typed(FieldType::Boolean)
    }

    /// Object, array, or JSON text parsed into one.
    pub fn json(self) -> Self {
        self.typed(FieldType::Json)
    }

    /// Array of any elements. See [`FieldBuilder::slice_of`] for typed elements.
    pub fn slice(self) -> Self {
        self.typed(FieldType::Slice)
    }

    /// Sets the validation tag.
    pub fn validate(self, tag: impl Into<String>) -> Self {
        self.param.validate = tag.into();
        self
    }

    /// Attaches a nested schema.
    pub fn with_schema(self, params: Params) -> Self {
        self.param.schema = Some(Box::new(params));
        self
    }

    /// Declares an array field whose elements have type `element` and are
    /// checked against `params`.
    pub fn slice_of(self, element: FieldType, params: Params) -> Self {
        self.param.field_type = Some(FieldType::Slice);
        self.param.element_type = Some(element);
        self.param.schema = Some(Box::new(params));
        self
    }

    /// Returns the descriptor being built.
    pub fn param(&self) -> &Param {
        &*self.param
    }
}
