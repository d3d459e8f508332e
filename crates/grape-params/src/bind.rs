//! # Bind/Validate Engine
//!
//! Walks a [`Params`] schema over an untyped input map for one mode.
//!
//! ## Algorithm
//!
//! For each descriptor, in declaration order:
//!
//! 1. If the key is absent: fail with [`BindError::MissingRequired`] when the
//!    mode is one of the descriptor's required modes, otherwise skip it.
//! 2. If present: coerce the value according to the declared type and apply
//!    the validation tag. The first failure aborts the call.
//! 3. Nested objects are normalized through a JSON round trip and bound
//!    against the nested schema with the same mode into an isolated map.
//!
//! Afterwards every input key not already in the output is copied over
//! unchanged (passthrough).
//!
//! ## Coercions
//!
//! | type | accepted | stored |
//! |---|---|---|
//! | string, date, datetime, time | string | as given |
//! | integer | float or int | int, floats truncated toward zero (tag checked on floats only) |
//! | float | float | as given |
//! | bigdecimal | string or float | string; floats as `%.10f`, no tag |
//! | numeric | float or string | as given |
//! | boolean | bool | as given, no tag |
//! | json | object, array, JSON text | object bound against nested schema, text parsed |
//! | slice | array | objects bound against nested schema when `of: json` |

use std::io::Read;

use grape_core::{Map, Value};

use crate::error::BindError;
use crate::field::FieldType;
use crate::input::Input;
use crate::rules::RuleEngine;
use crate::schema::{Param, Params};

impl Params {
    /// Binds and validates `raw` for `mode` with the process-wide rule
    /// engine.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] in schema order.
    pub fn bind_and_validate(&self, raw: &Map, mode: &str) -> Result<Input, BindError> {
        self.bind_and_validate_with(RuleEngine::global(), raw, mode)
    }

    /// Binds and validates `raw` for `mode` with a caller-provided rule
    /// engine.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] in schema order.
    pub fn bind_and_validate_with(
        &self,
        rules: &RuleEngine,
        raw: &Map,
        mode: &str,
    ) -> Result<Input, BindError> {
        match bind_object(self, rules, raw, mode) {
            Ok(out) => Ok(Input::from(out)),
            Err(err) => {
                tracing::debug!(
                    mode,
                    field = err.field().unwrap_or_default(),
                    code = err.code(),
                    error = %err,
                    "request parameters rejected"
                );
                Err(err)
            }
        }
    }

    /// Decodes the first JSON object from `reader`, then binds it like
    /// [`Params::bind_and_validate`]. Anything after that object is ignored.
    ///
    /// # Errors
    ///
    /// [`BindError::Decode`] when the reader does not hold a JSON object;
    /// otherwise the first bind failure.
    pub fn bind_and_validate_reader<R: Read>(
        &self,
        reader: R,
        mode: &str,
    ) -> Result<Input, BindError> {
        let first = serde_json::Deserializer::from_reader(reader)
            .into_iter::<Map>()
            .next()
            .unwrap_or_else(|| Err(serde::de::Error::custom("empty request body")));
        let raw = match first {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(mode, error = %err, "request body is not a JSON object");
                return Err(BindError::Decode(err));
            }
        };
        self.bind_and_validate(&raw, mode)
    }
}

fn bind_object(
    params: &Params,
    rules: &RuleEngine,
    raw: &Map,
    mode: &str,
) -> Result<Map, BindError> {
    let mut out = Map::new();

    for param in params.fields() {
        let Some(value) = raw.get(&param.name) else {
            if param.is_required_on(mode) {
                return Err(BindError::MissingRequired {
                    field: param.name.clone(),
                    mode: mode.to_owned(),
                });
            }
            continue;
        };
        let bound = bind_field(param, rules, value, mode)?;
        out.insert(param.name.clone(), bound);
    }

    let declared = out.len();
    for (key, value) in raw {
        out.entry(key.clone()).or_insert_with(|| value.clone());
    }
    tracing::trace!(
        declared,
        passthrough = out.len() - declared,
        "bound request parameters"
    );

    Ok(out)
}

fn bind_field(
    param: &Param,
    rules: &RuleEngine,
    value: &Value,
    mode: &str,
) -> Result<Value, BindError> {
    let Some(ty) = param.field_type else {
        return Ok(value.clone());
    };
    let wrong_type = || BindError::WrongType {
        field: param.name.clone(),
        expected: ty.expectation(),
    };

    match ty {
        FieldType::String | FieldType::Date | FieldType::DateTime | FieldType::Time => {
            if !matches!(value, Value::String(_)) {
                return Err(wrong_type());
            }
            apply_rules(param, rules, value)?;
            Ok(value.clone())
        }
        FieldType::Integer => match value {
            Value::Float(f) => {
                let int = Value::Int(f.trunc() as i64);
                apply_rules(param, rules, &int)?;
                Ok(int)
            }
            // Native integers skip the tag.
            Value::Int(_) => Ok(value.clone()),
            _ => Err(wrong_type()),
        },
        FieldType::Float => {
            if !matches!(value, Value::Float(_)) {
                return Err(wrong_type());
            }
            apply_rules(param, rules, value)?;
            Ok(value.clone())
        }
        FieldType::BigDecimal => match value {
            Value::String(_) => {
                apply_rules(param, rules, value)?;
                Ok(value.clone())
            }
            Value::Float(f) => Ok(Value::String(format!("{f:.10}"))),
            _ => Err(wrong_type()),
        },
        FieldType::Numeric => {
            if !matches!(value, Value::Float(_) | Value::String(_)) {
                return Err(wrong_type());
            }
            apply_rules(param, rules, value)?;
            Ok(value.clone())
        }
        FieldType::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(wrong_type()),
        },
        FieldType::Json => match value {
            Value::Object(map) => match param.nested() {
                Some(nested) => bind_nested(param, nested, rules, map, mode, |source| {
                    BindError::Nested {
                        field: param.name.clone(),
                        source,
                    }
                }),
                None => Ok(value.clone()),
            },
            Value::Array(_) => Ok(value.clone()),
            Value::String(text) => {
                serde_json::from_str(text).map_err(|source| BindError::MalformedJson {
                    field: param.name.clone(),
                    source,
                })
            }
            _ => Err(wrong_type()),
        },
        FieldType::Slice => {
            let Value::Array(items) = value else {
                return Err(wrong_type());
            };
            match (param.element_type, param.nested()) {
                (Some(FieldType::Json), Some(nested)) => {
                    let mut bound = Vec::with_capacity(items.len());
                    for item in items {
                        let Value::Object(map) = item else {
                            return Err(BindError::MalformedElement {
                                field: param.name.clone(),
                            });
                        };
                        let element = bind_nested(param, nested, rules, map, mode, |source| {
                            BindError::ElementFailed {
                                field: param.name.clone(),
                                source,
                            }
                        })?;
                        bound.push(element);
                    }
                    Ok(Value::Array(bound))
                }
                _ => Ok(value.clone()),
            }
        }
    }
}

/// Binds a nested object after normalizing it through JSON text. Failures
/// of the nested schema are wrapped by `wrap`; a normalization failure is
/// attributed to the enclosing field.
fn bind_nested<W>(
    param: &Param,
    nested: &Params,
    rules: &RuleEngine,
    map: &Map,
    mode: &str,
    wrap: W,
) -> Result<Value, BindError>
where
    W: FnOnce(Box<BindError>) -> BindError,
{
    let normalized = normalize_object(param, map)?;
    tracing::trace!(field = %param.name, fields = nested.len(), "binding nested object");
    bind_object(nested, rules, &normalized, mode)
        .map(Value::Object)
        .map_err(|err| wrap(Box::new(err)))
}

fn normalize_object(param: &Param, map: &Map) -> Result<Map, BindError> {
    match Value::Object(map.clone()).normalized() {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(source) => Err(BindError::MalformedJson {
            field: param.name.clone(),
            source,
        }),
    }
}

fn apply_rules(param: &Param, rules: &RuleEngine, value: &Value) -> Result<(), BindError> {
    if param.validate.is_empty() {
        return Ok(());
    }
    rules
        .check(value, &param.validate)
        .map_err(|source| BindError::RuleFailed {
            field: param.name.clone(),
            source,
        })
}
